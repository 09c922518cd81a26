// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the cropper and the publisher and turns an
// upload into a published result descriptor.
//
// Both members are immutable after start-up, so one `AppServices` can be
// cloned into as many concurrent requests as needed without locking.

use std::path::Path;
use std::sync::Arc;

use tablecrop_core::error::{Result, TablecropError};
use tablecrop_core::{InputFormat, RequestId};
use tablecrop_document::{PixelBuffer, TableCropper};
use tablecrop_publish::{
    CropPreviewResponse, HealthResponse, LocalPublisher, OutputKind, Publisher, SplitResponse,
    output_name, output_stem,
};
use tracing::{info, info_span};

use crate::config::AppConfig;

pub const SERVICE_NAME: &str = "Tablecrop";

/// An image as submitted: bytes plus whatever the submitter said about them.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Vec<u8>,
    /// Original file name, used to derive output names.
    pub name: Option<String>,
    /// Declared content type, e.g. `image/png`.
    pub content_type: Option<String>,
}

impl Upload {
    /// Read a file, declaring its type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let format = InputFormat::from_extension(ext).ok_or_else(|| {
            TablecropError::UnsupportedFormat(format!("file extension {ext:?}"))
        })?;

        Ok(Self {
            data: std::fs::read(path)?,
            name: path.file_name().and_then(|n| n.to_str()).map(str::to_owned),
            content_type: Some(format.mime_type().to_owned()),
        })
    }
}

#[derive(Clone)]
pub struct AppServices {
    cropper: TableCropper,
    publisher: Arc<dyn Publisher>,
}

impl AppServices {
    /// Build services from configuration, publishing into its output
    /// directory.
    pub fn init(config: &AppConfig) -> Result<Self> {
        let cropper = TableCropper::new(config.cropper.clone())?;
        let publisher = LocalPublisher::new(&config.output_dir)?;
        info!(
            output_dir = %publisher.root().display(),
            "App services initialised"
        );
        Ok(Self::with_publisher(cropper, Arc::new(publisher)))
    }

    pub fn with_publisher(cropper: TableCropper, publisher: Arc<dyn Publisher>) -> Self {
        info!(backend = publisher.backend_name(), "Publisher attached");
        Self { cropper, publisher }
    }

    /// Name of the backend results are published to.
    pub fn publisher_backend(&self) -> &str {
        self.publisher.backend_name()
    }

    /// Rectify the upload, trim the preview margins and publish the result.
    pub fn crop_preview(&self, upload: &Upload) -> Result<CropPreviewResponse> {
        let request = RequestId::new();
        let _span = info_span!("crop_preview", %request).entered();

        let image = self.load(upload)?;
        let preview = self.cropper.crop_preview(image)?;
        let stem = output_stem(upload.name.as_deref());
        let artifact = self.publish(&preview, &stem, OutputKind::Preview)?;

        info!(url = %artifact.url, "Preview published");
        Ok(CropPreviewResponse::success(&artifact))
    }

    /// Split the upload into halves, optionally rectifying it first, and
    /// publish both.
    pub fn split_halves(&self, upload: &Upload, rectify: bool) -> Result<SplitResponse> {
        let request = RequestId::new();
        let _span = info_span!("split_halves", %request, rectify).entered();

        let mut image = self.load(upload)?;
        if rectify {
            image = self.cropper.rectify(image)?.into_buffer();
        }
        let (top, bottom) = self.cropper.split_halves(image);

        let stem = output_stem(upload.name.as_deref());
        let top = self.publish(&top, &stem, OutputKind::TopHalf)?;
        let bottom = self.publish(&bottom, &stem, OutputKind::BottomHalf)?;

        info!(top = %top.url, bottom = %bottom.url, "Halves published");
        Ok(SplitResponse::success(&top, &bottom))
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::healthy(SERVICE_NAME, env!("CARGO_PKG_VERSION"))
    }

    fn load(&self, upload: &Upload) -> Result<PixelBuffer> {
        self.cropper.load(&upload.data, upload.content_type.as_deref())
    }

    fn publish(
        &self,
        image: &PixelBuffer,
        stem: &str,
        kind: OutputKind,
    ) -> Result<tablecrop_publish::PublishedArtifact> {
        let encoded = self.cropper.encode(image)?;
        let filename = output_name(stem, kind, encoded.extension);
        self.publisher
            .publish(&filename, &encoded.bytes, encoded.mime_type)
    }
}

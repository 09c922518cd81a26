// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output encoding for rectified, previewed and split images.

use std::io::Cursor;

use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use tablecrop_core::config::OutputFormat;
use tablecrop_core::error::{Result, TablecropError};
use tracing::{debug, instrument};

use crate::image::PixelBuffer;

/// Encoded image bytes together with what a publisher needs to label them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
}

/// Encode `image` in the requested output format.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn encode(image: &PixelBuffer, format: OutputFormat) -> Result<EncodedImage> {
    if image.is_empty() {
        return Err(TablecropError::Encode(format!(
            "cannot encode an empty {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            image
                .as_rgb()
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|err| TablecropError::Encode(format!("PNG encoding failed: {err}")))?;
        }
        OutputFormat::Jpeg { quality } => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
            image
                .as_rgb()
                .write_with_encoder(encoder)
                .map_err(|err| TablecropError::Encode(format!("JPEG encoding failed: {err}")))?;
        }
    }

    debug!(bytes = bytes.len(), mime = format.mime_type(), "Image encoded");
    Ok(EncodedImage {
        bytes,
        mime_type: format.mime_type(),
        extension: format.extension(),
    })
}

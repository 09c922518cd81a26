// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image loader — validates uploads, decodes them, applies EXIF orientation
// and normalizes to RGB8.

use std::io::Cursor;
use std::path::Path;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use tablecrop_core::config::ImageLimits;
use tablecrop_core::error::{Result, TablecropError};
use tablecrop_core::InputFormat;
use tracing::{debug, info, instrument, warn};

use super::buffer::PixelBuffer;

/// Decode encoded image bytes into a normalized [`PixelBuffer`].
///
/// `declared_type` is the content type the uploader claimed, if any; it must
/// name an accepted format, but the bytes themselves decide how decoding
/// proceeds. Dimensions are checked against `limits` before pixels are
/// allocated.
#[instrument(skip(data, limits), fields(data_len = data.len()))]
pub fn decode(
    data: &[u8],
    declared_type: Option<&str>,
    limits: &ImageLimits,
) -> Result<PixelBuffer> {
    if data.is_empty() {
        return Err(TablecropError::EmptyInput);
    }
    if data.len() > limits.max_upload_bytes {
        return Err(TablecropError::UploadTooLarge {
            bytes: data.len(),
            max: limits.max_upload_bytes,
        });
    }

    if let Some(content_type) = declared_type {
        if InputFormat::from_content_type(content_type).is_none() {
            return Err(TablecropError::UnsupportedFormat(content_type.to_owned()));
        }
    }

    let format = image::guess_format(data)
        .map_err(|err| TablecropError::Decode(format!("unrecognised image data: {err}")))?;
    let input_format = accepted_format(format)
        .ok_or_else(|| TablecropError::UnsupportedFormat(format!("{format:?}")))?;
    debug!(format = input_format.mime_type(), "Image format sniffed");

    let mut decoder = ImageReader::with_format(Cursor::new(data), format)
        .into_decoder()
        .map_err(|err| TablecropError::Decode(err.to_string()))?;

    let (width, height) = decoder.dimensions();
    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(TablecropError::ImageTooLarge {
            width,
            height,
            max: limits.max_dimension,
        });
    }
    if width == 0 || height == 0 {
        return Err(TablecropError::Decode(format!(
            "image has no pixels ({width}x{height})"
        )));
    }

    let orientation = decoder.orientation().unwrap_or_else(|err| {
        warn!(%err, "Could not read orientation metadata; assuming upright");
        Orientation::NoTransforms
    });

    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|err| TablecropError::Decode(err.to_string()))?;
    image.apply_orientation(orientation);

    info!(
        width = image.width(),
        height = image.height(),
        ?orientation,
        "Image decoded"
    );
    Ok(PixelBuffer::from_dynamic(image))
}

/// Read and decode an image file. The extension must name an accepted format.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<Path>, limits: &ImageLimits) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let format = InputFormat::from_extension(ext)
        .ok_or_else(|| TablecropError::UnsupportedFormat(format!("file extension {ext:?}")))?;

    let data = std::fs::read(path)?;
    decode(&data, Some(format.mime_type()), limits)
}

fn accepted_format(format: ImageFormat) -> Option<InputFormat> {
    match format {
        ImageFormat::Png => Some(InputFormat::Png),
        ImageFormat::Jpeg => Some(InputFormat::Jpeg),
        ImageFormat::Bmp => Some(InputFormat::Bmp),
        ImageFormat::Tiff => Some(InputFormat::Tiff),
        _ => None,
    }
}

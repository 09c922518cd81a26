// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PixelBuffer — the owned, row-major RGB8 image that moves between pipeline
// stages.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage, imageops};
use tablecrop_core::error::{Result, TablecropError};

/// An owned row-major RGB8 pixel grid.
///
/// Every stage takes the buffer by value and hands a new one to the next, so
/// no two stages ever alias the same pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbImage,
}

impl PixelBuffer {
    /// Channels per pixel after normalization.
    pub const CHANNELS: u8 = 3;

    // -- Construction ---------------------------------------------------------

    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// Normalize any decoded image to RGB8. Alpha is dropped.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => Self { image: rgb },
            other => Self {
                image: other.to_rgb8(),
            },
        }
    }

    /// Build a buffer from raw row-major samples with 1 (gray), 3 (RGB) or
    /// 4 (RGBA) channels.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(TablecropError::Decode(format!(
                "raw buffer holds {} bytes, expected {} for {}x{}x{}",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }

        let dynamic = match channels {
            1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
            other => {
                return Err(TablecropError::Decode(format!(
                    "unsupported channel count {other}"
                )));
            }
        };

        dynamic
            .map(Self::from_dynamic)
            .ok_or_else(|| TablecropError::Decode("raw buffer does not match its dimensions".into()))
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn channels(&self) -> u8 {
        Self::CHANNELS
    }

    /// True when the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Row-major samples.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    /// Single-channel intensity copy used by boundary detection.
    pub fn to_luma(&self) -> GrayImage {
        imageops::grayscale(&self.image)
    }

    // -- Transformations ------------------------------------------------------

    /// Crop a rectangular region. The rectangle is clamped to the image bounds.
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w);
        let safe_y = y.min(img_h);
        let safe_w = width.min(img_w - safe_x);
        let safe_h = height.min(img_h - safe_y);

        if safe_x == 0 && safe_y == 0 && safe_w == img_w && safe_h == img_h {
            return self;
        }

        let cropped = imageops::crop_imm(&self.image, safe_x, safe_y, safe_w, safe_h).to_image();
        Self { image: cropped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn from_raw_gray_expands_to_rgb() {
        let buffer = PixelBuffer::from_raw(2, 1, 1, vec![10, 200]).expect("valid gray");
        assert_eq!(buffer.channels(), 3);
        assert_eq!(buffer.as_raw(), &[10, 10, 10, 200, 200, 200]);
    }

    #[test]
    fn from_raw_rgba_drops_alpha() {
        let buffer = PixelBuffer::from_raw(1, 1, 4, vec![1, 2, 3, 0]).expect("valid rgba");
        assert_eq!(buffer.as_raw(), &[1, 2, 3]);
    }

    #[test]
    fn from_raw_rejects_length_mismatch() {
        let err = PixelBuffer::from_raw(4, 4, 3, vec![0; 10]).unwrap_err();
        assert!(matches!(err, TablecropError::Decode(_)));
    }

    #[test]
    fn from_raw_rejects_two_channels() {
        assert!(PixelBuffer::from_raw(1, 1, 2, vec![0, 0]).is_err());
    }

    #[test]
    fn luma_matches_source_intensity() {
        let image = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([0, 0, 0]),
            1 => Rgb([255, 255, 255]),
            _ => Rgb([90, 90, 90]),
        });
        let buffer = PixelBuffer::from_rgb(image);
        let gray = buffer.to_luma();
        assert_eq!((gray.width(), gray.height()), (3, 1));
        assert_eq!(gray.as_raw(), &[0, 255, 90]);
        // The colour buffer is left as it was.
        assert_eq!(buffer.as_rgb().get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn crop_is_clamped_to_bounds() {
        let buffer = PixelBuffer::from_rgb(RgbImage::from_pixel(10, 8, Rgb([9, 9, 9])));
        let cropped = buffer.crop(6, 5, 100, 100);
        assert_eq!((cropped.width(), cropped.height()), (4, 3));
    }

    #[test]
    fn crop_copies_the_selected_pixels() {
        let image = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 0]));
        let cropped = PixelBuffer::from_rgb(image).crop(1, 2, 2, 2);
        assert_eq!(cropped.as_rgb().get_pixel(0, 0), &Rgb([1, 2, 0]));
        assert_eq!(cropped.as_rgb().get_pixel(1, 1), &Rgb([2, 3, 0]));
    }
}

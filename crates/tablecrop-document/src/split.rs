// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Half splitter — cuts an image into its top and bottom halves.

use image::imageops;
use tracing::{debug, instrument};

use crate::image::PixelBuffer;

/// Split `image` at row `height / 2` (rounded down).
///
/// The top half holds rows `[0, mid)` and the bottom half rows
/// `[mid, height)`, so an odd height gives the extra row to the bottom and a
/// one-row image yields an empty top half. Concatenating the two halves
/// reproduces the input exactly.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn split_halves(image: PixelBuffer) -> (PixelBuffer, PixelBuffer) {
    let (width, height) = (image.width(), image.height());
    let mid = height / 2;

    let rgb = image.into_rgb();
    let top = imageops::crop_imm(&rgb, 0, 0, width, mid).to_image();
    let bottom = imageops::crop_imm(&rgb, 0, mid, width, height - mid).to_image();

    debug!(top_rows = mid, bottom_rows = height - mid, "Image split");
    (PixelBuffer::from_rgb(top), PixelBuffer::from_rgb(bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Every row carries a distinct colour so misplaced rows are caught.
    fn striped(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(y % 256) as u8, (y / 256) as u8, (x % 256) as u8])
        }))
    }

    fn assert_partition(width: u32, height: u32) {
        let original = striped(width, height);
        let (top, bottom) = split_halves(original.clone());

        assert_eq!(top.height(), height / 2);
        assert_eq!(bottom.height(), height - height / 2);
        assert_eq!(top.width(), width);
        assert_eq!(bottom.width(), width);

        let mut rows = top.as_raw().to_vec();
        rows.extend_from_slice(bottom.as_raw());
        assert_eq!(rows, original.as_raw(), "{width}x{height} not reconstructed");
    }

    #[test]
    fn even_height_splits_evenly() {
        assert_partition(37, 300);
    }

    #[test]
    fn odd_height_gives_extra_row_to_bottom() {
        assert_partition(5, 221);
        let (top, bottom) = split_halves(striped(4, 7));
        assert_eq!((top.height(), bottom.height()), (3, 4));
        assert_eq!(bottom.as_rgb().get_pixel(0, 0), &Rgb([3, 0, 0]));
    }

    #[test]
    fn single_row_leaves_top_empty() {
        let (top, bottom) = split_halves(striped(9, 1));
        assert!(top.is_empty());
        assert_eq!(top.height(), 0);
        assert_eq!(bottom.height(), 1);
        assert_partition(9, 1);
    }

    #[test]
    fn tall_images_keep_row_order() {
        assert_partition(2, 601);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary candidate extraction — grayscale, blur, binary edge map, dilation
// and border tracing. Produces the closed contours the quadrilateral selector
// chooses from.

use image::{GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::contrast::otsu_level;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use tablecrop_core::Point2D;
use tablecrop_core::config::{DetectionConfig, EdgeMode};
use tracing::{debug, instrument};

use super::polygon::Contour;
use crate::image::PixelBuffer;

/// Derives the binary boundary map of an image and traces its contours.
pub struct BoundaryExtractor<'a> {
    config: &'a DetectionConfig,
}

impl<'a> BoundaryExtractor<'a> {
    pub fn new(config: &'a DetectionConfig) -> Self {
        Self { config }
    }

    /// Run one edge-detection pass and return the surviving contours.
    ///
    /// The returned iterator is lazy: area filtering happens as it is
    /// consumed. It cannot be restarted; run `extract` again for a fresh pass.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract(&self, image: &PixelBuffer) -> BoundaryCandidates {
        let edges = self.binary_map(image);
        let raw = find_contours::<i32>(&edges);

        let image_area = image.width() as f64 * image.height() as f64;
        let min_area = image_area * self.config.min_contour_area_fraction;
        debug!(raw_contours = raw.len(), min_area, "Contours traced");

        BoundaryCandidates {
            raw: raw.into_iter(),
            min_area,
        }
    }

    /// Single-channel map whose non-zero pixels are candidate boundary pixels.
    pub fn binary_map(&self, image: &PixelBuffer) -> GrayImage {
        let gray = image.to_luma();
        let blurred = gaussian_blur_f32(&gray, self.config.blur_sigma);

        let binary = match self.config.edge_mode {
            EdgeMode::Canny => canny(&blurred, self.config.canny_low, self.config.canny_high),
            EdgeMode::Otsu => otsu_foreground(&blurred),
        };

        if self.config.dilation_radius == 0 {
            binary
        } else {
            dilate(&binary, Norm::LInf, self.config.dilation_radius)
        }
    }
}

/// Pixels brighter than the Otsu level become foreground. A flat image has no
/// meaningful split and yields an empty map.
fn otsu_foreground(gray: &GrayImage) -> GrayImage {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if min >= max {
        return GrayImage::new(gray.width(), gray.height());
    }

    let level = otsu_level(gray);
    debug!(level, "Otsu level computed");
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Lazy, single-pass sequence of contours large enough to be a table.
pub struct BoundaryCandidates {
    raw: std::vec::IntoIter<imageproc::contours::Contour<i32>>,
    min_area: f64,
}

impl Iterator for BoundaryCandidates {
    type Item = Contour;

    fn next(&mut self) -> Option<Contour> {
        for raw in self.raw.by_ref() {
            if raw.points.len() < 4 {
                continue;
            }
            let contour = Contour::new(
                raw.points
                    .iter()
                    .map(|p| Point2D::new(p.x as f64, p.y as f64))
                    .collect(),
            );
            if contour.area() >= self.min_area {
                return Some(contour);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.raw.size_hint().1)
    }
}

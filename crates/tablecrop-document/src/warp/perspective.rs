// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective transformer — maps an ordered quadrilateral onto an upright
// rectangle sized from its longest edges.

use image::{Rgb, RgbImage};
use tablecrop_core::error::{Result, TablecropError};
use tablecrop_core::{OrderedQuadrilateral, Point2D};
use tracing::{debug, info, instrument};

use super::homography::Homography;
use crate::detect::polygon::is_convex;
use crate::image::PixelBuffer;

/// Slack allowed when a mapped coordinate lands just past the source edge.
const EDGE_SLACK: f64 = 1e-6;

/// Output of rectification: the upright pixels plus the geometry that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct RectifiedImage {
    buffer: PixelBuffer,
    corners: OrderedQuadrilateral,
    transform: Homography,
}

impl RectifiedImage {
    /// The whole input treated as already upright; used when detection found
    /// nothing to rectify.
    pub fn full_frame(image: PixelBuffer) -> Self {
        let max_x = image.width().saturating_sub(1) as f64;
        let max_y = image.height().saturating_sub(1) as f64;
        Self {
            corners: OrderedQuadrilateral::new(
                Point2D::new(0.0, 0.0),
                Point2D::new(max_x, 0.0),
                Point2D::new(max_x, max_y),
                Point2D::new(0.0, max_y),
            ),
            buffer: image,
            transform: Homography::identity(),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Source corners that were mapped onto the output rectangle.
    pub fn corners(&self) -> &OrderedQuadrilateral {
        &self.corners
    }

    /// Source-to-output homography.
    pub fn transform(&self) -> &Homography {
        &self.transform
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }
}

/// Warps a quadrilateral region of an image into an upright rectangle.
#[derive(Debug, Clone)]
pub struct PerspectiveTransformer {
    background: Rgb<u8>,
    max_dimension: u32,
}

impl PerspectiveTransformer {
    pub fn new(background: [u8; 3], max_dimension: u32) -> Self {
        Self {
            background: Rgb(background),
            max_dimension,
        }
    }

    /// Output size: the rounded longer of each pair of opposite edges.
    pub fn target_size(&self, corners: &OrderedQuadrilateral) -> Result<(u32, u32)> {
        let width = corners.max_horizontal_edge().round();
        let height = corners.max_vertical_edge().round();
        if !width.is_finite() || !height.is_finite() {
            return Err(geometry("quadrilateral edges are not finite"));
        }
        if width < 2.0 || height < 2.0 {
            return Err(geometry("quadrilateral is too small to rectify"));
        }
        let limit = self.max_dimension as f64;
        if width > limit || height > limit {
            return Err(geometry("rectified size exceeds the dimension limit"));
        }
        Ok((width as u32, height as u32))
    }

    /// Warp the region bounded by `corners` into a `W x H` rectangle.
    ///
    /// Each output pixel is mapped back through the inverse homography and
    /// sampled bilinearly. Samples that fall outside the source take the
    /// background colour.
    #[instrument(skip_all, fields(src_width = image.width(), src_height = image.height()))]
    pub fn warp(&self, image: PixelBuffer, corners: &OrderedQuadrilateral) -> Result<RectifiedImage> {
        let ordered = corners.corners();
        if !corners.is_simple() || !is_convex(&ordered) {
            return Err(geometry("corners do not form a convex quadrilateral"));
        }

        let (width, height) = self.target_size(corners)?;
        let (max_x, max_y) = ((width - 1) as f64, (height - 1) as f64);
        let target = [
            Point2D::new(0.0, 0.0),
            Point2D::new(max_x, 0.0),
            Point2D::new(max_x, max_y),
            Point2D::new(0.0, max_y),
        ];

        let transform = Homography::from_correspondences(&ordered, &target)?;
        let inverse = transform.inverse()?;
        debug!(width, height, det = transform.determinant(), "Homography solved");

        let source = image.as_rgb();
        let mut outside = 0usize;
        let warped = RgbImage::from_fn(width, height, |x, y| {
            let sampled = inverse
                .apply(Point2D::new(x as f64, y as f64))
                .and_then(|p| sample_bilinear(source, p));
            sampled.unwrap_or_else(|| {
                outside += 1;
                self.background
            })
        });

        info!(width, height, background_pixels = outside, "Perspective warp complete");
        Ok(RectifiedImage {
            buffer: PixelBuffer::from_rgb(warped),
            corners: *corners,
            transform,
        })
    }
}

/// Bilinear sample at a sub-pixel position, or `None` when the position lies
/// outside the pixel-centre grid.
fn sample_bilinear(image: &RgbImage, p: Point2D) -> Option<Rgb<u8>> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return None;
    }
    let (max_x, max_y) = ((w - 1) as f64, (h - 1) as f64);
    if p.x < -EDGE_SLACK || p.y < -EDGE_SLACK || p.x > max_x + EDGE_SLACK || p.y > max_y + EDGE_SLACK {
        return None;
    }

    let x = p.x.clamp(0.0, max_x);
    let y = p.y.clamp(0.0, max_y);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let (p00, p10) = (image.get_pixel(x0, y0), image.get_pixel(x1, y0));
    let (p01, p11) = (image.get_pixel(x0, y1), image.get_pixel(x1, y1));

    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = p00.0[c] as f64 * (1.0 - fx) + p10.0[c] as f64 * fx;
        let bottom = p01.0[c] as f64 * (1.0 - fx) + p11.0[c] as f64 * fx;
        *slot = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Some(Rgb(out))
}

fn geometry(msg: &str) -> TablecropError {
    TablecropError::Geometry(msg.to_owned())
}

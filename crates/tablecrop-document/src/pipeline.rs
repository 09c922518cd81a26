// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// TableCropper — the end-to-end facade: load, detect, order, warp, preview,
// split and encode.

use std::path::Path;

use tablecrop_core::config::CropperConfig;
use tablecrop_core::error::{Result, TablecropError};
use tablecrop_core::{Point2D, Quadrilateral};
use tracing::{info, instrument, warn};

use crate::detect::{BoundaryExtractor, QuadSelector, Selection, order_corners};
use crate::encode::{self, EncodedImage};
use crate::image::{self as loader, PixelBuffer};
use crate::split;
use crate::warp::{PerspectiveTransformer, RectifiedImage};

/// Rectifies photographed tables.
///
/// Holds only immutable configuration, so one cropper can serve many
/// requests from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct TableCropper {
    config: CropperConfig,
}

impl TableCropper {
    /// Build a cropper after validating `config`.
    pub fn new(config: CropperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    // -- Input ----------------------------------------------------------------

    /// Decode uploaded bytes, checking them against the configured limits.
    pub fn load(&self, data: &[u8], declared_type: Option<&str>) -> Result<PixelBuffer> {
        loader::decode(data, declared_type, &self.config.limits)
    }

    /// Read and decode an image file.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<PixelBuffer> {
        loader::open(path, &self.config.limits)
    }

    // -- Detection and rectification ------------------------------------------

    /// Locate the table boundary, or fall back to the full frame.
    pub fn detect(&self, image: &PixelBuffer) -> Selection {
        let detection = &self.config.detection;
        let contours = BoundaryExtractor::new(detection).extract(image);
        QuadSelector::new(detection).select(contours, image.width(), image.height())
    }

    /// Detect the table in `image` and warp it upright.
    ///
    /// When no table is found the input comes back unchanged as a
    /// full-frame result.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: PixelBuffer) -> Result<RectifiedImage> {
        if image.is_empty() {
            return Err(TablecropError::EmptyInput);
        }

        match self.detect(&image) {
            Selection::Detected(quad) => self.warp(image, &quad),
            Selection::FullFrame(_) => {
                warn!("No table boundary detected; returning the full frame");
                Ok(RectifiedImage::full_frame(image))
            }
        }
    }

    /// Warp caller-supplied corners upright, skipping detection. The corners
    /// may be in any order.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify_with_corners(
        &self,
        image: PixelBuffer,
        corners: [Point2D; 4],
    ) -> Result<RectifiedImage> {
        if image.is_empty() {
            return Err(TablecropError::EmptyInput);
        }
        let quad = Quadrilateral::new(corners)?;
        self.warp(image, &quad)
    }

    fn warp(&self, image: PixelBuffer, quad: &Quadrilateral) -> Result<RectifiedImage> {
        let ordered = order_corners(quad);
        let transformer =
            PerspectiveTransformer::new(self.config.background, self.config.limits.max_dimension);
        let rectified = transformer.warp(image, &ordered)?;
        info!(
            width = rectified.width(),
            height = rectified.height(),
            "Table rectified"
        );
        Ok(rectified)
    }

    // -- Derived outputs ------------------------------------------------------

    /// Rectify `image` and trim the configured preview margins.
    pub fn crop_preview(&self, image: PixelBuffer) -> Result<PixelBuffer> {
        let rectified = self.rectify(image)?;
        Ok(self.trim_preview(rectified.into_buffer()))
    }

    /// Remove the preview margins: a fraction of the width from the left and
    /// of the height from the bottom. At least one pixel always survives.
    pub fn trim_preview(&self, image: PixelBuffer) -> PixelBuffer {
        let trim = &self.config.preview_trim;
        let (width, height) = (image.width(), image.height());

        let left = ((width as f64 * trim.left_fraction).floor() as u32).min(width.saturating_sub(1));
        let bottom =
            ((height as f64 * trim.bottom_fraction).floor() as u32).min(height.saturating_sub(1));
        image.crop(left, 0, width - left, height - bottom)
    }

    /// Partition an image into its top and bottom halves.
    pub fn split_halves(&self, image: PixelBuffer) -> (PixelBuffer, PixelBuffer) {
        split::split_halves(image)
    }

    /// Encode in the configured output format.
    pub fn encode(&self, image: &PixelBuffer) -> Result<EncodedImage> {
        encode::encode(image, self.config.output_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, imageops};
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;
    use tablecrop_core::config::{EdgeMode, PreviewTrim};

    const TABLE: [(i32, i32); 4] = [(50, 40), (350, 60), (330, 280), (30, 260)];

    /// Light table on a dark background, as a phone would see a sheet on a
    /// desk.
    fn table_photo() -> RgbImage {
        let mut img = RgbImage::from_pixel(400, 300, Rgb([30, 30, 30]));
        let poly = TABLE.map(|(x, y)| Point::new(x, y));
        draw_polygon_mut(&mut img, &poly, Rgb([235, 235, 235]));
        img
    }

    fn assert_near(actual: u32, expected: u32, tolerance: u32) {
        assert!(
            actual.abs_diff(expected) <= tolerance,
            "{actual} not within {tolerance} of {expected}"
        );
    }

    #[test]
    fn uniform_image_comes_back_unchanged() {
        let cropper = TableCropper::default();
        let flat = PixelBuffer::from_rgb(RgbImage::from_pixel(160, 120, Rgb([200, 190, 180])));
        let rectified = cropper.rectify(flat.clone()).expect("rectify");
        assert_eq!(rectified.buffer(), &flat);
    }

    #[test]
    fn skewed_table_is_rectified_to_its_edge_lengths() {
        let cropper = TableCropper::default();
        let rectified = cropper
            .rectify(PixelBuffer::from_rgb(table_photo()))
            .expect("rectify");
        assert_near(rectified.width(), 301, 8);
        assert_near(rectified.height(), 221, 8);

        // The warped table fills the output, so its centre is table-coloured.
        let centre = rectified
            .buffer()
            .as_rgb()
            .get_pixel(rectified.width() / 2, rectified.height() / 2);
        assert_eq!(centre, &Rgb([235, 235, 235]));
    }

    #[test]
    fn otsu_mode_finds_the_same_table() {
        let mut config = CropperConfig::default();
        config.detection.edge_mode = EdgeMode::Otsu;
        let cropper = TableCropper::new(config).expect("valid config");
        let rectified = cropper
            .rectify(PixelBuffer::from_rgb(table_photo()))
            .expect("rectify");
        assert_near(rectified.width(), 301, 8);
        assert_near(rectified.height(), 221, 8);
    }

    #[test]
    fn corner_roles_survive_right_angle_rotations() {
        let cropper = TableCropper::default();
        let photo = table_photo();
        let (w, h) = (photo.width() as f64, photo.height() as f64);
        let original = cropper.detect(&PixelBuffer::from_rgb(photo.clone()));
        assert!(!original.is_fallback());

        let rotations: [(RgbImage, Box<dyn Fn(Point2D) -> Point2D>); 3] = [
            (
                imageops::rotate90(&photo),
                Box::new(move |p: Point2D| Point2D::new(h - 1.0 - p.y, p.x)),
            ),
            (
                imageops::rotate180(&photo),
                Box::new(move |p: Point2D| Point2D::new(w - 1.0 - p.x, h - 1.0 - p.y)),
            ),
            (
                imageops::rotate270(&photo),
                Box::new(move |p: Point2D| Point2D::new(p.y, w - 1.0 - p.x)),
            ),
        ];

        for (rotated, map) in rotations {
            let selection = cropper.detect(&PixelBuffer::from_rgb(rotated));
            assert!(!selection.is_fallback());
            let ordered = order_corners(selection.quadrilateral());

            // Every detected corner sits near a rotated table corner.
            for corner in ordered.corners() {
                let nearest = TABLE
                    .iter()
                    .map(|&(x, y)| map(Point2D::new(x as f64, y as f64)).distance(corner))
                    .fold(f64::INFINITY, f64::min);
                assert!(nearest < 8.0, "corner {corner:?} is {nearest} px from the table");
            }
            assert!(ordered.is_simple());
            let min_sum = ordered
                .corners()
                .iter()
                .map(|p| p.x + p.y)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(ordered.top_left.x + ordered.top_left.y, min_sum);
        }
    }

    #[test]
    fn explicit_corners_in_any_order_give_the_example_size() {
        let cropper = TableCropper::default();
        let corners = [(330.0, 280.0), (50.0, 40.0), (30.0, 260.0), (350.0, 60.0)]
            .map(|(x, y)| Point2D::new(x, y));
        let rectified = cropper
            .rectify_with_corners(PixelBuffer::from_rgb(table_photo()), corners)
            .expect("rectify");
        assert_eq!((rectified.width(), rectified.height()), (301, 221));
        assert_eq!(rectified.corners().top_left, Point2D::new(50.0, 40.0));
    }

    #[test]
    fn degenerate_corners_are_geometry_errors() {
        let cropper = TableCropper::default();
        let image = || PixelBuffer::from_rgb(RgbImage::new(100, 100));

        let collinear = [(0.0, 0.0), (10.0, 10.0), (20.0, 20.0), (30.0, 30.0)].map(|(x, y)| Point2D::new(x, y));
        assert!(matches!(
            cropper.rectify_with_corners(image(), collinear),
            Err(TablecropError::Geometry(_))
        ));

        let coincident = [Point2D::new(5.0, 5.0); 4];
        assert!(matches!(
            cropper.rectify_with_corners(image(), coincident),
            Err(TablecropError::Geometry(_))
        ));
    }

    #[test]
    fn preview_trims_left_and_bottom_margins() {
        let cropper = TableCropper::default();
        let image = PixelBuffer::from_rgb(RgbImage::from_fn(100, 50, |x, y| Rgb([x as u8, y as u8, 0])));
        let preview = cropper.trim_preview(image);
        // 27 columns off the left, 6 rows off the bottom.
        assert_eq!((preview.width(), preview.height()), (73, 44));
        assert_eq!(preview.as_rgb().get_pixel(0, 0), &Rgb([27, 0, 0]));
    }

    #[test]
    fn preview_never_empties_a_tiny_image() {
        let mut config = CropperConfig::default();
        config.preview_trim = PreviewTrim {
            left_fraction: 0.99,
            bottom_fraction: 0.99,
        };
        let cropper = TableCropper::new(config).expect("valid config");
        let preview = cropper.trim_preview(PixelBuffer::from_rgb(RgbImage::new(3, 2)));
        assert_eq!((preview.width(), preview.height()), (1, 1));
    }

    #[test]
    fn crop_preview_runs_the_whole_pipeline() {
        let mut config = CropperConfig::default();
        config.preview_trim = PreviewTrim::none();
        let cropper = TableCropper::new(config).expect("valid config");
        let preview = cropper
            .crop_preview(PixelBuffer::from_rgb(table_photo()))
            .expect("preview");
        assert_near(preview.width(), 301, 8);

        let encoded = cropper.encode(&preview).expect("encode");
        assert_eq!(encoded.mime_type, "image/png");
    }

    #[test]
    fn empty_input_is_rejected() {
        let cropper = TableCropper::default();
        let empty = PixelBuffer::from_rgb(RgbImage::new(0, 0));
        assert!(matches!(cropper.rectify(empty), Err(TablecropError::EmptyInput)));
    }

    #[test]
    fn cropper_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TableCropper>();
        assert_send_sync::<RectifiedImage>();
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration. Every detection threshold lives here so callers can
// tune detection quality without touching the algorithms.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TablecropError};

/// How the boundary extractor derives its binary map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Canny edge detection with hysteresis thresholds.
    Canny,
    /// Global Otsu threshold; useful for high-contrast scans.
    Otsu,
}

/// Thresholds for boundary extraction and quadrilateral selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    pub edge_mode: EdgeMode,
    /// Canny low hysteresis threshold.
    pub canny_low: f32,
    /// Canny high hysteresis threshold.
    pub canny_high: f32,
    /// Dilation radius (pixels) used to close small gaps in the edge map.
    /// Zero disables dilation.
    pub dilation_radius: u8,
    /// Contours enclosing less than this fraction of the image are dropped
    /// during extraction.
    pub min_contour_area_fraction: f64,
    /// Quadrilaterals enclosing less than this fraction of the image are never
    /// selected.
    pub min_quad_area_fraction: f64,
    /// First polygon approximation tolerance, as a fraction of the contour
    /// perimeter.
    pub approx_epsilon_start: f64,
    /// Tolerance increment per approximation attempt.
    pub approx_epsilon_step: f64,
    /// Largest tolerance tried before a contour is rejected.
    pub approx_epsilon_max: f64,
    /// Hard cap on approximation attempts per contour.
    pub approx_max_iterations: u32,
    /// Relative area difference under which two candidates count as tied.
    pub area_tie_tolerance: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            edge_mode: EdgeMode::Canny,
            canny_low: 50.0,
            canny_high: 150.0,
            dilation_radius: 1,
            min_contour_area_fraction: 0.02,
            min_quad_area_fraction: 0.10,
            approx_epsilon_start: 0.01,
            approx_epsilon_step: 0.01,
            approx_epsilon_max: 0.10,
            approx_max_iterations: 10,
            area_tie_tolerance: 0.01,
        }
    }
}

/// Upper bounds on accepted input, capping per-request memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    /// Maximum width or height in pixels.
    pub max_dimension: u32,
    /// Maximum encoded upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Margin trimmed from a rectified table to build the preview image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewTrim {
    /// Fraction of the width removed from the left edge.
    pub left_fraction: f64,
    /// Fraction of the height removed from the bottom edge.
    pub bottom_fraction: f64,
}

impl Default for PreviewTrim {
    fn default() -> Self {
        Self {
            left_fraction: 0.27,
            bottom_fraction: 0.12,
        }
    }
}

impl PreviewTrim {
    /// A trim that leaves the image untouched.
    pub fn none() -> Self {
        Self {
            left_fraction: 0.0,
            bottom_fraction: 0.0,
        }
    }
}

/// Encoding used for published output images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Complete configuration for one table cropper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    pub detection: DetectionConfig,
    /// RGB fill for destination pixels that map outside the source image.
    pub background: [u8; 3],
    pub limits: ImageLimits,
    pub preview_trim: PreviewTrim,
    pub output_format: OutputFormat,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            background: [255, 255, 255],
            limits: ImageLimits::default(),
            preview_trim: PreviewTrim::default(),
            output_format: OutputFormat::Png,
        }
    }
}

impl CropperConfig {
    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;

        check_fraction("detection.min_contour_area_fraction", d.min_contour_area_fraction)?;
        check_fraction("detection.min_quad_area_fraction", d.min_quad_area_fraction)?;
        check_fraction("detection.area_tie_tolerance", d.area_tie_tolerance)?;
        check_fraction("preview_trim.left_fraction", self.preview_trim.left_fraction)?;
        check_fraction("preview_trim.bottom_fraction", self.preview_trim.bottom_fraction)?;

        if !(d.blur_sigma.is_finite() && d.blur_sigma > 0.0) {
            return Err(config_error("detection.blur_sigma must be positive"));
        }
        if !(d.canny_low >= 0.0 && d.canny_low <= d.canny_high) {
            return Err(config_error(
                "detection.canny_low must be non-negative and not exceed canny_high",
            ));
        }
        if !(d.approx_epsilon_start > 0.0 && d.approx_epsilon_step > 0.0) {
            return Err(config_error(
                "detection.approx_epsilon_start and approx_epsilon_step must be positive",
            ));
        }
        if d.approx_epsilon_max < d.approx_epsilon_start {
            return Err(config_error(
                "detection.approx_epsilon_max must be at least approx_epsilon_start",
            ));
        }
        if d.approx_max_iterations == 0 {
            return Err(config_error("detection.approx_max_iterations must be at least 1"));
        }
        if self.limits.max_dimension == 0 || self.limits.max_upload_bytes == 0 {
            return Err(config_error("limits must be non-zero"));
        }
        if let OutputFormat::Jpeg { quality } = self.output_format {
            if !(1..=100).contains(&quality) {
                return Err(config_error("output_format.quality must be within 1..=100"));
            }
        }
        Ok(())
    }
}

/// Read a JSON configuration file into `T`. Missing fields take their
/// defaults when `T` is `#[serde(default)]`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let data = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&data)?)
}

/// Write `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(config_error(&format!("{name} must be within [0, 1), got {value}")))
    }
}

fn config_error(msg: &str) -> TablecropError {
    TablecropError::Config(msg.to_owned())
}

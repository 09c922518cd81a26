// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tablecrop-document — Table rectification for photographed documents.
//
// Provides image loading and normalization, table boundary detection
// (contours, quadrilateral selection, corner ordering), homography estimation
// and perspective warping, half-splitting, and output encoding.

pub mod detect;
pub mod encode;
pub mod image;
pub mod pipeline;
pub mod split;
pub mod warp;

// Re-export the primary types so callers can use `tablecrop_document::TableCropper` etc.
pub use detect::{Contour, Selection};
pub use encode::EncodedImage;
pub use image::buffer::PixelBuffer;
pub use pipeline::TableCropper;
pub use split::split_halves;
pub use warp::homography::Homography;
pub use warp::perspective::RectifiedImage;

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification: homography estimation and inverse-mapped warping.

pub mod homography;
pub mod perspective;

pub use homography::Homography;
pub use perspective::{PerspectiveTransformer, RectifiedImage};

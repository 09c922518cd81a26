// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table boundary detection — contour extraction, quadrilateral selection and
// corner ordering.

pub mod boundary;
pub mod order;
pub mod polygon;
pub mod quad;

pub use boundary::{BoundaryCandidates, BoundaryExtractor};
pub use order::order_corners;
pub use polygon::Contour;
pub use quad::{QuadSelector, Selection};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Tablecrop: request identity, accepted input formats,
// and the planar geometry shared by detection and rectification.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TablecropError};

/// Unique identifier for one crop or split request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image formats accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl InputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Infer the format from a declared content type such as `image/jpeg`.
    ///
    /// Matching is on the subtype suffix, so `image/x-ms-bmp` and
    /// `IMAGE/JPG` are both accepted.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let lower = content_type.trim().to_ascii_lowercase();
        let subtype = lower.rsplit(['/', '-']).next()?;
        Self::from_extension(subtype)
    }
}

// -- Geometry -----------------------------------------------------------------

/// A point in source-image pixel coordinates (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Z component of `(b - a) x (c - a)`. Positive when `a -> b -> c` turns
/// clockwise on screen (y down).
pub fn cross(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Sine of the angle at `a` below which a triple counts as collinear.
const COLLINEAR_SIN_EPS: f64 = 1e-4;

/// Whether `a`, `b` and `c` are collinear, or any two of them coincide.
pub fn is_collinear(a: Point2D, b: Point2D, c: Point2D) -> bool {
    let scale = a.distance(b) * a.distance(c);
    if scale <= f64::EPSILON {
        return true;
    }
    cross(a, b, c).abs() <= COLLINEAR_SIN_EPS * scale
}

/// Four corner points with no role assigned yet.
///
/// Constructed through [`Quadrilateral::new`], which rejects non-finite
/// coordinates and any collinear or coincident triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    points: [Point2D; 4],
}

impl Quadrilateral {
    pub fn new(points: [Point2D; 4]) -> Result<Self> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(TablecropError::Geometry(
                "quadrilateral has non-finite coordinates".into(),
            ));
        }
        for skip in 0..4 {
            let triple: Vec<Point2D> = (0..4).filter(|&i| i != skip).map(|i| points[i]).collect();
            // Test every vertex of the triple as the apex so that a short leg
            // cannot hide a collinearity.
            if is_collinear(triple[0], triple[1], triple[2])
                || is_collinear(triple[1], triple[2], triple[0])
                || is_collinear(triple[2], triple[0], triple[1])
            {
                return Err(TablecropError::Geometry(
                    "three corners are collinear or coincident".into(),
                ));
            }
        }
        Ok(Self { points })
    }

    /// The frame of a `width` x `height` image, through pixel centres.
    ///
    /// Not validated: images narrower than two pixels produce a degenerate
    /// frame, which callers treat as a plain crop rather than warping.
    pub fn full_frame(width: u32, height: u32) -> Self {
        let right = width.saturating_sub(1) as f64;
        let bottom = height.saturating_sub(1) as f64;
        Self {
            points: [
                Point2D::new(0.0, 0.0),
                Point2D::new(right, 0.0),
                Point2D::new(right, bottom),
                Point2D::new(0.0, bottom),
            ],
        }
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.points
    }
}

/// Canonical corner roles, in clockwise traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerRole {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl CornerRole {
    pub const ALL: [CornerRole; 4] = [
        CornerRole::TopLeft,
        CornerRole::TopRight,
        CornerRole::BottomRight,
        CornerRole::BottomLeft,
    ];
}

/// A quadrilateral whose corners carry fixed roles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuadrilateral {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl OrderedQuadrilateral {
    pub fn new(
        top_left: Point2D,
        top_right: Point2D,
        bottom_right: Point2D,
        bottom_left: Point2D,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Corners in role order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn corner(&self, role: CornerRole) -> Point2D {
        match role {
            CornerRole::TopLeft => self.top_left,
            CornerRole::TopRight => self.top_right,
            CornerRole::BottomRight => self.bottom_right,
            CornerRole::BottomLeft => self.bottom_left,
        }
    }

    /// Longer of the top and bottom edges.
    pub fn max_horizontal_edge(&self) -> f64 {
        self.top_left
            .distance(self.top_right)
            .max(self.bottom_left.distance(self.bottom_right))
    }

    /// Longer of the left and right edges.
    pub fn max_vertical_edge(&self) -> f64 {
        self.top_left
            .distance(self.bottom_left)
            .max(self.top_right.distance(self.bottom_right))
    }

    /// Whether the role-order traversal is a simple polygon, i.e. the two
    /// pairs of opposite edges do not cross.
    pub fn is_simple(&self) -> bool {
        let [a, b, c, d] = self.corners();
        !segments_cross(a, b, c, d) && !segments_cross(b, c, d, a)
    }
}

fn segments_cross(p1: Point2D, p2: Point2D, q1: Point2D, q2: Point2D) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn input_format_from_content_type() {
        assert_eq!(InputFormat::from_content_type("image/jpeg"), Some(InputFormat::Jpeg));
        assert_eq!(InputFormat::from_content_type("IMAGE/JPG"), Some(InputFormat::Jpeg));
        assert_eq!(InputFormat::from_content_type("image/x-ms-bmp"), Some(InputFormat::Bmp));
        assert_eq!(InputFormat::from_content_type("image/tiff"), Some(InputFormat::Tiff));
        assert_eq!(InputFormat::from_content_type("application/pdf"), None);
    }

    #[test]
    fn quadrilateral_accepts_skewed_table() {
        let quad = Quadrilateral::new([p(50.0, 40.0), p(350.0, 60.0), p(330.0, 280.0), p(30.0, 260.0)]);
        assert!(quad.is_ok());
    }

    #[test]
    fn quadrilateral_rejects_collinear_triple() {
        let quad = Quadrilateral::new([p(0.0, 0.0), p(50.0, 50.0), p(100.0, 100.0), p(0.0, 100.0)]);
        assert!(matches!(quad, Err(TablecropError::Geometry(_))));
    }

    #[test]
    fn quadrilateral_rejects_coincident_point() {
        let quad = Quadrilateral::new([p(0.0, 0.0), p(100.0, 0.0), p(100.0, 80.0), p(100.0, 80.0)]);
        assert!(matches!(quad, Err(TablecropError::Geometry(_))));
    }

    #[test]
    fn quadrilateral_rejects_nan() {
        let quad = Quadrilateral::new([p(f64::NAN, 0.0), p(100.0, 0.0), p(100.0, 80.0), p(0.0, 80.0)]);
        assert!(quad.is_err());
    }

    #[test]
    fn bowtie_is_not_simple() {
        let bowtie = OrderedQuadrilateral::new(p(0.0, 0.0), p(100.0, 100.0), p(100.0, 0.0), p(0.0, 100.0));
        assert!(!bowtie.is_simple());

        let square = OrderedQuadrilateral::new(p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0), p(0.0, 100.0));
        assert!(square.is_simple());
    }

    #[test]
    fn edge_lengths_take_the_maximum() {
        let quad = OrderedQuadrilateral::new(p(0.0, 0.0), p(100.0, 0.0), p(120.0, 50.0), p(0.0, 50.0));
        assert!((quad.max_horizontal_edge() - 120.0).abs() < 1e-9);
        assert!((quad.max_vertical_edge() - 20.0f64.hypot(50.0)).abs() < 1e-9);
    }
}

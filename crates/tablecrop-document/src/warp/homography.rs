// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Homography estimation from four point correspondences.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use tablecrop_core::{Point2D, Quadrilateral};
use tablecrop_core::error::{Result, TablecropError};

/// |det| of the normalized solution below which the mapping counts as
/// singular.
const SINGULAR_EPS: f64 = 1e-9;
/// Homogeneous w below which a mapped point is treated as at infinity.
const W_EPS: f64 = 1e-12;
/// Largest accepted corner reprojection error, in normalized units.
const REPROJECTION_EPS: f64 = 1e-6;

/// A 3x3 projective transform, guaranteed finite and invertible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Wrap an existing matrix after checking it is finite and invertible.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(geometry("homography has non-finite entries"));
        }
        if matrix.try_inverse().is_none() {
            return Err(geometry("homography is not invertible"));
        }
        Ok(Self { matrix })
    }

    /// Solve the homography that maps each `src[i]` onto `dst[i]`.
    ///
    /// Both point sets are normalized (centroid at the origin, mean distance
    /// sqrt 2) before the 8x8 system is solved, which keeps the system well
    /// conditioned for image-sized coordinates. Either set containing a
    /// collinear or coincident triple is rejected up front.
    pub fn from_correspondences(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Result<Self> {
        Quadrilateral::new(*src)?;
        Quadrilateral::new(*dst)?;

        let t_src = normalizing_transform(src)?;
        let t_dst = normalizing_transform(dst)?;
        let src_n = src.map(|p| transform_affine(&t_src, p));
        let dst_n = dst.map(|p| transform_affine(&t_dst, p));

        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for (i, (s, d)) in src_n.iter().zip(dst_n.iter()).enumerate() {
            let r = 2 * i;
            a[(r, 0)] = s.x;
            a[(r, 1)] = s.y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -d.x * s.x;
            a[(r, 7)] = -d.x * s.y;
            b[r] = d.x;

            a[(r + 1, 3)] = s.x;
            a[(r + 1, 4)] = s.y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -d.y * s.x;
            a[(r + 1, 7)] = -d.y * s.y;
            b[r + 1] = d.y;
        }

        let h = a
            .lu()
            .solve(&b)
            .ok_or_else(|| geometry("corner correspondences are degenerate"))?;
        let normalized = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);

        let det = normalized.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return Err(geometry("homography is singular"));
        }
        let solved = Self { matrix: normalized };
        for (s, d) in src_n.iter().zip(dst_n.iter()) {
            match solved.apply(*s) {
                Some(mapped) if mapped.distance(*d) <= REPROJECTION_EPS => {}
                _ => return Err(geometry("homography does not reproduce the corners")),
            }
        }

        let t_dst_inv = t_dst
            .try_inverse()
            .ok_or_else(|| geometry("destination normalization is singular"))?;
        let mut matrix = t_dst_inv * normalized * t_src;
        let scale = matrix[(2, 2)];
        if scale.abs() > W_EPS {
            matrix /= scale;
        }
        Self::from_matrix(matrix)
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    /// The inverse mapping.
    pub fn inverse(&self) -> Result<Self> {
        let inv = self
            .matrix
            .try_inverse()
            .ok_or_else(|| geometry("homography is not invertible"))?;
        Self::from_matrix(inv)
    }

    /// Map a point; `None` when it lands at infinity.
    pub fn apply(&self, p: Point2D) -> Option<Point2D> {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= W_EPS {
            return None;
        }
        let mapped = Point2D::new(v[0] / w, v[1] / w);
        mapped.is_finite().then_some(mapped)
    }
}

/// Similarity transform moving the centroid to the origin and scaling the
/// mean distance to sqrt 2.
fn normalizing_transform(points: &[Point2D; 4]) -> Result<Matrix3<f64>> {
    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = points
        .iter()
        .map(|p| p.distance(Point2D::new(cx, cy)))
        .sum::<f64>()
        / 4.0;
    if !mean_dist.is_finite() || mean_dist <= f64::EPSILON {
        return Err(geometry("corner points coincide"));
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    Ok(Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0))
}

fn transform_affine(t: &Matrix3<f64>, p: Point2D) -> Point2D {
    Point2D::new(
        t[(0, 0)] * p.x + t[(0, 1)] * p.y + t[(0, 2)],
        t[(1, 0)] * p.x + t[(1, 1)] * p.y + t[(1, 2)],
    )
}

fn geometry(msg: &str) -> TablecropError {
    TablecropError::Geometry(msg.to_owned())
}

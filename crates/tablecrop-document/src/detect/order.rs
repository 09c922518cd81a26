// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering — assigns top-left, top-right, bottom-right and bottom-left
// roles to four unordered points.

use std::cmp::Ordering;

use tablecrop_core::{OrderedQuadrilateral, Point2D, Quadrilateral};

/// Assign canonical roles to the corners of `quad`.
///
/// Top-left is the point with the smallest `x + y`; exact ties fall to the
/// smaller `y - x` (the higher point), then to input position. The other
/// roles follow clockwise (on screen, y down) around the centroid. For a
/// convex quadrilateral this matches the sum/difference rule, does not depend
/// on input order, and always gives four distinct roles.
pub fn order_corners(quad: &Quadrilateral) -> OrderedQuadrilateral {
    let points = quad.points();

    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;

    // atan2 grows clockwise on screen because y points down.
    let mut by_angle: [(usize, f64); 4] =
        std::array::from_fn(|i| (i, (points[i].y - cy).atan2(points[i].x - cx)));
    by_angle.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let top_left = (0..4)
        .min_by(|&a, &b| top_left_key(points, a, b))
        .unwrap_or(0);
    let start = by_angle
        .iter()
        .position(|&(i, _)| i == top_left)
        .unwrap_or(0);

    let at = |offset: usize| -> Point2D { points[by_angle[(start + offset) % 4].0] };
    OrderedQuadrilateral::new(at(0), at(1), at(2), at(3))
}

fn top_left_key(points: &[Point2D; 4], a: usize, b: usize) -> Ordering {
    let (pa, pb) = (points[a], points[b]);
    (pa.x + pa.y)
        .total_cmp(&(pb.x + pb.y))
        .then((pa.y - pa.x).total_cmp(&(pb.y - pb.x)))
        .then(a.cmp(&b))
}

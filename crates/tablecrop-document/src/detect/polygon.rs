// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Closed-polygon helpers: contours, shoelace area, perimeter, convexity and
// Douglas–Peucker simplification.

use tablecrop_core::{Point2D, cross};

/// A closed polygon traced from the edge map. Not necessarily convex.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2D>,
}

impl Contour {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (absolute shoelace value).
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f64 {
        polygon_perimeter(&self.points)
    }
}

/// Area of a closed polygon via the shoelace formula. Vertices may be in
/// either winding order.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    twice_area.abs() / 2.0
}

/// Length of the closed polygon boundary, including the closing edge.
pub fn polygon_perimeter(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| points[i].distance(points[(i + 1) % n])).sum()
}

/// Whether the closed polygon is strictly convex: every turn has the same
/// non-zero orientation.
pub fn is_convex(points: &[Point2D]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for i in 0..n {
        let turn = cross(points[i], points[(i + 1) % n], points[(i + 2) % n]);
        if turn == 0.0 {
            return false;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    true
}

/// Simplify a closed polygon with the Douglas–Peucker algorithm.
///
/// The polygon is cut at two mutually distant vertices (both lie on the
/// convex hull, so they survive as corners) and each half is simplified as an
/// open chain. The result never repeats its first vertex.
pub fn approximate_closed(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let first = farthest_from(points, points[0]);
    let second = farthest_from(points, points[first]);
    if first == second {
        return vec![points[first]];
    }
    let (a, b) = (first.min(second), first.max(second));

    // Chain a..=b, then b..=a wrapping around the end of the slice.
    let forward: Vec<Point2D> = points[a..=b].to_vec();
    let backward: Vec<Point2D> = points[b..]
        .iter()
        .chain(points[..=a].iter())
        .copied()
        .collect();

    let mut result = simplify_open(&forward, epsilon);
    result.pop();
    let mut tail = simplify_open(&backward, epsilon);
    tail.pop();
    result.append(&mut tail);
    result
}

fn farthest_from(points: &[Point2D], origin: Point2D) -> usize {
    let mut best = 0;
    let mut best_dist = -1.0;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance(origin);
        if d > best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Douglas–Peucker on an open chain. Endpoints are always kept. Uses an
/// explicit work stack so very long contours cannot exhaust the call stack.
fn simplify_open(chain: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    let n = chain.len();
    if n <= 2 {
        return chain.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut split = start;
        let mut dmax = 0.0;
        for i in start + 1..end {
            let d = distance_to_line(chain[i], chain[start], chain[end]);
            if d > dmax {
                split = i;
                dmax = d;
            }
        }
        if dmax > epsilon {
            keep[split] = true;
            stack.push((start, split));
            stack.push((split, end));
        }
    }

    chain
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Perpendicular distance from `p` to the line through `a` and `b`, or the
/// point distance when `a == b`.
fn distance_to_line(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let len = a.distance(b);
    if len <= f64::EPSILON {
        return p.distance(a);
    }
    cross(a, b, p).abs() / len
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection — reduces each contour to four vertices, keeps the
// convex ones that are large enough, and picks the biggest. Falls back to the
// full image frame when nothing qualifies.

use tablecrop_core::config::DetectionConfig;
use tablecrop_core::{Point2D, Quadrilateral};
use tracing::{debug, info, instrument, warn};

use super::order::order_corners;
use super::polygon::{Contour, approximate_closed, is_convex, polygon_area};

/// Outcome of quadrilateral selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// A table boundary was found in the image.
    Detected(Quadrilateral),
    /// Nothing qualified; the quadrilateral is the image frame itself.
    FullFrame(Quadrilateral),
}

impl Selection {
    pub fn quadrilateral(&self) -> &Quadrilateral {
        match self {
            Self::Detected(quad) | Self::FullFrame(quad) => quad,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FullFrame(_))
    }
}

/// Scored four-vertex survivor.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    quad: Quadrilateral,
    area: f64,
    /// |ln(candidate aspect) - ln(image aspect)|; smaller is closer.
    aspect_distance: f64,
}

/// Picks the best table quadrilateral out of a contour sequence.
pub struct QuadSelector<'a> {
    config: &'a DetectionConfig,
}

impl<'a> QuadSelector<'a> {
    pub fn new(config: &'a DetectionConfig) -> Self {
        Self { config }
    }

    /// Select the largest convex quadrilateral from `contours`, or the frame
    /// of a `width` x `height` image when none qualifies.
    #[instrument(skip(self, contours))]
    pub fn select(
        &self,
        contours: impl IntoIterator<Item = Contour>,
        width: u32,
        height: u32,
    ) -> Selection {
        let image_area = width as f64 * height as f64;
        let min_area = image_area * self.config.min_quad_area_fraction;
        let image_aspect = aspect_ln(width as f64, height as f64);

        let mut considered = 0usize;
        let mut best: Option<Candidate> = None;

        for contour in contours {
            considered += 1;
            let Some(points) = self.approximate_quad(&contour) else {
                continue;
            };
            let Some(candidate) = self.score(points, min_area, image_aspect) else {
                continue;
            };
            if best.is_none_or(|current| self.beats(&candidate, &current)) {
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => {
                info!(
                    considered,
                    area = candidate.area,
                    area_fraction = candidate.area / image_area,
                    "Table quadrilateral selected"
                );
                Selection::Detected(candidate.quad)
            }
            None => {
                warn!(
                    considered,
                    "No qualifying quadrilateral; falling back to the full frame"
                );
                Selection::FullFrame(Quadrilateral::full_frame(width, height))
            }
        }
    }

    /// Reduce a contour to exactly four vertices by raising the tolerance step
    /// by step. Gives up once the tolerance or iteration cap is reached, or
    /// when the polygon collapses below four vertices.
    pub fn approximate_quad(&self, contour: &Contour) -> Option<[Point2D; 4]> {
        let perimeter = contour.perimeter();
        if perimeter <= 0.0 {
            return None;
        }

        for step in 0..self.config.approx_max_iterations {
            let fraction =
                self.config.approx_epsilon_start + step as f64 * self.config.approx_epsilon_step;
            if fraction > self.config.approx_epsilon_max {
                break;
            }
            let approx = approximate_closed(contour.points(), fraction * perimeter);
            match approx.len() {
                4 => return Some([approx[0], approx[1], approx[2], approx[3]]),
                n if n < 4 => {
                    debug!(vertices = n, fraction, "Contour collapsed below four vertices");
                    return None;
                }
                _ => {}
            }
        }
        None
    }

    fn score(&self, points: [Point2D; 4], min_area: f64, image_aspect: f64) -> Option<Candidate> {
        let quad = Quadrilateral::new(points).ok()?;
        if !is_convex(&points) {
            return None;
        }
        let area = polygon_area(&points);
        if area < min_area {
            return None;
        }

        let ordered = order_corners(&quad);
        let aspect = aspect_ln(ordered.max_horizontal_edge(), ordered.max_vertical_edge());
        Some(Candidate {
            quad,
            area,
            aspect_distance: (aspect - image_aspect).abs(),
        })
    }

    /// Larger area wins; areas within the tie tolerance defer to the aspect
    /// ratio closest to the image's.
    fn beats(&self, challenger: &Candidate, current: &Candidate) -> bool {
        let larger = challenger.area.max(current.area);
        let tied = (challenger.area - current.area).abs() <= self.config.area_tie_tolerance * larger;
        if tied {
            challenger.aspect_distance < current.aspect_distance
        } else {
            challenger.area > current.area
        }
    }
}

fn aspect_ln(width: f64, height: f64) -> f64 {
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    (width / height).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    /// Boundary of a polygon sampled every pixel along each edge.
    fn densify(corners: &[Point2D]) -> Contour {
        let mut pts = Vec::new();
        for i in 0..corners.len() {
            let (a, b) = (corners[i], corners[(i + 1) % corners.len()]);
            let steps = a.distance(b).ceil().max(1.0) as usize;
            for s in 0..steps {
                let t = s as f64 / steps as f64;
                pts.push(p(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        Contour::new(pts)
    }

    #[test]
    fn picks_the_largest_quadrilateral() {
        let config = DetectionConfig::default();
        let small = densify(&[p(10.0, 10.0), p(110.0, 10.0), p(110.0, 90.0), p(10.0, 90.0)]);
        let large = densify(&[p(50.0, 40.0), p(350.0, 60.0), p(330.0, 280.0), p(30.0, 260.0)]);

        let selection = QuadSelector::new(&config).select(vec![small, large], 400, 300);
        assert!(!selection.is_fallback());
        let points = selection.quadrilateral().points();
        assert!(points.contains(&p(350.0, 60.0)), "got {points:?}");
    }

    #[test]
    fn no_contours_falls_back_to_full_frame() {
        let config = DetectionConfig::default();
        let selection = QuadSelector::new(&config).select(Vec::new(), 640, 480);
        assert!(selection.is_fallback());
        assert_eq!(selection.quadrilateral(), &Quadrilateral::full_frame(640, 480));
    }

    #[test]
    fn tiny_quadrilateral_is_not_selected() {
        let config = DetectionConfig::default();
        // 2% of the frame, below the 10% default.
        let tiny = densify(&[p(10.0, 10.0), p(50.0, 10.0), p(50.0, 70.0), p(10.0, 70.0)]);
        assert!(QuadSelector::new(&config).select(vec![tiny], 400, 300).is_fallback());
    }

    #[test]
    fn triangle_never_reduces_to_four_vertices() {
        let config = DetectionConfig::default();
        let triangle = densify(&[p(20.0, 20.0), p(380.0, 20.0), p(200.0, 280.0)]);
        let selector = QuadSelector::new(&config);
        assert!(selector.approximate_quad(&triangle).is_none());
        assert!(selector.select(vec![triangle], 400, 300).is_fallback());
    }

    #[test]
    fn concave_quadrilateral_loses_to_smaller_convex_one() {
        let config = DetectionConfig::default();
        let selector = QuadSelector::new(&config);
        // Dart with a reflex vertex at (120, 120): 31000 px^2, about 26% of
        // the frame, so only convexity can rule it out.
        let dart = densify(&[p(20.0, 20.0), p(380.0, 20.0), p(120.0, 120.0), p(20.0, 280.0)]);
        let dart_quad = selector.approximate_quad(&dart).expect("four vertices");
        assert!(!is_convex(&dart_quad));
        assert!(polygon_area(&dart_quad) > 0.25 * 400.0 * 300.0);

        // 140x130 = 18200 px^2, about 15% of the frame.
        let square = densify(&[p(200.0, 150.0), p(340.0, 150.0), p(340.0, 280.0), p(200.0, 280.0)]);

        let selection = selector.select(vec![dart.clone(), square], 400, 300);
        assert!(!selection.is_fallback());
        assert!(selection.quadrilateral().points().contains(&p(340.0, 280.0)));

        assert!(selector.select(vec![dart], 400, 300).is_fallback());
    }

    #[test]
    fn pentagon_reduces_once_tolerance_grows() {
        let config = DetectionConfig::default();
        // Shallow 8 px bump on the top edge: gone after a few tolerance steps.
        let outline = densify(&[
            p(20.0, 20.0),
            p(200.0, 12.0),
            p(380.0, 20.0),
            p(380.0, 280.0),
            p(20.0, 280.0),
        ]);
        let quad = QuadSelector::new(&config)
            .approximate_quad(&outline)
            .expect("four vertices");
        assert!(quad.iter().all(|q| q.distance(p(200.0, 12.0)) > 1.0));
    }

    #[test]
    fn equal_areas_prefer_the_image_aspect_ratio() {
        let config = DetectionConfig::default();
        // Both 240x180 = 43200 and 180x240; the image is landscape 400x300.
        let landscape = densify(&[p(10.0, 10.0), p(250.0, 10.0), p(250.0, 190.0), p(10.0, 190.0)]);
        let portrait = densify(&[p(10.0, 10.0), p(190.0, 10.0), p(190.0, 250.0), p(10.0, 250.0)]);

        for order in [vec![landscape.clone(), portrait.clone()], vec![portrait, landscape]] {
            let selection = QuadSelector::new(&config).select(order, 400, 300);
            assert!(selection.quadrilateral().points().contains(&p(250.0, 190.0)));
        }
    }
}

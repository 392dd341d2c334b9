use crate::math::bernstein::cubic_point;
use crate::math::distance_2d::distance_to_line;
use crate::math::{Point2, Vector2};

/// Relative tolerance used to decide that a cubic is a straight line.
const STRAIGHT_TOLERANCE: f64 = 1e-9;

/// A cubic Bézier segment in scaled-tangent form.
///
/// For a segment from `P0` to `P3 = end` with true control points `P1`, `P2`:
/// - `start_tangent = 3 · (P1 − P0)`
/// - `end_tangent = 3 · (P3 − P2)`
///
/// Path writers recover the control points as `P1 = P0 + start_tangent / 3`
/// and `P2 = P3 − end_tangent / 3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPatch {
    pub end: Point2,
    pub start_tangent: Vector2,
    pub end_tangent: Vector2,
}

impl CubicPatch {
    /// Creates a new patch from its end point and scaled tangents.
    #[must_use]
    pub fn new(end: Point2, start_tangent: Vector2, end_tangent: Vector2) -> Self {
        Self {
            end,
            start_tangent,
            end_tangent,
        }
    }

    /// Builds a patch from true Bézier control points.
    #[must_use]
    pub fn from_control_points(from: &Point2, c1: &Point2, c2: &Point2, end: &Point2) -> Self {
        Self {
            end: *end,
            start_tangent: (c1 - from) * 3.0,
            end_tangent: (end - c2) * 3.0,
        }
    }

    /// Returns the true control points `(P1, P2)` for a patch starting at `from`.
    #[must_use]
    pub fn control_points(&self, from: &Point2) -> (Point2, Point2) {
        (
            *from + self.start_tangent / 3.0,
            self.end - self.end_tangent / 3.0,
        )
    }

    /// Evaluates the patch starting at `from` at parameter `t ∈ [0, 1]`.
    #[must_use]
    pub fn point_at(&self, from: &Point2, t: f64) -> Point2 {
        let (c1, c2) = self.control_points(from);
        cubic_point(from, &c1, &c2, &self.end, t)
    }

    /// Returns `true` if both control points lie on the chord `from → end`.
    ///
    /// Control points must sit on the chord's supporting line and project
    /// inside the chord, so the patch traces the segment without overshoot.
    #[must_use]
    pub fn is_straight(&self, from: &Point2) -> bool {
        let chord = self.end - from;
        let len_sq = chord.norm_squared();
        let tol = STRAIGHT_TOLERANCE * (1.0 + len_sq.sqrt());
        let (c1, c2) = self.control_points(from);
        if len_sq < 1e-20 {
            return (c1 - from).norm() <= tol && (c2 - from).norm() <= tol;
        }
        [c1, c2].iter().all(|c| {
            let along = (c - from).dot(&chord) / len_sq;
            distance_to_line(c, from, &self.end) <= tol && (0.0..=1.0).contains(&along)
        })
    }
}

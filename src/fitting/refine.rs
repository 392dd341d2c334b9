use crate::math::bernstein::{cubic_derivative_third, cubic_point, cubic_second_derivative_sixth};
use crate::math::Point2;

/// Smallest second derivative magnitude for which a Newton step is taken.
const MIN_CURVATURE: f64 = 1e-7;

/// One Newton-Raphson step moving `t` towards the parameter of the point on
/// the cubic `(p0, p1, p2, p3)` closest to `pt`.
///
/// Minimises `F(t) = |pt − B(t)|²` with
/// `F' = −6·A·B` and `F'' = 18·B·B − 12·A·C`, where `A = pt − B(t)`,
/// `B = B'(t) / 3` and `C = B''(t) / 6`. Returns `t` unchanged when `|F''|` is
/// too small.
#[must_use]
pub fn refine_parameter(pt: &Point2, p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> f64 {
    let a = pt - cubic_point(p0, p1, p2, p3, t);
    let b = cubic_derivative_third(p0, p1, p2, p3, t);
    let c = cubic_second_derivative_sixth(p0, p1, p2, p3, t);

    let df = -6.0 * a.dot(&b);
    let ddf = 18.0 * b.dot(&b) - 12.0 * a.dot(&c);
    if ddf.abs() > MIN_CURVATURE {
        t - df / ddf
    } else {
        t
    }
}

/// Refines every interior parameter of a window against the cubic
/// `(points[0], c1, c2, points[n - 1])`.
///
/// Results are clamped to `[0, 1]` and forced to be non-decreasing.
pub fn refine_parameters(points: &[Point2], params: &mut [f64], c1: &Point2, c2: &Point2) {
    let n = points.len().min(params.len());
    if n < 3 {
        return;
    }
    let start = points[0];
    let end = points[n - 1];
    for i in 1..n - 1 {
        let refined = refine_parameter(&points[i], &start, c1, c2, &end, params[i]).clamp(0.0, 1.0);
        params[i] = refined.max(params[i - 1]);
    }
}

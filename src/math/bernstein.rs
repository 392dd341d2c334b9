//! Bernstein basis polynomials and cubic Bézier evaluation.
//!
//! Cubic basis: `N0 = (1-t)³`, `N1 = 3t(1-t)²`, `N2 = 3t²(1-t)`, `N3 = t³`.
//! The quadratic and linear bases are used for the first and second
//! derivative terms of parameter refinement.

use super::{Point2, Vector2};

#[must_use]
pub fn n0(t: f64) -> f64 {
    let s = 1.0 - t;
    s * s * s
}

#[must_use]
pub fn n1(t: f64) -> f64 {
    let s = 1.0 - t;
    3.0 * t * s * s
}

#[must_use]
pub fn n2(t: f64) -> f64 {
    3.0 * t * t * (1.0 - t)
}

#[must_use]
pub fn n3(t: f64) -> f64 {
    t * t * t
}

/// Quadratic basis `[(1-t)², 2t(1-t), t²]`.
#[must_use]
pub fn quadratic(t: f64) -> [f64; 3] {
    let s = 1.0 - t;
    [s * s, 2.0 * t * s, t * t]
}

/// Linear basis `[1-t, t]`.
#[must_use]
pub fn linear(t: f64) -> [f64; 2] {
    [1.0 - t, t]
}

/// Evaluates the cubic Bézier with control points `p0..p3` at `t`.
#[must_use]
pub fn cubic_point(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> Point2 {
    let v = p0.coords * n0(t) + p1.coords * n1(t) + p2.coords * n2(t) + p3.coords * n3(t);
    Point2::from(v)
}

/// First derivative of the cubic at `t`, divided by 3.
#[must_use]
pub fn cubic_derivative_third(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> Vector2 {
    let [b0, b1, b2] = quadratic(t);
    (p1 - p0) * b0 + (p2 - p1) * b1 + (p3 - p2) * b2
}

/// Second derivative of the cubic at `t`, divided by 6.
#[must_use]
pub fn cubic_second_derivative_sixth(
    p0: &Point2,
    p1: &Point2,
    p2: &Point2,
    p3: &Point2,
    t: f64,
) -> Vector2 {
    let [b0, b1] = linear(t);
    (p0.coords - p1.coords * 2.0 + p2.coords) * b0 + (p1.coords - p2.coords * 2.0 + p3.coords) * b1
}

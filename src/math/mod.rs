pub mod bernstein;
pub mod distance_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2x2 matrix used by the least-squares control point solve.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Total chord length below which a window is considered degenerate.
pub const DEGENERATE_LENGTH: f64 = 1e-4;

/// Determinant below which the fit matrix is considered singular.
pub const SINGULAR_DETERMINANT: f64 = 1e-6;

/// Chebyshev distance under which the last point of a subpath closes it.
pub const CLOSE_TOLERANCE: f64 = 1e-5;

/// Returns the Chebyshev (L-infinity) distance between two points.
#[must_use]
pub fn chebyshev_distance(a: &Point2, b: &Point2) -> f64 {
    (a - b).amax()
}

/// Returns `true` if both coordinates of `p` are finite.
#[must_use]
pub fn is_finite(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

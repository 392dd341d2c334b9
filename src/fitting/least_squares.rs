use crate::math::bernstein::{n0, n1, n2, n3};
use crate::math::{Matrix2, Point2, SINGULAR_DETERMINANT};

/// Solves for the two inner control points of the cubic that best fits
/// `points` at parameters `params`, in the least-squares sense.
///
/// The end points are fixed to `points[0]` and `points[n - 1]`. Each interior
/// sample contributes one row of the normal equations
/// `M · [P1; P2] = [Σ N1·Q; Σ N2·Q]` with `Q = p − N0·P0 − N3·P3`; both axes
/// are solved with the same inverse.
///
/// Returns `None` when `|det(M)|` is below [`SINGULAR_DETERMINANT`] or there
/// are fewer than 3 points.
#[must_use]
pub fn solve_control_points(points: &[Point2], params: &[f64]) -> Option<(Point2, Point2)> {
    let n = points.len();
    if n < 3 || params.len() < n {
        return None;
    }
    let start = points[0];
    let end = points[n - 1];

    let mut m = Matrix2::zeros();
    // Rows: N1, N2 projections. Columns: x, y.
    let mut rhs = Matrix2::zeros();
    for (p, &t) in points[1..n - 1].iter().zip(&params[1..n - 1]) {
        let b1 = n1(t);
        let b2 = n2(t);
        m[(0, 0)] += b1 * b1;
        m[(0, 1)] += b1 * b2;
        m[(1, 1)] += b2 * b2;

        let q = p.coords - start.coords * n0(t) - end.coords * n3(t);
        rhs[(0, 0)] += b1 * q.x;
        rhs[(0, 1)] += b1 * q.y;
        rhs[(1, 0)] += b2 * q.x;
        rhs[(1, 1)] += b2 * q.y;
    }
    m[(1, 0)] = m[(0, 1)];

    if m.determinant().abs() < SINGULAR_DETERMINANT {
        return None;
    }
    let solution = m.try_inverse()? * rhs;
    Some((
        Point2::new(solution[(0, 0)], solution[(0, 1)]),
        Point2::new(solution[(1, 0)], solution[(1, 1)]),
    ))
}

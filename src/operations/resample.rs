use crate::geometry::PathCommand;
use crate::math::Point2;

/// Splits a line or cubic command starting at `from` into evenly spaced points.
///
/// Returns the points after `from`, ending with the command's end point. The
/// number of pieces is `ceil(length / spacing)`, clamped to
/// `1..=max_pieces`; cubic lengths are estimated from the control polygon.
/// Other commands yield only their end point, if any.
#[must_use]
pub fn resample_command(from: &Point2, command: &PathCommand, spacing: f64, max_pieces: usize) -> Vec<Point2> {
    match command {
        PathCommand::LineTo(end) => {
            let pieces = piece_count((end - from).norm(), spacing, max_pieces);
            (1..=pieces)
                .map(|k| {
                    if k == pieces {
                        *end
                    } else {
                        from + (end - from) * fraction(k, pieces)
                    }
                })
                .collect()
        }
        PathCommand::CubicTo(patch) => {
            let (c1, c2) = patch.control_points(from);
            let polygon = (c1 - from).norm() + (c2 - c1).norm() + (patch.end - c2).norm();
            let pieces = piece_count(polygon, spacing, max_pieces);
            (1..=pieces)
                .map(|k| {
                    if k == pieces {
                        patch.end
                    } else {
                        patch.point_at(from, fraction(k, pieces))
                    }
                })
                .collect()
        }
        _ => command.end_point().into_iter().collect(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn piece_count(length: f64, spacing: f64, max_pieces: usize) -> usize {
    let max = max_pieces.max(1);
    if spacing <= 0.0 {
        return max;
    }
    let pieces = (length / spacing).ceil();
    if pieces >= max as f64 {
        max
    } else {
        (pieces as usize).max(1)
    }
}

#[allow(clippy::cast_precision_loss)]
fn fraction(k: usize, pieces: usize) -> f64 {
    k as f64 / pieces as f64
}

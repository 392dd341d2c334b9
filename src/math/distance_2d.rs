use super::Point2;

/// Returns the squared distance from `p` to the chord `a → b`.
///
/// The result is the smaller of the squared distances to the two endpoints
/// and, when the perpendicular foot falls inside the chord, the squared
/// perpendicular distance to the chord's supporting line.
#[must_use]
pub fn squared_distance_to_chord(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ap = p - a;
    let bp = p - b;
    let nearest_end = ap.norm_squared().min(bp.norm_squared());

    let seg = b - a;
    let len_sq = seg.norm_squared();
    if len_sq < 1e-20 {
        // Degenerate chord (zero length).
        return nearest_end;
    }

    let cross = ap.x * seg.y - ap.y * seg.x;
    let perp = cross * cross / len_sq;
    if perp < nearest_end && ap.dot(&seg) >= 0.0 && bp.dot(&(-seg)) >= 0.0 {
        perp
    } else {
        nearest_end
    }
}

/// Returns the distance from `p` to the infinite line through `a` and `b`.
///
/// Falls back to the distance to `a` when the two points coincide.
#[must_use]
pub fn distance_to_line(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let seg = b - a;
    let len = seg.norm();
    let ap = p - a;
    if len < 1e-20 {
        return ap.norm();
    }
    (ap.x * seg.y - ap.y * seg.x).abs() / len
}

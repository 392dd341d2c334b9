use crate::math::bernstein::cubic_point;
use crate::math::Point2;

use super::tables::FittingTables;

/// Fit error of a cubic against the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMeasure {
    /// The error compared against the squared threshold.
    pub error: f64,
    /// Interior sample with the largest (forced-weighted) squared distance.
    pub worst_index: usize,
}

/// Tracks the worst-fitting sample; forced samples count double.
#[derive(Debug, Clone, Copy)]
struct WorstTracker {
    index: usize,
    score: f64,
}

impl WorstTracker {
    fn new() -> Self {
        Self {
            index: 1,
            score: f64::NEG_INFINITY,
        }
    }

    fn offer(&mut self, index: usize, dist: f64, forced: bool) {
        let score = if forced { 2.0 * dist } else { dist };
        if score > self.score {
            self.index = index;
            self.score = score;
        }
    }
}

/// Measures how well the cubic `(P0, c1, c2, P3)` fits the window.
///
/// Each interior sample is compared with the curve at its parameter. Windows
/// of at most `splotch_killer_limit` samples also compare the midpoint of
/// every pair of consecutive samples with the curve at the mid parameter;
/// the per-gap error `(d_cur + d_prev + d_mid) / 3` is weighted by the gap's
/// length and the sum normalised by the total chord length. This rejects
/// cubics that interpolate few samples exactly but bow away between them.
/// Larger windows use the plain sum of squared sample distances.
#[must_use]
pub fn measure(
    tables: &FittingTables,
    c1: &Point2,
    c2: &Point2,
    splotch_killer_limit: usize,
) -> ErrorMeasure {
    let points = tables.points();
    let params = tables.params();
    let forced = tables.forced();
    let n = points.len();
    let start = points[0];
    let end = points[n - 1];
    let curve = |t: f64| cubic_point(&start, c1, c2, &end, t);

    let mut worst = WorstTracker::new();
    let mut error = 0.0;

    if n <= splotch_killer_limit {
        let lengths = tables.lengths();
        let mut prev_dist = 0.0;
        for i in 1..n {
            // The end sample is interpolated exactly.
            let cur_dist = if i + 1 < n {
                (curve(params[i]) - points[i]).norm_squared()
            } else {
                0.0
            };
            let mid_sample = points[i - 1] + (points[i] - points[i - 1]) * 0.5;
            let mid_curve = curve(0.5 * (params[i] + params[i - 1]));
            let mid_dist = (mid_curve - mid_sample).norm_squared();

            error += (cur_dist + prev_dist + mid_dist) / 3.0 * lengths[i];
            if i + 1 < n {
                worst.offer(i, cur_dist, forced[i]);
            }
            prev_dist = cur_dist;
        }
        let total = tables.total_length();
        if total > 0.0 {
            error /= total;
        }
    } else {
        for i in 1..n - 1 {
            let cur_dist = (curve(params[i]) - points[i]).norm_squared();
            error += cur_dist;
            worst.offer(i, cur_dist, forced[i]);
        }
    }

    ErrorMeasure {
        error,
        worst_index: worst.index,
    }
}

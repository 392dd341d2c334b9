use tracing::trace;

use crate::geometry::CubicPatch;
use crate::math::distance_2d::squared_distance_to_chord;
use crate::math::{Point2, DEGENERATE_LENGTH};

use super::error_metric::{measure, ErrorMeasure};
use super::least_squares::solve_control_points;
use super::refine::refine_parameters;
use super::tables::FittingTables;
use super::{Fit, FitOutcome, FitParams, FittedSegment, RejectReason, Rejection};

/// Slack allowed when comparing the refined fit's error to the unrefined one.
const REFINE_SLACK: f64 = 1e-5;

/// Fits a single line or cubic patch to the window held in [`FittingTables`].
#[derive(Debug, Clone, Copy)]
pub struct FitEngine {
    splotch_killer_limit: usize,
    refine: bool,
}

impl FitEngine {
    /// Creates an engine configured from `params`.
    #[must_use]
    pub fn new(params: &FitParams) -> Self {
        Self {
            splotch_killer_limit: params.splotch_killer_limit,
            refine: params.refine,
        }
    }

    /// Fits the current window of `tables` against `threshold`.
    ///
    /// - 2 samples: a line, always accepted.
    /// - 3 samples: a cubic with `start_tangent = P1 − P0` and
    ///   `end_tangent = P2 − P1`, always accepted.
    /// - Near-zero chord length: rejected as degenerate.
    /// - Otherwise: least-squares cubic, accepted when its error is at most
    ///   `threshold²`, then optionally refined.
    ///
    /// The window parameters may be left refined after the call; loading the
    /// tables again re-derives them.
    pub fn fit(&self, tables: &mut FittingTables, threshold: f64) -> FitOutcome {
        let n = tables.len();
        if n < 2 {
            return FitOutcome::Rejected(Rejection {
                reason: RejectReason::Degenerate,
                worst_index: 0,
            });
        }
        let points = tables.points();
        let start = points[0];
        let end = points[n - 1];

        if n == 2 {
            return FitOutcome::Accepted(Fit {
                segment: FittedSegment::Line(end),
                error: 0.0,
                worst_index: 1,
            });
        }

        if n == 3 {
            let mid = points[1];
            return FitOutcome::Accepted(Fit {
                segment: FittedSegment::Cubic(CubicPatch::new(end, mid - start, end - mid)),
                error: 0.0,
                worst_index: 1,
            });
        }

        if tables.total_length() < DEGENERATE_LENGTH {
            return FitOutcome::Rejected(Rejection {
                reason: RejectReason::Degenerate,
                worst_index: chord_worst(tables),
            });
        }

        let Some((c1, c2)) = solve_control_points(points, tables.params()) else {
            return FitOutcome::Rejected(Rejection {
                reason: RejectReason::SingularMatrix,
                worst_index: chord_worst(tables),
            });
        };

        let limit = threshold * threshold;
        let ErrorMeasure { error, worst_index } = measure(tables, &c1, &c2, self.splotch_killer_limit);
        if error > limit {
            return FitOutcome::Rejected(Rejection {
                reason: RejectReason::ThresholdExceeded { error },
                worst_index,
            });
        }

        let mut fit = Fit {
            segment: FittedSegment::Cubic(CubicPatch::from_control_points(&start, &c1, &c2, &end)),
            error,
            worst_index,
        };
        if self.refine {
            if let Some(refined) = self.refined(tables, &c1, &c2, error, limit) {
                trace!(before = error, after = refined.error, "refined fit parameters");
                fit = refined;
            }
        }
        FitOutcome::Accepted(fit)
    }

    /// Runs one Newton-Raphson pass over the parameters and refits.
    ///
    /// Returns the refitted patch only if it is no worse than `error` (within
    /// [`REFINE_SLACK`]) and still within `limit`.
    fn refined(
        &self,
        tables: &mut FittingTables,
        c1: &Point2,
        c2: &Point2,
        error: f64,
        limit: f64,
    ) -> Option<Fit> {
        {
            let (points, params) = tables.points_and_params_mut();
            refine_parameters(points, params, c1, c2);
        }
        let points = tables.points();
        let start = points[0];
        let end = points[points.len() - 1];
        let (r1, r2) = solve_control_points(points, tables.params())?;
        let refined = measure(tables, &r1, &r2, self.splotch_killer_limit);
        if refined.error <= error + REFINE_SLACK && refined.error <= limit {
            Some(Fit {
                segment: FittedSegment::Cubic(CubicPatch::from_control_points(&start, &r1, &r2, &end)),
                error: refined.error,
                worst_index: refined.worst_index,
            })
        } else {
            None
        }
    }
}

/// Worst sample by distance to the window's chord, forced samples counting double.
fn chord_worst(tables: &FittingTables) -> usize {
    let points = tables.points();
    let forced = tables.forced();
    let start = points[0];
    let end = points[points.len() - 1];
    let mut worst_index = 1;
    let mut worst_score = f64::NEG_INFINITY;
    for (i, (p, &is_forced)) in points.iter().zip(forced).enumerate().skip(1) {
        let d = squared_distance_to_chord(p, &start, &end);
        let score = if is_forced { 2.0 * d } else { d };
        if score > worst_score {
            worst_index = i;
            worst_score = score;
        }
    }
    worst_index
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Sample;
    use crate::math::Vector2;
    use approx::assert_relative_eq;

    fn engine() -> FitEngine {
        FitEngine::new(&FitParams::default())
    }

    fn fit(samples: &[Sample], threshold: f64) -> FitOutcome {
        let mut tables = FittingTables::new();
        tables.load(samples);
        engine().fit(&mut tables, threshold)
    }

    fn arc_samples(n: u32, radius: f64, sweep: f64) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let a = sweep * f64::from(i) / f64::from(n - 1);
                Sample::regular(radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    #[test]
    fn two_samples_make_a_line() {
        let samples = Sample::polyline(&[(0.0, 0.0), (5.0, 1.0)]);
        let outcome = fit(&samples, 0.0);
        let fit = outcome.accepted().unwrap();
        assert_eq!(fit.segment, FittedSegment::Line(Point2::new(5.0, 1.0)));
    }

    #[test]
    fn three_samples_make_straight_handles() {
        let samples = Sample::polyline(&[(0.0, 0.0), (1.0, 2.0), (3.0, 2.0)]);
        let fit = fit(&samples, 0.0).accepted().unwrap();
        let FittedSegment::Cubic(patch) = fit.segment else {
            panic!("expected a cubic");
        };
        assert_relative_eq!(patch.start_tangent, Vector2::new(1.0, 2.0));
        assert_relative_eq!(patch.end_tangent, Vector2::new(2.0, 0.0));
        assert_eq!(patch.end, Point2::new(3.0, 2.0));
    }

    #[test]
    fn smooth_arc_is_accepted_within_threshold() {
        let samples = arc_samples(12, 10.0, std::f64::consts::FRAC_PI_2);
        let threshold = 0.1;
        let fit = fit(&samples, threshold).accepted().unwrap();
        assert!(fit.error <= threshold * threshold, "error={}", fit.error);
        let FittedSegment::Cubic(patch) = fit.segment else {
            panic!("expected a cubic");
        };
        assert_relative_eq!(patch.end, samples[11].position);
    }

    #[test]
    fn sharp_corner_exceeds_threshold() {
        let samples = Sample::polyline(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (3.0, 2.0),
            (3.0, 3.0),
        ]);
        let outcome = fit(&samples, 0.05);
        let FitOutcome::Rejected(rejection) = outcome else {
            panic!("expected rejection");
        };
        assert!(matches!(rejection.reason, RejectReason::ThresholdExceeded { .. }));
        assert!(rejection.worst_index > 0 && rejection.worst_index < 6);
    }

    #[test]
    fn degenerate_window_is_rejected() {
        let samples = vec![
            Sample::regular(1.0, 1.0),
            Sample::regular(1.000_01, 1.0),
            Sample::regular(1.000_02, 1.0),
            Sample::regular(1.000_01, 1.0),
        ];
        let FitOutcome::Rejected(rejection) = fit(&samples, 10.0) else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.reason, RejectReason::Degenerate);
    }

    #[test]
    fn degenerate_window_of_two_is_a_line() {
        let samples = vec![Sample::regular(1.0, 1.0), Sample::regular(1.0, 1.0)];
        assert!(fit(&samples, 0.0).is_accepted());
    }

    #[test]
    fn refinement_never_worsens_error() {
        let samples = arc_samples(30, 20.0, 1.5);
        let mut tables = FittingTables::new();
        tables.load(&samples);
        let plain = FitEngine::new(&FitParams {
            refine: false,
            ..FitParams::default()
        })
        .fit(&mut tables, 1.0)
        .accepted()
        .unwrap();
        tables.load(&samples);
        let refined = engine().fit(&mut tables, 1.0).accepted().unwrap();
        assert!(refined.error <= plain.error + REFINE_SLACK);
        assert!(tables.params().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn chord_worst_prefers_forced() {
        let samples = vec![
            Sample::regular(0.0, 0.0),
            Sample::regular(1.0, 1.0),
            Sample::forced(2.0, 0.8),
            Sample::regular(3.0, 0.0),
        ];
        let mut tables = FittingTables::new();
        tables.load(&samples);
        assert_eq!(chord_worst(&tables), 2);
    }
}

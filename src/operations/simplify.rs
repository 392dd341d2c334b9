use std::ops::Range;

use tracing::{debug, trace};

use crate::error::{GeometryError, Result};
use crate::fitting::{Fit, FitEngine, FitOutcome, FitParams, FittedSegment, FittingTables};
use crate::geometry::{subpath_ranges, PathDescription, Sample};
use crate::math::is_finite;

/// Simplifies a sampled polyline into lines and cubic Bézier patches.
///
/// Each subpath is cut greedily into the longest windows whose single-patch
/// fit stays within the threshold.
///
/// # Algorithm
///
/// From the current boundary, the window end is pushed forward by `step`
/// samples (initially [`FitParams::initial_step`]) while the fit succeeds.
/// A failed fit, or a candidate that would run past the subpath end or past
/// the next forced sample, halves `step` and retries from the last good end.
/// Once the window reaches a forced sample it is final, so forced samples
/// always become segment boundaries.
///
/// A subpath whose last point returns to its first point (Chebyshev distance
/// below 1e-5) is closed.
#[derive(Debug)]
pub struct Simplify {
    samples: Vec<Sample>,
    params: FitParams,
}

impl Simplify {
    /// Creates a new simplify operation.
    #[must_use]
    pub fn new(samples: Vec<Sample>, params: FitParams) -> Self {
        Self { samples, params }
    }

    /// Executes the simplification.
    ///
    /// Fewer than 2 samples produce an empty description; subpaths of a
    /// single sample are skipped.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidParameters` if the parameters are out of range
    /// - `OperationError::InvalidThreshold` if the threshold is negative or not finite
    /// - `GeometryError::NonFinite` if a sample has a NaN or infinite coordinate
    pub fn execute(&self) -> Result<PathDescription> {
        self.params.validate()?;
        if let Some(index) = self.samples.iter().position(|s| !is_finite(&s.position)) {
            return Err(GeometryError::NonFinite { index }.into());
        }
        let threshold = self.params.threshold.resolve(self.samples.iter().map(|s| &s.position))?;

        let mut path = PathDescription::new();
        if self.samples.len() < 2 {
            return Ok(path);
        }

        let engine = FitEngine::new(&self.params);
        let mut tables = FittingTables::new();
        for range in subpath_ranges(&self.samples) {
            if range.len() < 2 {
                continue;
            }
            self.simplify_subpath(range, threshold, &engine, &mut tables, &mut path);
        }
        Ok(path)
    }

    fn simplify_subpath(
        &self,
        range: Range<usize>,
        threshold: f64,
        engine: &FitEngine,
        tables: &mut FittingTables,
        path: &mut PathDescription,
    ) {
        let base = range.start;
        let samples = &self.samples[range.clone()];
        let last = samples.len() - 1;
        let before = path.len();

        path.move_to(samples[0].position, Some(base));
        let mut cur = 0;
        while cur < last {
            let (end, fit) = self.extend_window(samples, cur, threshold, engine, tables);
            trace!(start = base + cur, end = base + end, error = fit.error, "accepted window");
            match fit.segment {
                FittedSegment::Line(p) => path.line_to(p, Some(base + end)),
                FittedSegment::Cubic(patch) => path.fitted_to(patch, Some(base + end)),
            }
            cur = end;
        }
        path.close_if_looped(Some(base + last));

        debug!(
            subpath = ?range,
            commands = path.len() - before,
            "simplified subpath"
        );
    }

    /// Finds the largest acceptable window starting at `cur`.
    ///
    /// Returns the window's end index within `samples` and its fit. The
    /// window always covers at least one segment, which fits as a line.
    fn extend_window(
        &self,
        samples: &[Sample],
        cur: usize,
        threshold: f64,
        engine: &FitEngine,
        tables: &mut FittingTables,
    ) -> (usize, Fit) {
        let last = samples.len() - 1;
        let limit = samples[cur + 1..]
            .iter()
            .position(Sample::is_forced)
            .map_or(last, |k| cur + 1 + k);

        let mut best_end = cur + 1;
        let mut best = Fit {
            segment: FittedSegment::Line(samples[best_end].position),
            error: 0.0,
            worst_index: 1,
        };

        tables.clear();
        let mut step = self.params.initial_step;
        while step > 0 && best_end < limit {
            let candidate = best_end + step;
            if candidate > limit {
                step /= 2;
                continue;
            }
            tables.load(&samples[cur..=candidate]);
            match engine.fit(tables, threshold) {
                FitOutcome::Accepted(fit) => {
                    best_end = candidate;
                    best = fit;
                }
                FitOutcome::Rejected(rejection) => {
                    trace!(
                        start = cur,
                        end = candidate,
                        reason = ?rejection.reason,
                        worst = cur + rejection.worst_index,
                        "rejected window"
                    );
                    step /= 2;
                }
            }
        }
        (best_end, best)
    }
}

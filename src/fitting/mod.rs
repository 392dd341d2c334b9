//! Single-window curve fitting.
//!
//! The [`FitEngine`] takes a contiguous window of samples loaded in
//! [`FittingTables`] and produces either a line/cubic that stays within the
//! threshold or a [`Rejection`] naming the worst-fitting sample.

mod engine;
pub mod error_metric;
pub mod least_squares;
pub mod refine;
mod tables;

pub use engine::FitEngine;
pub use tables::FittingTables;

use crate::error::{OperationError, Result};
use crate::geometry::{CubicPatch, Sample};
use crate::math::Point2;

/// Maximum allowed deviation between the input and the fitted path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// A distance in input units.
    Absolute(f64),
    /// A fraction of the diagonal of the input's bounding box.
    Relative(f64),
}

impl Threshold {
    /// Resolves the threshold to a distance for the given input points.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidThreshold` if the value is negative,
    /// NaN or infinite.
    pub fn resolve<'a>(self, points: impl IntoIterator<Item = &'a Point2>) -> Result<f64> {
        let value = match self {
            Self::Absolute(v) | Self::Relative(v) => v,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(OperationError::InvalidThreshold(value).into());
        }
        match self {
            Self::Absolute(d) => Ok(d),
            Self::Relative(f) => Ok(f * bounding_diagonal(points)),
        }
    }
}

/// Length of the diagonal of the bounding box of `points` (0 if empty).
fn bounding_diagonal<'a>(points: impl IntoIterator<Item = &'a Point2>) -> f64 {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (mut min, mut max) = (*first, *first);
    for p in iter {
        min = min.inf(p);
        max = max.sup(p);
    }
    (max - min).norm()
}

/// Parameters controlling simplification and coalescing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Maximum allowed deviation.
    pub threshold: Threshold,
    /// Initial window extension step of the simplifier.
    pub initial_step: usize,
    /// Coalescer: threshold multiplier once a forced point has been absorbed.
    pub forced_threshold_ratio: f64,
    /// Windows with at most this many samples use the splotch-killer error.
    pub splotch_killer_limit: usize,
    /// Whether accepted fits get a Newton-Raphson parameter refinement pass.
    pub refine: bool,
    /// Coalescer: resampling spacing as a fraction of the threshold.
    pub resample_ratio: f64,
    /// Coalescer: maximum number of pieces a single command is split into.
    pub max_subdivisions: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            threshold: Threshold::Absolute(1.0),
            initial_step: 64,
            forced_threshold_ratio: 0.05,
            splotch_killer_limit: 20,
            refine: true,
            resample_ratio: 0.25,
            max_subdivisions: 32,
        }
    }
}

impl FitParams {
    /// Default parameters with an absolute threshold.
    #[must_use]
    pub fn absolute(threshold: f64) -> Self {
        Self {
            threshold: Threshold::Absolute(threshold),
            ..Self::default()
        }
    }

    /// Checks that every parameter is within its valid range.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidParameters` describing the first
    /// out-of-range field.
    pub fn validate(&self) -> Result<()> {
        if self.initial_step == 0 {
            return Err(OperationError::InvalidParameters("initial_step must be at least 1".to_owned()).into());
        }
        if !(self.forced_threshold_ratio > 0.0 && self.forced_threshold_ratio <= 1.0) {
            return Err(OperationError::InvalidParameters(format!(
                "forced_threshold_ratio must be in (0, 1], got {}",
                self.forced_threshold_ratio
            ))
            .into());
        }
        if !(self.resample_ratio.is_finite() && self.resample_ratio > 0.0) {
            return Err(OperationError::InvalidParameters(format!(
                "resample_ratio must be finite and positive, got {}",
                self.resample_ratio
            ))
            .into());
        }
        if self.max_subdivisions == 0 {
            return Err(OperationError::InvalidParameters("max_subdivisions must be at least 1".to_owned()).into());
        }
        Ok(())
    }
}

/// The geometric result of an accepted fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FittedSegment {
    /// A straight segment to the given end point (2-sample windows).
    Line(Point2),
    /// A cubic patch in scaled-tangent form.
    Cubic(CubicPatch),
}

impl FittedSegment {
    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line(p) => *p,
            Self::Cubic(patch) => patch.end,
        }
    }
}

/// An accepted fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub segment: FittedSegment,
    /// Error as compared against the squared threshold.
    pub error: f64,
    /// Window-relative index of the worst-fitting sample.
    pub worst_index: usize,
}

/// Why a window could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// The fitted cubic deviates more than the threshold allows.
    ThresholdExceeded { error: f64 },
    /// The least-squares system has a near-zero determinant.
    SingularMatrix,
    /// The window has near-zero total chord length.
    Degenerate,
}

/// A rejected fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rejection {
    pub reason: RejectReason,
    /// Window-relative index of the worst-fitting sample.
    pub worst_index: usize,
}

/// Result of a single fit attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    Accepted(Fit),
    Rejected(Rejection),
}

impl FitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns the fit if it was accepted.
    #[must_use]
    pub fn accepted(self) -> Option<Fit> {
        match self {
            Self::Accepted(fit) => Some(fit),
            Self::Rejected(_) => None,
        }
    }
}

/// Fits one window of samples in a single call.
///
/// Convenience wrapper allocating fresh [`FittingTables`]; the simplifier and
/// coalescer reuse their tables instead.
#[must_use]
pub fn fit_window(window: &[Sample], threshold: f64, params: &FitParams) -> FitOutcome {
    let mut tables = FittingTables::new();
    tables.load(window);
    FitEngine::new(params).fit(&mut tables, threshold)
}

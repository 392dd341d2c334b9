pub mod error;
pub mod fitting;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{PathfitError, Result};
pub use fitting::{FitParams, Threshold};
pub use geometry::{CubicPatch, EllipticalArc, PathCommand, PathDescription, Sample, SampleKind};
pub use operations::{Coalesce, Simplify};

/// Simplifies sampled polylines into lines and cubic patches deviating from
/// the samples by at most `threshold`.
///
/// Uses [`FitParams::default`] with an absolute threshold; see [`Simplify`]
/// for full control.
///
/// # Errors
///
/// Returns an error if `threshold` is negative or not finite, or if a sample
/// has a non-finite coordinate.
pub fn simplify(samples: &[Sample], threshold: f64) -> Result<Vec<PathCommand>> {
    Simplify::new(samples.to_vec(), FitParams::absolute(threshold))
        .execute()
        .map(PathDescription::into_commands)
}

/// Merges runs of path commands into fewer cubic patches deviating from the
/// input by at most `threshold`.
///
/// Uses [`FitParams::default`] with an absolute threshold; see [`Coalesce`]
/// for full control.
///
/// # Errors
///
/// Returns an error if `threshold` is negative or not finite, if a command has
/// a non-finite coordinate, or if a quadratic spline run is malformed.
pub fn coalesce(commands: &[PathCommand], threshold: f64) -> Result<Vec<PathCommand>> {
    Coalesce::new(commands.to_vec(), FitParams::absolute(threshold))
        .execute()
        .map(PathDescription::into_commands)
}

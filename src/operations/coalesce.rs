use tracing::{debug, trace};

use crate::error::{GeometryError, OperationError, Result};
use crate::fitting::{Fit, FitEngine, FitOutcome, FitParams, FittedSegment, FittingTables};
use crate::geometry::{PathCommand, PathDescription, Sample, SampleKind};
use crate::math::{is_finite, Point2};

use super::resample::resample_command;

/// Merges runs of path commands into fewer cubic Bézier patches.
///
/// Unlike [`Simplify`](super::Simplify), no dense samples are available:
/// every line and cubic command is resampled evenly (spacing
/// `resample_ratio × threshold`) and the samples of consecutive commands are
/// fitted as one patch for as long as the fit stays within the threshold.
///
/// # Hard breaks
///
/// `MoveTo`, `Close`, `ArcTo` and quadratic spline runs end the pending
/// patch and are copied verbatim.
///
/// # Forced points
///
/// A `Forced` marker is absorbed into the pending patch only if the patch
/// still fits at `forced_threshold_ratio × threshold`; the patch then keeps
/// that tightened threshold for every later extension. Otherwise the patch
/// is flushed and the marker is kept as a segment boundary. Repeated
/// markers at the same point are all kept.
#[derive(Debug)]
pub struct Coalesce {
    commands: Vec<PathCommand>,
    params: FitParams,
}

impl Coalesce {
    /// Creates a new coalesce operation.
    #[must_use]
    pub fn new(commands: Vec<PathCommand>, params: FitParams) -> Self {
        Self { commands, params }
    }

    /// Executes the coalescing pass.
    ///
    /// Lists of at most 2 commands are returned unchanged.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidParameters` if the parameters are out of range
    /// - `OperationError::InvalidThreshold` if the threshold is negative or not finite
    /// - `OperationError::InvalidInput` if a quadratic spline is not followed by
    ///   its declared control points, or a control point has no spline
    /// - `GeometryError::NonFinite` if a command has a NaN or infinite coordinate
    pub fn execute(&self) -> Result<PathDescription> {
        self.params.validate()?;
        self.validate_commands()?;
        let points: Vec<Point2> = self.commands.iter().flat_map(PathCommand::points).collect();
        let threshold = self.params.threshold.resolve(&points)?;

        if self.commands.len() <= 2 {
            let mut path = PathDescription::new();
            for (index, command) in self.commands.iter().enumerate() {
                path.push(*command, Some(index));
            }
            return Ok(path);
        }

        let mut coalescer = Coalescer::new(threshold, &self.params);
        let mut index = 0;
        while index < self.commands.len() {
            let command = self.commands[index];
            match command {
                PathCommand::LineTo(_) | PathCommand::CubicTo(_) => coalescer.add_segment(command, index),
                PathCommand::Forced => coalescer.add_forced(index),
                PathCommand::QuadraticSplineTo { control_count, .. } => {
                    coalescer.flush();
                    let spline = self.spline_run(index, control_count).unwrap_or_default();
                    for (offset, part) in spline.iter().enumerate() {
                        coalescer.path.push(*part, Some(index + offset));
                    }
                    index += spline.len().saturating_sub(1);
                }
                PathCommand::MoveTo(_)
                | PathCommand::ArcTo(_)
                | PathCommand::Close
                | PathCommand::IntermediateControl(_) => coalescer.add_break(command, index),
            }
            index += 1;
        }
        let path = coalescer.finish();

        debug!(input = self.commands.len(), output = path.len(), "coalesced path");
        Ok(path)
    }

    fn validate_commands(&self) -> Result<()> {
        for (index, command) in self.commands.iter().enumerate() {
            if !command.points().iter().all(is_finite) {
                return Err(GeometryError::NonFinite { index }.into());
            }
        }

        let mut index = 0;
        while index < self.commands.len() {
            match self.commands[index] {
                PathCommand::QuadraticSplineTo { control_count, .. } => {
                    let spline = self.spline_run(index, control_count);
                    let complete = spline.is_some_and(|parts| {
                        parts[1..].iter().all(|c| matches!(c, PathCommand::IntermediateControl(_)))
                    });
                    if !complete {
                        return Err(OperationError::InvalidInput(format!(
                            "quadratic spline at index {index} is not followed by {control_count} control points"
                        ))
                        .into());
                    }
                    index += control_count;
                }
                PathCommand::IntermediateControl(_) => {
                    return Err(OperationError::InvalidInput(format!(
                        "control point at index {index} does not belong to a quadratic spline"
                    ))
                    .into());
                }
                _ => {}
            }
            index += 1;
        }
        Ok(())
    }

    /// The spline command at `index` followed by its `control_count` control
    /// points, or `None` if the list ends first.
    fn spline_run(&self, index: usize, control_count: usize) -> Option<&[PathCommand]> {
        let end = index.checked_add(control_count)?;
        self.commands.get(index..=end)
    }
}

/// Commands absorbed since the last flush, with their resampled points.
#[derive(Debug)]
struct PendingRun {
    /// Run start followed by the resampled points of every absorbed command.
    samples: Vec<Sample>,
    /// Source commands, emitted verbatim when no merged fit exists.
    commands: Vec<(PathCommand, usize)>,
    /// Single patch covering the whole run, once two commands were merged.
    fit: Option<Fit>,
    /// A forced point was absorbed; later extensions use the tightened threshold.
    contains_forced: bool,
    /// Indices of the forced markers sitting at the run's end.
    trailing_forced: Vec<usize>,
}

impl PendingRun {
    fn new(from: Point2, points: &[Point2], command: PathCommand, index: usize) -> Self {
        let mut samples = Vec::with_capacity(points.len() + 1);
        samples.push(Sample {
            position: from,
            kind: SampleKind::SubpathStart,
        });
        samples.extend(points.iter().map(|p| Sample::regular(p.x, p.y)));
        Self {
            samples,
            commands: vec![(command, index)],
            fit: None,
            contains_forced: false,
            trailing_forced: Vec::new(),
        }
    }

    fn end(&self) -> Option<Point2> {
        self.samples.last().map(|s| s.position)
    }

    fn last_index(&self) -> Option<usize> {
        self.commands.last().map(|&(_, index)| index)
    }
}

/// State machine of one coalescing pass.
struct Coalescer {
    path: PathDescription,
    run: Option<PendingRun>,
    engine: FitEngine,
    tables: FittingTables,
    threshold: f64,
    forced_threshold: f64,
    spacing: f64,
    max_subdivisions: usize,
}

impl Coalescer {
    fn new(threshold: f64, params: &FitParams) -> Self {
        Self {
            path: PathDescription::new(),
            run: None,
            engine: FitEngine::new(params),
            tables: FittingTables::new(),
            threshold,
            forced_threshold: threshold * params.forced_threshold_ratio,
            spacing: threshold * params.resample_ratio,
            max_subdivisions: params.max_subdivisions,
        }
    }

    fn pen(&self) -> Option<Point2> {
        self.run.as_ref().and_then(PendingRun::end).or_else(|| self.path.current_point())
    }

    /// Extends the pending run with a line or cubic, or starts a new run.
    fn add_segment(&mut self, command: PathCommand, index: usize) {
        let Some(from) = self.pen() else {
            self.path.push(command, Some(index));
            return;
        };
        let points = resample_command(&from, &command, self.spacing, self.max_subdivisions);

        if let Some(run) = self.run.as_mut() {
            let tolerance = if run.contains_forced {
                self.forced_threshold
            } else {
                self.threshold
            };
            let mut candidate = run.samples.clone();
            candidate.extend(points.iter().map(|p| Sample::regular(p.x, p.y)));
            self.tables.clear();
            self.tables.load(&candidate);
            match self.engine.fit(&mut self.tables, tolerance) {
                FitOutcome::Accepted(fit) => {
                    trace!(command = index, samples = candidate.len(), error = fit.error, "extended pending patch");
                    run.samples = candidate;
                    run.commands.push((command, index));
                    run.fit = Some(fit);
                    run.trailing_forced.clear();
                    return;
                }
                FitOutcome::Rejected(rejection) => {
                    trace!(command = index, reason = ?rejection.reason, "pending patch closed");
                }
            }
            self.flush();
        }
        self.run = Some(PendingRun::new(from, &points, command, index));
    }

    /// Tries to carry the pending run through a forced point at the tightened threshold.
    fn add_forced(&mut self, index: usize) {
        let Some(run) = self.run.as_mut() else {
            self.path.push(PathCommand::Forced, Some(index));
            return;
        };
        if let Some(last) = run.samples.last_mut() {
            last.kind = SampleKind::Forced;
        }
        self.tables.clear();
        self.tables.load(&run.samples);
        if self.engine.fit(&mut self.tables, self.forced_threshold).is_accepted() {
            run.contains_forced = true;
            run.trailing_forced.push(index);
        } else {
            trace!(command = index, "forced point ends pending patch");
            self.flush();
            self.path.push(PathCommand::Forced, Some(index));
        }
    }

    fn add_break(&mut self, command: PathCommand, index: usize) {
        self.flush();
        self.path.push(command, Some(index));
    }

    /// Emits the pending run, as one fitted patch or as its source commands.
    fn flush(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let last_index = run.last_index();
        match run.fit {
            Some(fit) => match fit.segment {
                FittedSegment::Line(p) => self.path.line_to(p, last_index),
                FittedSegment::Cubic(patch) => self.path.fitted_to(patch, last_index),
            },
            None => {
                for (command, index) in run.commands {
                    self.path.push(command, Some(index));
                }
            }
        }
        for index in run.trailing_forced {
            self.path.push(PathCommand::Forced, Some(index));
        }
    }

    fn finish(mut self) -> PathDescription {
        self.flush();
        self.path
    }
}

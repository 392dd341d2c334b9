use crate::math::{chebyshev_distance, Point2, CLOSE_TOLERANCE};

use super::cubic::CubicPatch;
use super::path_command::PathCommand;

/// A path command together with the index of the last input item it covers.
///
/// For simplified polylines the index refers to the last raw sample of the
/// segment; for coalesced paths it refers to the last source command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathElement {
    pub command: PathCommand,
    pub sample_index: Option<usize>,
}

/// An ordered list of path commands, built incrementally.
///
/// Tracks the pen position and the start of the current subpath so that
/// fitted segments can be appended and loops closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathDescription {
    elements: Vec<PathElement>,
    subpath_start: Option<Point2>,
    current: Option<Point2>,
}

impl PathDescription {
    /// Creates an empty description.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new subpath at `p`.
    pub fn move_to(&mut self, p: Point2, sample_index: Option<usize>) {
        self.subpath_start = Some(p);
        self.current = Some(p);
        self.push_raw(PathCommand::MoveTo(p), sample_index);
    }

    pub fn line_to(&mut self, p: Point2, sample_index: Option<usize>) {
        self.current = Some(p);
        self.push_raw(PathCommand::LineTo(p), sample_index);
    }

    pub fn cubic_to(&mut self, patch: CubicPatch, sample_index: Option<usize>) {
        self.current = Some(patch.end);
        self.push_raw(PathCommand::CubicTo(patch), sample_index);
    }

    /// Appends a fitted patch, demoting it to a line when it is straight.
    pub fn fitted_to(&mut self, patch: CubicPatch, sample_index: Option<usize>) {
        match self.current {
            Some(from) if patch.is_straight(&from) => self.line_to(patch.end, sample_index),
            _ => self.cubic_to(patch, sample_index),
        }
    }

    /// Closes the current subpath; the pen returns to its start.
    pub fn close(&mut self, sample_index: Option<usize>) {
        self.current = self.subpath_start;
        self.push_raw(PathCommand::Close, sample_index);
    }

    /// Closes the current subpath if the pen is back at its start.
    ///
    /// Returns `true` if a `Close` was appended.
    pub fn close_if_looped(&mut self, sample_index: Option<usize>) -> bool {
        match (self.current, self.subpath_start) {
            (Some(cur), Some(start))
                if self.has_segment_since_move() && chebyshev_distance(&cur, &start) < CLOSE_TOLERANCE =>
            {
                self.close(sample_index);
                true
            }
            _ => false,
        }
    }

    /// Appends any command verbatim, updating the pen position.
    pub fn push(&mut self, command: PathCommand, sample_index: Option<usize>) {
        match command {
            PathCommand::MoveTo(p) => self.move_to(p, sample_index),
            PathCommand::Close => self.close(sample_index),
            _ => {
                if let Some(p) = command.end_point() {
                    self.current = Some(p);
                }
                self.push_raw(command, sample_index);
            }
        }
    }

    /// Returns the current pen position.
    #[must_use]
    pub fn current_point(&self) -> Option<Point2> {
        self.current
    }

    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Returns the commands without their traceability indices.
    #[must_use]
    pub fn commands(&self) -> Vec<PathCommand> {
        self.elements.iter().map(|e| e.command).collect()
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<PathCommand> {
        self.elements.into_iter().map(|e| e.command).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn push_raw(&mut self, command: PathCommand, sample_index: Option<usize>) {
        self.elements.push(PathElement {
            command,
            sample_index,
        });
    }

    fn has_segment_since_move(&self) -> bool {
        self.elements
            .last()
            .is_some_and(|e| !matches!(e.command, PathCommand::MoveTo(_) | PathCommand::Close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    #[test]
    fn fitted_straight_patch_becomes_line() {
        let mut path = PathDescription::new();
        path.move_to(Point2::new(0.0, 0.0), Some(0));
        let patch = CubicPatch::new(
            Point2::new(3.0, 0.0),
            Vector2::new(3.0, 0.0),
            Vector2::new(3.0, 0.0),
        );
        path.fitted_to(patch, Some(3));
        assert_eq!(
            path.commands(),
            vec![
                PathCommand::MoveTo(Point2::new(0.0, 0.0)),
                PathCommand::LineTo(Point2::new(3.0, 0.0)),
            ]
        );
        assert_eq!(path.elements()[1].sample_index, Some(3));
    }

    #[test]
    fn fitted_curved_patch_stays_cubic() {
        let mut path = PathDescription::new();
        path.move_to(Point2::new(0.0, 0.0), None);
        let patch = CubicPatch::new(
            Point2::new(3.0, 0.0),
            Vector2::new(0.0, 3.0),
            Vector2::new(0.0, -3.0),
        );
        path.fitted_to(patch, None);
        assert!(matches!(path.commands()[1], PathCommand::CubicTo(_)));
        assert_eq!(path.current_point(), Some(Point2::new(3.0, 0.0)));
    }

    #[test]
    fn close_if_looped_within_tolerance() {
        let mut path = PathDescription::new();
        path.move_to(Point2::new(0.0, 0.0), None);
        path.line_to(Point2::new(1.0, 0.0), None);
        path.line_to(Point2::new(0.0, 1.0), None);
        path.line_to(Point2::new(0.000_001, -0.000_002), None);
        assert!(path.close_if_looped(None));
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));
        assert_eq!(path.current_point(), Some(Point2::new(0.0, 0.0)));
    }

    #[test]
    fn open_path_is_not_closed() {
        let mut path = PathDescription::new();
        path.move_to(Point2::new(0.0, 0.0), None);
        path.line_to(Point2::new(1.0, 0.0), None);
        assert!(!path.close_if_looped(None));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn bare_move_is_not_closed() {
        let mut path = PathDescription::new();
        path.move_to(Point2::new(0.0, 0.0), None);
        assert!(!path.close_if_looped(None));
    }

    #[test]
    fn push_tracks_pen() {
        let mut path = PathDescription::new();
        path.push(PathCommand::MoveTo(Point2::new(1.0, 1.0)), None);
        path.push(PathCommand::LineTo(Point2::new(2.0, 1.0)), None);
        path.push(PathCommand::Forced, None);
        assert_eq!(path.current_point(), Some(Point2::new(2.0, 1.0)));
        path.push(PathCommand::Close, None);
        assert_eq!(path.current_point(), Some(Point2::new(1.0, 1.0)));
    }
}

use crate::math::Point2;

use super::cubic::CubicPatch;

/// An SVG-style elliptical arc, stored as its end point and shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalArc {
    pub end: Point2,
    pub rx: f64,
    pub ry: f64,
    /// X-axis rotation, in degrees.
    pub angle: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// A single path description command.
///
/// `QuadraticSplineTo` declares how many `IntermediateControl` commands follow
/// it; those carry the spline's off-curve control points. `Forced` marks the
/// current point (the end of the previous command) as a must-keep vertex and
/// has no position of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    CubicTo(CubicPatch),
    ArcTo(EllipticalArc),
    Close,
    QuadraticSplineTo { end: Point2, control_count: usize },
    IntermediateControl(Point2),
    Forced,
}

impl PathCommand {
    /// Returns the point the pen rests on after this command, if the command
    /// carries one.
    ///
    /// `Close`, `Forced` and `IntermediateControl` return `None`: the first
    /// two carry no position, the latter is off-curve.
    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(*p),
            Self::CubicTo(patch) => Some(patch.end),
            Self::ArcTo(arc) => Some(arc.end),
            Self::QuadraticSplineTo { end, .. } => Some(*end),
            Self::Close | Self::IntermediateControl(_) | Self::Forced => None,
        }
    }

    /// Returns every point stored in this command, in order.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        match self {
            Self::IntermediateControl(p) => vec![*p],
            _ => self.end_point().into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    #[test]
    fn end_point_of_positioned_commands() {
        let p = Point2::new(1.0, 2.0);
        assert_eq!(PathCommand::MoveTo(p).end_point(), Some(p));
        assert_eq!(PathCommand::LineTo(p).end_point(), Some(p));
        let patch = CubicPatch::new(p, Vector2::zeros(), Vector2::zeros());
        assert_eq!(PathCommand::CubicTo(patch).end_point(), Some(p));
        let arc = EllipticalArc {
            end: p,
            rx: 1.0,
            ry: 1.0,
            angle: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert_eq!(PathCommand::ArcTo(arc).end_point(), Some(p));
        let spline = PathCommand::QuadraticSplineTo {
            end: p,
            control_count: 2,
        };
        assert_eq!(spline.end_point(), Some(p));
    }

    #[test]
    fn unpositioned_commands_have_no_end_point() {
        assert_eq!(PathCommand::Close.end_point(), None);
        assert_eq!(PathCommand::Forced.end_point(), None);
        let ctrl = PathCommand::IntermediateControl(Point2::new(3.0, 4.0));
        assert_eq!(ctrl.end_point(), None);
        assert_eq!(ctrl.points(), vec![Point2::new(3.0, 4.0)]);
    }
}

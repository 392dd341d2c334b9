#![allow(clippy::unwrap_used)]

use pathfit::error::{OperationError, PathfitError};
use pathfit::math::distance_2d::squared_distance_to_chord;
use pathfit::math::Point2;
use pathfit::{coalesce, simplify, Coalesce, FitParams, PathCommand, Sample};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn polyline(points: &[(f64, f64)]) -> Vec<PathCommand> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let p = Point2::new(x, y);
            if i == 0 {
                PathCommand::MoveTo(p)
            } else {
                PathCommand::LineTo(p)
            }
        })
        .collect()
}

#[test]
fn dense_line_run_is_reduced() {
    init_tracing();
    let points: Vec<(f64, f64)> = (0..=16)
        .map(|i| {
            let a = std::f64::consts::FRAC_PI_2 * f64::from(i) / 16.0;
            (10.0 * a.cos(), 10.0 * a.sin())
        })
        .collect();
    let input = polyline(&points);
    let output = coalesce(&input, 0.5).unwrap();
    assert!(output.len() < input.len());
    assert_eq!(output.first(), input.first());
    assert_eq!(output.last().unwrap().end_point(), input.last().unwrap().end_point());
}

#[test]
fn square_corners_survive() {
    init_tracing();
    let input = polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
    let output = coalesce(&input, 0.1).unwrap();
    assert_eq!(output, input);
}

#[test]
fn coalescing_simplified_output_keeps_endpoints() {
    init_tracing();
    let coords: Vec<(f64, f64)> = (0..120)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            (t * 5.0, t.sin() * 4.0)
        })
        .collect();
    let simplified = simplify(&Sample::polyline(&coords), 0.05).unwrap();
    let coalesced = coalesce(&simplified, 0.2).unwrap();
    assert!(coalesced.len() <= simplified.len());
    assert_eq!(coalesced[0], simplified[0]);
    assert_eq!(
        coalesced.last().unwrap().end_point(),
        Some(Point2::new(coords[119].0, coords[119].1))
    );
}

#[test]
fn malformed_spline_is_an_error() {
    init_tracing();
    let input = vec![
        PathCommand::MoveTo(Point2::new(0.0, 0.0)),
        PathCommand::QuadraticSplineTo {
            end: Point2::new(1.0, 0.0),
            control_count: 3,
        },
        PathCommand::IntermediateControl(Point2::new(0.5, 1.0)),
    ];
    let err = coalesce(&input, 1.0).unwrap_err();
    assert!(matches!(err, PathfitError::Operation(OperationError::InvalidInput(_))));
}

#[test]
fn huge_control_count_is_an_error() {
    init_tracing();
    let mut input = polyline(&[(0.0, 0.0), (1.0, 0.0)]);
    input.push(PathCommand::QuadraticSplineTo {
        end: Point2::new(2.0, 0.0),
        control_count: usize::MAX,
    });
    input.push(PathCommand::LineTo(Point2::new(3.0, 0.0)));
    let err = coalesce(&input, 1.0).unwrap_err();
    assert!(matches!(err, PathfitError::Operation(OperationError::InvalidInput(_))));
}

#[test]
fn invalid_threshold_is_an_error() {
    init_tracing();
    let input = polyline(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    let err = coalesce(&input, f64::NAN).unwrap_err();
    assert!(matches!(err, PathfitError::Operation(OperationError::InvalidThreshold(_))));
}

/// Distance from `p` to the segment drawn by `command` from `from`.
fn distance_to_segment(p: &Point2, from: &Point2, command: &PathCommand) -> f64 {
    match command {
        PathCommand::LineTo(end) => squared_distance_to_chord(p, from, end).sqrt(),
        PathCommand::CubicTo(patch) => {
            let mut prev = *from;
            let mut best = f64::INFINITY;
            for k in 1..=1000 {
                let next = patch.point_at(from, f64::from(k) / 1000.0);
                best = best.min(squared_distance_to_chord(p, &prev, &next));
                prev = next;
            }
            best.sqrt()
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn merged_patches_stay_within_threshold() {
    init_tracing();
    let threshold = 0.05;
    let points: Vec<(f64, f64)> = (0..=200)
        .map(|i| {
            let x = f64::from(i) * 0.1;
            (x, (x * 0.6).sin() * 2.0)
        })
        .collect();
    let input = polyline(&points);
    let path = Coalesce::new(input.clone(), FitParams::absolute(threshold))
        .execute()
        .unwrap();
    let elements = path.elements();
    assert!(elements.len() < input.len() / 3, "{} commands", elements.len());

    // Every line command is resampled into at least 8 points, so a patch
    // merging three commands is past the splotch-killer limit.
    let mut checked = 0;
    for pair in elements.windows(2) {
        let start = pair[0].sample_index.unwrap();
        let end = pair[1].sample_index.unwrap();
        if end - start < 3 {
            continue;
        }
        let from = pair[0].command.end_point().unwrap();
        for command in &input[start..=end] {
            let p = command.end_point().unwrap();
            let d = distance_to_segment(&p, &from, &pair[1].command);
            assert!(d <= threshold + 1e-9, "vertex {p} off patch {start}..={end} by {d}");
        }
        checked += 1;
    }
    assert!(checked > 0);
}

use std::ops::Range;

use crate::math::Point2;

/// Role of a sample within its polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleKind {
    /// An ordinary point continuing the current subpath.
    #[default]
    Regular,
    /// The first point of a new subpath.
    SubpathStart,
    /// A point that must appear as an explicit vertex of the output.
    Forced,
}

/// A sampled polyline point with its role flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point2,
    pub kind: SampleKind,
}

impl Sample {
    /// Creates a new sample.
    #[must_use]
    pub fn new(x: f64, y: f64, kind: SampleKind) -> Self {
        Self {
            position: Point2::new(x, y),
            kind,
        }
    }

    /// Creates a regular sample.
    #[must_use]
    pub fn regular(x: f64, y: f64) -> Self {
        Self::new(x, y, SampleKind::Regular)
    }

    /// Creates a sample starting a new subpath.
    #[must_use]
    pub fn subpath_start(x: f64, y: f64) -> Self {
        Self::new(x, y, SampleKind::SubpathStart)
    }

    /// Creates a forced sample.
    #[must_use]
    pub fn forced(x: f64, y: f64) -> Self {
        Self::new(x, y, SampleKind::Forced)
    }

    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.kind == SampleKind::Forced
    }

    /// Builds an open polyline: the first point starts a subpath, the rest are regular.
    #[must_use]
    pub fn polyline(points: &[(f64, f64)]) -> Vec<Sample> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                if i == 0 {
                    Self::subpath_start(x, y)
                } else {
                    Self::regular(x, y)
                }
            })
            .collect()
    }
}

/// Splits a sample stream into subpath index ranges.
///
/// A subpath starts at index 0 or at any `SubpathStart` sample and runs until
/// the next `SubpathStart` or the end of the stream. The first sample always
/// starts a subpath, whatever its flag.
#[must_use]
pub fn subpath_ranges(samples: &[Sample]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < samples.len() {
        let mut end = start + 1;
        while end < samples.len() && samples[end].kind != SampleKind::SubpathStart {
            end += 1;
        }
        ranges.push(start..end);
        start = end;
    }
    ranges
}

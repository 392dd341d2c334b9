use crate::geometry::Sample;
use crate::math::Point2;

/// Scratch tables for fitting one window of samples.
///
/// Positions, segment lengths and forced flags are loaded incrementally: a
/// window that grows past the loaded high-water mark only appends the new
/// samples. The chord-length parameters are re-derived from the stored
/// lengths every time the window is loaded, so shrinking and regrowing a
/// window never leaves stale values behind.
#[derive(Debug, Clone, Default)]
pub struct FittingTables {
    points: Vec<Point2>,
    forced: Vec<bool>,
    /// `lengths[i]` is the distance from sample `i - 1` to sample `i`; `lengths[0] = 0`.
    lengths: Vec<f64>,
    params: Vec<f64>,
    /// Logical window length, at most the number of loaded samples.
    len: usize,
    total_length: f64,
}

impl FittingTables {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every loaded sample while keeping the allocations.
    ///
    /// Must be called whenever the window start moves.
    pub fn clear(&mut self) {
        self.points.clear();
        self.forced.clear();
        self.lengths.clear();
        self.params.clear();
        self.len = 0;
        self.total_length = 0.0;
    }

    /// Loads `window` as the current window.
    ///
    /// `window` must start at the same sample as every window loaded since
    /// the last [`clear`](Self::clear); only samples beyond the loaded
    /// high-water mark are read.
    pub fn load(&mut self, window: &[Sample]) {
        debug_assert!(
            self.points.is_empty() || window.first().map(|s| s.position) == self.points.first().copied(),
            "window start moved without clearing the fitting tables"
        );
        for sample in window.iter().skip(self.points.len()) {
            let length = self
                .points
                .last()
                .map_or(0.0, |prev| (sample.position - prev).norm());
            self.points.push(sample.position);
            self.forced.push(sample.is_forced());
            self.lengths.push(length);
            self.params.push(0.0);
        }
        self.len = window.len();
        self.reparameterize();
    }

    /// Recomputes the chord-length parameters of the current window.
    ///
    /// `T[0] = 0`, `T[len - 1] = 1` and `T` is non-decreasing. When the window
    /// has no length, every parameter is left at 0.
    pub fn reparameterize(&mut self) {
        let n = self.len;
        let mut acc = 0.0;
        for (t, length) in self.params[..n].iter_mut().zip(&self.lengths[..n]) {
            acc += length;
            *t = acc;
        }
        self.total_length = acc;
        if acc > 0.0 {
            for t in &mut self.params[..n] {
                *t /= acc;
            }
            if n > 0 {
                self.params[n - 1] = 1.0;
            }
        }
    }

    /// Number of samples in the current window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of samples loaded since the last clear (the high-water mark).
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.points.len()
    }

    /// Total chord length of the current window.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points[..self.len]
    }

    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths[..self.len]
    }

    #[must_use]
    pub fn forced(&self) -> &[bool] {
        &self.forced[..self.len]
    }

    #[must_use]
    pub fn params(&self) -> &[f64] {
        &self.params[..self.len]
    }

    /// Positions and mutable parameters of the current window, borrowed together.
    pub fn points_and_params_mut(&mut self) -> (&[Point2], &mut [f64]) {
        (&self.points[..self.len], &mut self.params[..self.len])
    }
}

//! Warping path types for DTW alignment.

/// A single step in a warping path, pairing sample `t` of `y_true` with
/// sample `p` of `y_pred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarpingStep {
    /// Index in `y_true`.
    pub t: usize,
    /// Index in `y_pred`.
    pub p: usize,
}

/// An ordered sequence of warping steps from `(0, 0)` to `(n-1, m-1)`.
///
/// Both indices are non-decreasing along the path and advance by at most one
/// per step.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices into `y_true`, one per step.
    #[must_use]
    pub fn true_indices(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.t).collect()
    }

    /// Indices into `y_pred`, one per step.
    #[must_use]
    pub fn pred_indices(&self) -> Vec<usize> {
        self.0.iter().map(|s| s.p).collect()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

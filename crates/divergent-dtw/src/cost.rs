//! Accumulated cost matrix with a sentinel row and column.

use std::ops::Index;

/// Accumulated DTW cost table of shape `(n + 1, m + 1)`.
///
/// Row 0 and column 0 are sentinels: `D[0, 0] = 0` and every other sentinel
/// cell is `+inf`. Cell `(i, j)` for `i, j >= 1` holds the cheapest cost of
/// aligning the first `i` samples of `y_true` with the first `j` samples of
/// `y_pred`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Allocate the table for series of lengths `n` and `m`, sentinels set.
    pub(crate) fn with_sentinels(n: usize, m: usize) -> Self {
        let rows = n + 1;
        let cols = m + 1;
        let mut data = vec![f64::INFINITY; rows * cols];
        data[0] = 0.0;
        Self { rows, cols, data }
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    /// Return the number of rows, `n + 1`.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns, `m + 1`.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the shape as `[rows, cols]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Return cell `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.cols, "column {j} out of bounds for {} columns", self.cols);
        self.data[i * self.cols + j]
    }

    /// Return the accumulated cost of the full alignment, `D[n, m]`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.data[self.data.len() - 1]
    }

    /// Return row `i` of the table.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Return the row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(j < self.cols, "column {j} out of bounds for {} columns", self.cols);
        &self.data[i * self.cols + j]
    }
}

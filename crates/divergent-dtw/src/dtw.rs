//! Full-matrix DTW alignment with deterministic traceback.

use divergent_series::Series;
use tracing::{debug, instrument};

use crate::cost::CostMatrix;
use crate::error::DtwError;
use crate::path::{WarpingPath, WarpingStep};

/// DTW aligner. Stateless, thread-safe and copyable.
///
/// Always computes the full `(n + 1) x (m + 1)` cost matrix: no band and no
/// early abandoning, so the cost matrix returned with an [`Alignment`] is
/// complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw;

impl Dtw {
    /// Create an aligner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Align `y_true` against `y_pred`.
    ///
    /// The local distance between two samples is the Euclidean distance
    /// across channels. The accumulated cost `D[n, m]` is normalized by the
    /// sum of the matrix dimensions, `(n + 1) + (m + 1)`, to reduce the bias
    /// toward short series.
    ///
    /// The traceback walks from `(n, m)` toward the origin and picks the
    /// cheapest of `D[i, j-1]`, `D[i-1, j]` and `D[i-1, j-1]`. Ties resolve in
    /// that order: advance only in `y_pred`, then only in `y_true`, then both.
    ///
    /// Runs in O(n * m) time and memory.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ChannelMismatch`] | The series have different channel counts |
    /// | [`DtwError::NonFiniteCost`] | Local distances overflow, so no path has a finite cost |
    #[instrument(skip(self, y_true, y_pred), fields(n = y_true.n_time(), m = y_pred.n_time()))]
    pub fn align(&self, y_true: &Series, y_pred: &Series) -> Result<Alignment, DtwError> {
        if y_true.n_channels() != y_pred.n_channels() {
            return Err(DtwError::ChannelMismatch {
                left: y_true.n_channels(),
                right: y_pred.n_channels(),
            });
        }
        let n = y_true.n_time();
        let m = y_pred.n_time();

        let matrix = accumulate(y_true, y_pred);
        if !matrix.total().is_finite() {
            return Err(DtwError::NonFiniteCost { n, m });
        }
        let cost = matrix.total() / ((n + 1) + (m + 1)) as f64;
        let path = traceback(&matrix);
        debug!(cost, path_len = path.len(), "aligned series");

        Ok(Alignment {
            cost,
            matrix,
            path,
        })
    }
}

/// Align two series with a default [`Dtw`].
///
/// Returns `(cost, cost_matrix, true_indices, pred_indices)`.
///
/// # Errors
///
/// Same conditions as [`Dtw::align`].
pub fn dtw(y_true: &Series, y_pred: &Series) -> Result<(f64, CostMatrix, Vec<usize>, Vec<usize>), DtwError> {
    Ok(Dtw::new().align(y_true, y_pred)?.into_parts())
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

fn accumulate(y_true: &Series, y_pred: &Series) -> CostMatrix {
    let n = y_true.n_time();
    let m = y_pred.n_time();
    let mut d = CostMatrix::with_sentinels(n, m);
    for i in 1..=n {
        let a = y_true.row(i - 1);
        for j in 1..=m {
            let local = euclidean(a, y_pred.row(j - 1));
            let best = d[(i - 1, j)].min(d[(i, j - 1)]).min(d[(i - 1, j - 1)]);
            d.set(i, j, local + best);
        }
    }
    d
}

/// Walk back from `(n, m)` and return the path in sample coordinates.
fn traceback(d: &CostMatrix) -> WarpingPath {
    let mut i = d.rows() - 1;
    let mut j = d.cols() - 1;
    let mut steps = vec![WarpingStep { t: i - 1, p: j - 1 }];
    while i > 0 && j > 0 {
        let candidates = [(i, j - 1), (i - 1, j), (i - 1, j - 1)];
        let mut best = candidates[0];
        for &cell in &candidates[1..] {
            // strict comparison keeps the earliest candidate on ties
            if d[cell] < d[best] {
                best = cell;
            }
        }
        (i, j) = best;
        if i > 0 && j > 0 {
            steps.push(WarpingStep { t: i - 1, p: j - 1 });
        }
    }
    steps.reverse();
    WarpingPath::new(steps)
}

/// Result of aligning two series.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    cost: f64,
    matrix: CostMatrix,
    path: WarpingPath,
}

impl Alignment {
    /// Normalized alignment cost.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// The full accumulated cost matrix, sentinels included.
    #[must_use]
    pub fn cost_matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// The optimal warping path.
    #[must_use]
    pub fn path(&self) -> &WarpingPath {
        &self.path
    }

    /// Indices into `y_true` along the path.
    #[must_use]
    pub fn true_indices(&self) -> Vec<usize> {
        self.path.true_indices()
    }

    /// Indices into `y_pred` along the path.
    #[must_use]
    pub fn pred_indices(&self) -> Vec<usize> {
        self.path.pred_indices()
    }

    /// Decompose into `(cost, cost_matrix, true_indices, pred_indices)`.
    #[must_use]
    pub fn into_parts(self) -> (f64, CostMatrix, Vec<usize>, Vec<usize>) {
        let true_indices = self.path.true_indices();
        let pred_indices = self.path.pred_indices();
        (self.cost, self.matrix, true_indices, pred_indices)
    }

    /// Re-index both series along the path so they share one time axis.
    ///
    /// The returned series both have `path().len()` time steps.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::AlignmentMismatch`] | The series lengths differ from the aligned ones |
    pub fn warp(&self, y_true: &Series, y_pred: &Series) -> Result<(Series, Series), DtwError> {
        let expected = [self.matrix.rows() - 1, self.matrix.cols() - 1];
        let got = [y_true.n_time(), y_pred.n_time()];
        if expected != got {
            return Err(DtwError::AlignmentMismatch { expected, got });
        }
        Ok((
            y_true.select_rows(&self.true_indices()),
            y_pred.select_rows(&self.pred_indices()),
        ))
    }
}

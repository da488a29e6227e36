//! Error types for sequence alignment.

use divergent_series::{ErrorKind, SeriesError};

/// Errors from DTW alignment and warping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Wraps a construction error from the input series.
    #[error("invalid input series: {0}")]
    Series(#[from] SeriesError),

    /// Returned when the two series disagree on the number of channels.
    #[error("cannot align series with {left} and {right} channels")]
    ChannelMismatch {
        /// Channel count of `y_true`.
        left: usize,
        /// Channel count of `y_pred`.
        right: usize,
    },

    /// Returned when warping series that are not the ones the alignment was computed for.
    #[error("alignment was computed for lengths {expected:?}, got {got:?}")]
    AlignmentMismatch {
        /// `(n_true, n_pred)` of the aligned series.
        expected: [usize; 2],
        /// `(n_true, n_pred)` of the series passed to warp.
        got: [usize; 2],
    },

    /// Returned when the accumulated cost overflows to infinity.
    #[error("alignment cost of {n}x{m} series is not finite")]
    NonFiniteCost {
        /// Time steps in `y_true`.
        n: usize,
        /// Time steps in `y_pred`.
        m: usize,
    },
}

impl DtwError {
    /// Classify this error in the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonFiniteCost { .. } => ErrorKind::SingularComputation,
            _ => ErrorKind::PreconditionViolation,
        }
    }
}

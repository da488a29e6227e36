//! Error types for series construction and shape validation.

use std::fmt;

/// Failure categories shared by every crate in the workspace.
///
/// Callers use the kind, not the concrete error type, to decide whether a
/// failure aborts a batch of metrics or only the metric that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Inputs violate a documented precondition (shape, rank, parameter range).
    PreconditionViolation,
    /// A denominator or covariance degenerated to zero for these inputs.
    SingularComputation,
    /// An optional backend required by the computation is not present.
    CapabilityUnavailable,
    /// A metric name outside the fixed registry was requested.
    UnknownMetricName,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PreconditionViolation => "precondition violation",
            Self::SingularComputation => "singular computation",
            Self::CapabilityUnavailable => "capability unavailable",
            Self::UnknownMetricName => "unknown metric name",
        };
        f.write_str(label)
    }
}

/// Errors from series construction, reshaping, and broadcasting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series has no time steps or no channels.
    #[error("series must have at least one time step and one channel")]
    EmptySeries,

    /// Returned when a value is NaN, infinity, or negative infinity.
    #[error("series contains non-finite value at time {time}, channel {channel}")]
    NonFiniteValue {
        /// Time index of the first non-finite value found.
        time: usize,
        /// Channel index of the first non-finite value found.
        channel: usize,
    },

    /// Returned when rows of a nested input have different lengths.
    #[error("row {row} has {got} values, expected {expected}")]
    RaggedRows {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// Returned when a flat buffer does not match the declared shape.
    #[error("buffer holds {got} values, shape requires {expected}")]
    ShapeMismatch {
        /// Number of values the shape requires.
        expected: usize,
        /// Number of values provided.
        got: usize,
    },

    /// Returned when an input has more than two axes.
    #[error("series must be at most 2-dimensional (time x channel), got rank {rank}")]
    RankTooHigh {
        /// Rank of the rejected input.
        rank: usize,
    },

    /// Returned when two shapes cannot be broadcast against each other.
    #[error("shapes {left:?} and {right:?} are not broadcastable")]
    NotBroadcastable {
        /// Shape of the left-hand operand.
        left: Vec<usize>,
        /// Shape of the right-hand operand.
        right: Vec<usize>,
    },
}

impl SeriesError {
    /// Every series error is a precondition violation.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::PreconditionViolation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_values() {
        let err = SeriesError::NotBroadcastable {
            left: vec![3, 4],
            right: vec![3, 5],
        };
        assert_eq!(err.to_string(), "shapes [3, 4] and [3, 5] are not broadcastable");
        assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ErrorKind::SingularComputation.to_string(), "singular computation");
    }
}

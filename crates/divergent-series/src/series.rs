//! Multichannel time series with validation guarantees.

use std::ops::Index;

use crate::error::SeriesError;
use crate::shape::{broadcast_shape, check_broadcastable};

/// Owned, validated time series of shape `(time, channels)`.
///
/// Stored row-major: the values of time step `t` are contiguous. Guaranteed
/// to hold at least one time step and one channel, with all values finite.
/// Univariate input is promoted to a single channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    data: Vec<f64>,
    n_time: usize,
    n_channels: usize,
}

impl Series {
    /// Create a series from a row-major buffer of `n_time * n_channels` values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::EmptySeries`] | `n_time` or `n_channels` is zero |
    /// | [`SeriesError::ShapeMismatch`] | `values.len() != n_time * n_channels` |
    /// | [`SeriesError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_flat(values: Vec<f64>, n_time: usize, n_channels: usize) -> Result<Self, SeriesError> {
        if n_time == 0 || n_channels == 0 {
            return Err(SeriesError::EmptySeries);
        }
        let expected = n_time * n_channels;
        if values.len() != expected {
            return Err(SeriesError::ShapeMismatch {
                expected,
                got: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFiniteValue {
                time: index / n_channels,
                channel: index % n_channels,
            });
        }
        Ok(Self {
            data: values,
            n_time,
            n_channels,
        })
    }

    /// Create a single-channel series. Integer inputs are promoted to `f64`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::EmptySeries`] | `values` is empty |
    /// | [`SeriesError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn univariate<T: Copy + Into<f64>>(values: &[T]) -> Result<Self, SeriesError> {
        let data: Vec<f64> = values.iter().map(|&v| v.into()).collect();
        let n = data.len();
        Self::from_flat(data, n, 1)
    }

    /// Create a series from rows, one row per time step.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::EmptySeries`] | No rows, or rows are empty |
    /// | [`SeriesError::RaggedRows`] | Rows differ in length |
    /// | [`SeriesError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_rows<T: Copy + Into<f64>>(rows: &[Vec<T>]) -> Result<Self, SeriesError> {
        let Some(first) = rows.first() else {
            return Err(SeriesError::EmptySeries);
        };
        let n_channels = first.len();
        let mut data = Vec::with_capacity(rows.len() * n_channels);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != n_channels {
                return Err(SeriesError::RaggedRows {
                    row,
                    expected: n_channels,
                    got: values.len(),
                });
            }
            data.extend(values.iter().map(|&v| v.into()));
        }
        Self::from_flat(data, rows.len(), n_channels)
    }

    /// Create a series from channel-major input, one vector per channel.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Series::from_rows`], with "row" meaning channel.
    pub fn from_channels(channels: &[Vec<f64>]) -> Result<Self, SeriesError> {
        Ok(Self::from_rows(channels)?.transposed())
    }

    /// Create a series from an n-dimensional shape and a row-major buffer.
    ///
    /// Rank-1 shapes become a single channel; rank-2 shapes are read as
    /// `(time, channels)`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::RankTooHigh`] | `shape.len() > 2` |
    /// | [`SeriesError::EmptySeries`] | `shape` is empty or has a zero axis |
    /// | [`SeriesError::ShapeMismatch`] | Buffer length disagrees with `shape` |
    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>) -> Result<Self, SeriesError> {
        match *shape {
            [] => Err(SeriesError::EmptySeries),
            [n_time] => Self::from_flat(values, n_time, 1),
            [n_time, n_channels] => Self::from_flat(values, n_time, n_channels),
            _ => Err(SeriesError::RankTooHigh { rank: shape.len() }),
        }
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn n_time(&self) -> usize {
        self.n_time
    }

    /// Return the number of channels.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Return the number of time steps. Alias of [`Series::n_time`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.n_time
    }

    /// Return true if the series has no time steps.
    ///
    /// A validated [`Series`] is never empty; provided to satisfy the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_time == 0
    }

    /// Return the shape as `[time, channels]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 2] {
        [self.n_time, self.n_channels]
    }

    /// Return the row-major value buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Return the value at time `t`, channel `c`.
    ///
    /// # Panics
    ///
    /// Panics if `t` or `c` is out of bounds.
    #[must_use]
    pub fn get(&self, t: usize, c: usize) -> f64 {
        assert!(c < self.n_channels, "channel {c} out of bounds for {} channels", self.n_channels);
        self.data[t * self.n_channels + c]
    }

    /// Return all channel values at time step `t`.
    #[must_use]
    pub fn row(&self, t: usize) -> &[f64] {
        let start = t * self.n_channels;
        &self.data[start..start + self.n_channels]
    }

    /// Iterate over time steps.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_channels)
    }

    /// Collect channel `c` across all time steps.
    #[must_use]
    pub fn channel(&self, c: usize) -> Vec<f64> {
        self.rows().map(|row| row[c]).collect()
    }

    /// Collect every channel, channel-major.
    #[must_use]
    pub fn channels(&self) -> Vec<Vec<f64>> {
        (0..self.n_channels).map(|c| self.channel(c)).collect()
    }

    /// Return the first `len` time steps.
    ///
    /// Clamps like slice syntax: a `len` beyond the series keeps every step,
    /// and a `len` of zero keeps the first step so the result stays valid.
    #[must_use]
    pub fn head(&self, len: usize) -> Self {
        let n_time = len.clamp(1, self.n_time);
        Self {
            data: self.data[..n_time * self.n_channels].to_vec(),
            n_time,
            n_channels: self.n_channels,
        }
    }

    /// Swap the time and channel axes.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.n_channels {
            data.extend(self.rows().map(|row| row[c]));
        }
        Self {
            data,
            n_time: self.n_channels,
            n_channels: self.n_time,
        }
    }

    /// Select time steps by index, in the given order. Indices may repeat.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds or `indices` is empty.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        assert!(!indices.is_empty(), "cannot select zero rows");
        let mut data = Vec::with_capacity(indices.len() * self.n_channels);
        for &t in indices {
            data.extend_from_slice(self.row(t));
        }
        Self {
            data,
            n_time: indices.len(),
            n_channels: self.n_channels,
        }
    }

    /// Expand this series to `shape` by repeating unit axes.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::NotBroadcastable`] | A non-unit axis differs from `shape` |
    pub fn broadcast_to(&self, shape: [usize; 2]) -> Result<Self, SeriesError> {
        let own = self.shape();
        let compatible = own
            .iter()
            .zip(shape.iter())
            .all(|(&have, &want)| have == want || have == 1);
        if !compatible {
            return Err(SeriesError::NotBroadcastable {
                left: own.to_vec(),
                right: shape.to_vec(),
            });
        }
        if own == shape {
            return Ok(self.clone());
        }
        let [n_time, n_channels] = shape;
        let mut data = Vec::with_capacity(n_time * n_channels);
        for t in 0..n_time {
            let src_t = if self.n_time == 1 { 0 } else { t };
            for c in 0..n_channels {
                let src_c = if self.n_channels == 1 { 0 } else { c };
                data.push(self.data[src_t * self.n_channels + src_c]);
            }
        }
        Ok(Self {
            data,
            n_time,
            n_channels,
        })
    }

    /// Build a new series by applying `f` to every value.
    ///
    /// Returns `None` if `f` produces a non-finite value.
    #[must_use]
    pub fn try_map(&self, f: impl Fn(f64) -> f64) -> Option<Self> {
        let data: Vec<f64> = self.data.iter().map(|&v| f(v)).collect();
        if data.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self {
            data,
            n_time: self.n_time,
            n_channels: self.n_channels,
        })
    }

    /// Consume and return the row-major buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }
}

impl Index<(usize, usize)> for Series {
    type Output = f64;

    fn index(&self, (t, c): (usize, usize)) -> &Self::Output {
        assert!(c < self.n_channels, "channel {c} out of bounds for {} channels", self.n_channels);
        &self.data[t * self.n_channels + c]
    }
}

impl AsRef<[f64]> for Series {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

impl TryFrom<Vec<f64>> for Series {
    type Error = SeriesError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let n = values.len();
        Self::from_flat(values, n, 1)
    }
}

/// Expand two series to their common broadcast shape.
///
/// Every two-series metric goes through this before touching values, so a
/// shape violation fails before any computation runs.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::NotBroadcastable`] | Shapes are incompatible |
pub fn broadcast_pair(left: &Series, right: &Series) -> Result<(Series, Series), SeriesError> {
    check_broadcastable(&left.shape(), &right.shape())?;
    let shape = broadcast_shape(&left.shape(), &right.shape()).ok_or_else(|| {
        SeriesError::NotBroadcastable {
            left: left.shape().to_vec(),
            right: right.shape().to_vec(),
        }
    })?;
    let target = [shape[0], shape[1]];
    Ok((left.broadcast_to(target)?, right.broadcast_to(target)?))
}

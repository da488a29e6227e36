//! Series preprocessing: per-channel standardization and summary statistics.

use crate::series::Series;

/// Mean and population standard deviation of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMoments {
    /// Arithmetic mean along time.
    pub mean: f64,
    /// Population standard deviation along time (divides by n).
    pub std: f64,
}

/// Moments of one channel after dividing by its largest magnitude.
///
/// Keeps every intermediate sum within `[-n, n]` so inputs near `f64::MAX`
/// cannot overflow.
#[derive(Debug, Clone, Copy)]
struct ScaledMoments {
    magnitude: f64,
    mean: f64,
    std: f64,
}

impl ScaledMoments {
    fn of(values: &[f64]) -> Self {
        let magnitude = values.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if magnitude == 0.0 {
            return Self {
                magnitude: 1.0,
                mean: 0.0,
                std: 0.0,
            };
        }
        let n = values.len() as f64;
        let mean = values.iter().map(|&x| x / magnitude).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|&x| (x / magnitude - mean).powi(2))
            .sum::<f64>()
            / n;
        Self {
            magnitude,
            mean,
            std: variance.sqrt(),
        }
    }

    fn unscaled(self) -> ChannelMoments {
        ChannelMoments {
            mean: self.mean * self.magnitude,
            std: self.std * self.magnitude,
        }
    }
}

/// Compute the mean and population standard deviation of each channel.
///
/// Values are rescaled by the channel's largest magnitude before summing, so
/// the moments stay finite for any finite input.
#[must_use]
pub fn channel_moments(series: &Series) -> Vec<ChannelMoments> {
    (0..series.n_channels())
        .map(|c| ScaledMoments::of(&series.channel(c)).unscaled())
        .collect()
}

/// Z-score every channel along time to zero mean and unit variance.
///
/// Uses population standard deviation (divides by n, not n-1). A channel
/// with zero variance is only centered: its scale is taken as 1 so the
/// division stays defined.
#[must_use = "returns a new standardized series; the input is unchanged"]
pub fn standardize(series: &Series) -> Series {
    let n_channels = series.n_channels();
    let moments: Vec<ScaledMoments> = (0..n_channels)
        .map(|c| ScaledMoments::of(&series.channel(c)))
        .collect();
    let data: Vec<f64> = series
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let m = moments[i % n_channels];
            let centered = x / m.magnitude - m.mean;
            if m.std == 0.0 {
                centered * m.magnitude
            } else {
                centered / m.std
            }
        })
        .collect();
    // Scaled values lie in [-1, 1], so centering and dividing by a positive std stays finite
    Series::from_flat(data, series.n_time(), n_channels)
        .expect("standardized values should be finite")
}

//! Hellinger distance between normalized power spectra.

use divergent_series::Series;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use tracing::{debug, instrument};

use crate::error::DivergenceError;

/// Squared magnitude of the discrete Fourier transform of `signal`.
///
/// No window is applied; the result has one bin per input sample.
#[must_use]
pub fn power_spectrum(signal: &[f64]) -> Vec<f64> {
    let mut planner = FftPlanner::<f64>::new();
    spectrum_with(&mut planner, signal)
}

fn spectrum_with(planner: &mut FftPlanner<f64>, signal: &[f64]) -> Vec<f64> {
    let fft = planner.plan_fft_forward(signal.len());
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);
    buffer.iter().map(Complex::norm_sqr).collect()
}

/// Hellinger distance between two discrete distributions of equal length.
///
/// Both inputs must already sum to one. Evaluated as
/// `sqrt(0.5 * sum((sqrt(p) - sqrt(q))^2))`, which equals
/// `sqrt(1 - sum(sqrt(p * q)))` for normalized inputs but is exactly zero for
/// identical ones.
#[must_use]
pub fn hellinger_distance(p: &[f64], q: &[f64]) -> f64 {
    let sq: f64 = p
        .iter()
        .zip(q)
        .map(|(a, b)| (a.max(0.0).sqrt() - b.max(0.0).sqrt()).powi(2))
        .sum();
    (0.5 * sq).sqrt().min(1.0)
}

/// Configuration for the spectral Hellinger distance.
///
/// Each channel's power spectrum is truncated to its first
/// `min(num_freq_bins, n_true, n_gen)` bins, renormalized to sum to one, and
/// compared with [`hellinger_distance`]. Keeping only the low-frequency bins
/// focuses the comparison on the slow dynamics.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `num_freq_bins` | 100 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralConfig {
    num_freq_bins: usize,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self { num_freq_bins: 100 }
    }
}

impl SpectralConfig {
    /// Create a configuration with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of low-frequency bins compared.
    #[must_use]
    pub fn with_num_freq_bins(mut self, num_freq_bins: usize) -> Self {
        self.num_freq_bins = num_freq_bins;
        self
    }

    /// Return the number of low-frequency bins compared.
    #[must_use]
    pub fn num_freq_bins(&self) -> usize {
        self.num_freq_bins
    }

    /// Per-channel Hellinger distance between the power spectra of the two series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DivergenceError::ZeroParameter`] | `num_freq_bins` is zero |
    /// | [`DivergenceError::ChannelMismatch`] | The series differ in channel count |
    /// | [`DivergenceError::ZeroSpectrum`] | A channel has no energy in the retained bins |
    #[instrument(skip(self, y_true, y_generated), fields(bins = self.num_freq_bins))]
    pub fn distance(&self, y_true: &Series, y_generated: &Series) -> Result<Vec<f64>, DivergenceError> {
        if self.num_freq_bins == 0 {
            return Err(DivergenceError::ZeroParameter {
                parameter: "num_freq_bins",
            });
        }
        if y_true.n_channels() != y_generated.n_channels() {
            return Err(DivergenceError::ChannelMismatch {
                left: y_true.n_channels(),
                right: y_generated.n_channels(),
            });
        }
        let bins = self.num_freq_bins.min(y_true.n_time()).min(y_generated.n_time());

        let mut planner = FftPlanner::<f64>::new();
        let mut distances = Vec::with_capacity(y_true.n_channels());
        for channel in 0..y_true.n_channels() {
            let p = retained_distribution(&mut planner, &y_true.channel(channel), bins, channel)?;
            let q = retained_distribution(&mut planner, &y_generated.channel(channel), bins, channel)?;
            let d = hellinger_distance(&p, &q);
            debug!(channel, distance = d, "spectral hellinger distance");
            distances.push(d);
        }
        Ok(distances)
    }

    /// Mean of [`SpectralConfig::distance`] across channels.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SpectralConfig::distance`].
    pub fn mean_distance(&self, y_true: &Series, y_generated: &Series) -> Result<f64, DivergenceError> {
        let distances = self.distance(y_true, y_generated)?;
        Ok(distances.iter().sum::<f64>() / distances.len() as f64)
    }
}

fn retained_distribution(
    planner: &mut FftPlanner<f64>,
    signal: &[f64],
    bins: usize,
    channel: usize,
) -> Result<Vec<f64>, DivergenceError> {
    let mut spectrum = spectrum_with(planner, signal);
    spectrum.truncate(bins);
    let total: f64 = spectrum.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(DivergenceError::ZeroSpectrum { channel });
    }
    for v in &mut spectrum {
        *v /= total;
    }
    Ok(spectrum)
}

/// Per-channel spectral Hellinger distance with `num_freq_bins` retained bins.
///
/// # Errors
///
/// Same conditions as [`SpectralConfig::distance`].
pub fn average_hellinger_distance(
    y_true: &Series,
    y_generated: &Series,
    num_freq_bins: usize,
) -> Result<Vec<f64>, DivergenceError> {
    SpectralConfig::new()
        .with_num_freq_bins(num_freq_bins)
        .distance(y_true, y_generated)
}

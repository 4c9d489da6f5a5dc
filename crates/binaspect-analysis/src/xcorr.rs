//! Band-limited cross-correlation evaluated from a cross-spectrum, with
//! deterministic peak picking.
//!
//! # Mathematical Definition
//!
//! The cross-correlation of signals x and y at lag τ is:
//!
//! ```text
//! R_xy(τ) = Σ_{n} x[n] · y[n + τ]
//! ```
//!
//! R_xy peaks at lag τ₀ when y is x delayed by τ₀ samples,
//! i.e. y\[n\] = x\[n - τ₀\] → peak at τ = τ₀.
//!
//! # Band-limited form
//!
//! With X, Y the N-point DFTs of x and y (zero-padded to N ≥ 2·len so the
//! correlation does not wrap), the cross-correlation theorem gives
//!
//! ```text
//! R_xy(τ) = (1/N) Σ_k conj(X[k]) · Y[k] · e^{i2πkτ/N}
//! ```
//!
//! Restricting k to a band yields the correlation of the band-passed
//! signals. [`LagCorrelator`] evaluates this sum only at the lags of interest.
//! Positive and negative lags share one twiddle lookup, so the output for
//! swapped inputs is the exact mirror image of the original.
//!
//! Reference: Oppenheim & Schafer, "Discrete-Time Signal Processing" (3rd ed.), §2.8.

use rustfft::num_complex::Complex;

use crate::band::BinRange;

/// Element-wise `conj(x) · y`.
pub fn cross_spectrum(x: &[Complex<f32>], y: &[Complex<f32>]) -> Vec<Complex<f32>> {
    x.iter().zip(y.iter()).map(|(a, b)| a.conj() * b).collect()
}

/// Evaluates band-limited cross-correlation at lags `-max_lag..=max_lag`.
#[derive(Debug, Clone)]
pub struct LagCorrelator {
    fft_size: usize,
    max_lag: usize,
    cos: Vec<f32>,
    sin: Vec<f32>,
}

impl LagCorrelator {
    /// Create a correlator for spectra of an `fft_size`-point transform.
    pub fn new(fft_size: usize, max_lag: usize) -> Self {
        let (cos, sin) = (0..fft_size)
            .map(|m| {
                let phase = 2.0 * std::f64::consts::PI * m as f64 / fft_size as f64;
                (phase.cos() as f32, phase.sin() as f32)
            })
            .unzip();

        Self {
            fft_size,
            max_lag,
            cos,
            sin,
        }
    }

    /// Largest lag evaluated, in samples.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Correlation over `bins` of a cross-spectrum from [`cross_spectrum`].
    ///
    /// Entry `i` holds R at lag `i - max_lag`: `[R(-max_lag), …, R(0), …, R(max_lag)]`.
    pub fn correlate(&self, cross: &[Complex<f32>], bins: BinRange) -> Vec<f32> {
        let n = self.fft_size;
        let centre = self.max_lag;
        let mut result = vec![0.0f32; 2 * self.max_lag + 1];

        for lag in 0..=self.max_lag {
            let mut pos = 0.0f32;
            let mut neg = 0.0f32;
            for k in bins.iter() {
                // DC and Nyquist appear once in the full spectrum, the rest twice.
                let weight = if k == 0 || 2 * k == n { 1.0 } else { 2.0 };
                let m = (k * lag) % n;
                let c = cross[k];
                pos += weight * (c.re * self.cos[m] - c.im * self.sin[m]);
                neg += weight * (c.re * self.cos[m] + c.im * self.sin[m]);
            }
            result[centre + lag] = pos / n as f32;
            result[centre - lag] = if lag == 0 { pos / n as f32 } else { neg / n as f32 };
        }

        result
    }
}

/// Find the lag of maximum correlation and its value.
///
/// Ties resolve to the smallest-magnitude lag, positive before negative.
/// Positive lag means y lags x (`y[n] ≈ x[n - lag]`).
pub fn peak_lag(correlation: &[f32], max_lag: usize) -> (i32, f32) {
    if correlation.is_empty() {
        return (0, 0.0);
    }

    let mut best_lag = 0i32;
    let mut best_val = correlation[max_lag];
    for magnitude in 1..=max_lag as i32 {
        for lag in [magnitude, -magnitude] {
            let value = correlation[(lag + max_lag as i32) as usize];
            if value > best_val {
                best_lag = lag;
                best_val = value;
            }
        }
    }

    (best_lag, best_val)
}

/// Sub-sample offset of a peak from a parabola through its neighbours.
///
/// Returns 0 when the peak sits on the edge of the lag window or the
/// neighbourhood is not concave. The result lies in `[-0.5, 0.5]`.
pub fn parabolic_offset(correlation: &[f32], max_lag: usize, lag: i32) -> f32 {
    let i = (lag + max_lag as i32) as usize;
    if i == 0 || i + 1 >= correlation.len() {
        return 0.0;
    }
    let before = correlation[i - 1];
    let peak = correlation[i];
    let after = correlation[i + 1];

    let curvature = (before + after) - 2.0 * peak;
    if curvature >= 0.0 {
        return 0.0;
    }
    (0.5 * (before - after) / curvature).clamp(-0.5, 0.5)
}

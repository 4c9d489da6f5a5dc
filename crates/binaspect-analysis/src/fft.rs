//! Real-input FFT and analysis windows.

use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::TAU;
use std::sync::Arc;

/// Analysis window applied to every frame before the transform.
///
/// All windows are periodic (DFT-even), so overlapping Hann frames at half
/// the frame length sum to a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Window {
    /// No taper.
    Rectangular,
    /// Raised cosine.
    #[default]
    Hann,
    /// Hamming.
    Hamming,
    /// Three-term Blackman.
    Blackman,
    /// Four-term Blackman-Harris, lowest sidelobes of the set.
    BlackmanHarris,
}

impl Window {
    /// Cosine-sum terms `a0 - a1·cos(x) + a2·cos(2x) - a3·cos(3x)`.
    fn terms(self) -> [f32; 4] {
        match self {
            Window::Rectangular => [1.0, 0.0, 0.0, 0.0],
            Window::Hann => [0.5, 0.5, 0.0, 0.0],
            Window::Hamming => [0.54, 0.46, 0.0, 0.0],
            Window::Blackman => [0.42, 0.5, 0.08, 0.0],
            Window::BlackmanHarris => [0.35875, 0.48829, 0.14128, 0.01168],
        }
    }

    /// Window coefficients for a frame of `size` samples.
    pub fn coefficients(self, size: usize) -> Vec<f32> {
        let [a0, a1, a2, a3] = self.terms();
        (0..size)
            .map(|i| {
                let x = TAU * i as f32 / size as f32;
                a0 - a1 * x.cos() + a2 * (2.0 * x).cos() - a3 * (3.0 * x).cos()
            })
            .collect()
    }
}

/// Forward FFT of a fixed size.
///
/// The plan is shared behind `Arc`, so an `Fft` is cheap to clone into
/// worker threads.
#[derive(Clone)]
pub struct Fft {
    plan: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl std::fmt::Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

impl Fft {
    /// Plan a transform of `size` points.
    pub fn new(size: usize) -> Self {
        let plan = FftPlanner::new().plan_fft_forward(size);
        Self { plan, size }
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-negative frequency bins, DC to Nyquist.
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Transform real input and keep bins `0..=size/2`.
    ///
    /// Shorter input is zero-padded; longer input is cut to `size`.
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.size];
        for (slot, &x) in buffer.iter_mut().zip(input) {
            slot.re = x;
        }
        self.plan.process(&mut buffer);
        buffer.truncate(self.num_bins());
        buffer
    }
}

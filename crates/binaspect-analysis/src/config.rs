//! Analysis parameters with documented defaults.
//!
//! Every engine operation takes an [`AnalysisConfig`]. With the `serde`
//! feature enabled the struct can be loaded from a partial TOML or JSON
//! document; missing fields fall back to [`AnalysisConfig::default`].

use crate::band::BandLayout;
use crate::error::{Error, Result};
use crate::fft::Window;
use crate::frame::TailPolicy;

/// Default number of histogram bins on the cue axis.
pub const DEFAULT_BINS: usize = 400;

/// Default ITD half-range in microseconds (histograms span ±800 µs).
pub const DEFAULT_ITD_RANGE_US: f32 = 800.0;

/// Default analysis frame length in samples.
pub const DEFAULT_FRAME_LEN: usize = 2048;

/// Default hop between frames in samples.
pub const DEFAULT_HOP_LEN: usize = 1024;

/// Parameters shared by every cue estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct AnalysisConfig {
    /// Frame length in samples.
    pub frame_len: usize,
    /// Hop between frame starts in samples (must not exceed `frame_len`).
    pub hop_len: usize,
    /// Window applied to every frame before the spectral transform.
    pub window: Window,
    /// How the final partial frame is handled.
    pub tail: TailPolicy,
    /// Number of histogram bins on the cue axis.
    pub bins: usize,
    /// ITD half-range in microseconds; estimates are clamped to ±this.
    pub itd_range_us: f32,
    /// Refine the cross-correlation peak by parabolic interpolation.
    pub refine_peak: bool,
    /// Frequency bands estimated independently for ITD and ILR.
    pub bands: BandLayout,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_len: DEFAULT_FRAME_LEN,
            hop_len: DEFAULT_HOP_LEN,
            window: Window::Hann,
            tail: TailPolicy::Pad,
            bins: DEFAULT_BINS,
            itd_range_us: DEFAULT_ITD_RANGE_US,
            refine_peak: true,
            bands: BandLayout::Broadband,
        }
    }
}

impl AnalysisConfig {
    /// Check every parameter that does not depend on the sample rate.
    pub fn validate(&self) -> Result<()> {
        if self.frame_len == 0 {
            return Err(Error::invalid("frame_len", "must be positive"));
        }
        if self.hop_len == 0 {
            return Err(Error::invalid("hop_len", "must be positive"));
        }
        if self.hop_len > self.frame_len {
            return Err(Error::invalid(
                "hop_len",
                format!(
                    "must not exceed frame_len ({}), got {}",
                    self.frame_len, self.hop_len
                ),
            ));
        }
        if self.bins == 0 {
            return Err(Error::invalid("bins", "must be positive"));
        }
        if !(self.itd_range_us.is_finite() && self.itd_range_us > 0.0) {
            return Err(Error::invalid(
                "itd_range_us",
                format!("must be positive and finite, got {}", self.itd_range_us),
            ));
        }
        self.bands.validate()
    }

    /// Builder-style override of the frame and hop lengths.
    pub fn with_framing(mut self, frame_len: usize, hop_len: usize) -> Self {
        self.frame_len = frame_len;
        self.hop_len = hop_len;
        self
    }

    /// Builder-style override of the band layout.
    pub fn with_bands(mut self, bands: BandLayout) -> Self {
        self.bands = bands;
        self
    }
}

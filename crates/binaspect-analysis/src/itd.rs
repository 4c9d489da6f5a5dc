//! Interaural time difference estimation.
//!
//! For every frame and band, the left and right spectra are combined into a
//! cross-spectrum, the band-limited cross-correlation is evaluated over
//! `±itd_range_us`, and the peak lag becomes the estimate.
//!
//! # Sign convention
//!
//! Positive ITD means the right channel lags the left (the source is on the
//! left). Swapping the channels negates every estimate exactly.

use crate::band::{Band, BandDecomposer, BandSpectrum};
use crate::buffer::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::cue::{CueKind, CueRange, CueTrack};
use crate::error::{Error, Result};
use crate::frame::Framer;
use crate::xcorr::{LagCorrelator, cross_spectrum, parabolic_offset, peak_lag};

/// Largest lag in samples covering `range_us`, limited by the frame length.
///
/// `range_us` must be positive and finite, as `AnalysisConfig::validate`
/// enforces. The float-to-int cast saturates, so large ranges end up at the
/// frame-length cap.
pub fn max_lag_samples(range_us: f32, sample_rate: f32, frame_len: usize) -> usize {
    debug_assert!(
        range_us.is_finite() && range_us > 0.0,
        "itd range {range_us} us"
    );
    let lag = (f64::from(range_us) * 1e-6 * f64::from(sample_rate)).ceil() as usize;
    lag.min(frame_len.saturating_sub(1))
}

/// Per-band ITD estimator for one sample rate.
#[derive(Debug, Clone)]
pub struct ItdEstimator {
    framer: Framer,
    decomposer: BandDecomposer,
    bands: Vec<Band>,
    correlator: LagCorrelator,
    range: CueRange,
    refine: bool,
}

impl ItdEstimator {
    /// Build an estimator for buffers at `sample_rate`.
    pub fn new(config: &AnalysisConfig, sample_rate: f32) -> Result<Self> {
        config.validate()?;
        let framer = Framer::from_config(config)?;
        let decomposer = BandDecomposer::new(&framer, sample_rate)?;
        let bands = decomposer.bands(&config.bands)?;
        let max_lag = max_lag_samples(config.itd_range_us, sample_rate, framer.frame_len());
        let correlator = LagCorrelator::new(decomposer.fft_size(), max_lag);

        Ok(Self {
            framer,
            decomposer,
            bands,
            correlator,
            range: CueRange::itd(config.itd_range_us),
            refine: config.refine_peak,
        })
    }

    /// Lag search radius in samples.
    pub fn max_lag(&self) -> usize {
        self.correlator.max_lag()
    }

    /// Bands estimated per frame.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Output range in microseconds.
    pub fn range(&self) -> CueRange {
        self.range
    }

    /// ITD of each band for one frame's spectra, in microseconds.
    pub fn estimate_frame(&self, left: &BandSpectrum, right: &BandSpectrum) -> Vec<f32> {
        let cross = cross_spectrum(&left.bins, &right.bins);
        let max_lag = self.correlator.max_lag();
        let sample_rate = self.decomposer.sample_rate();

        self.bands
            .iter()
            .map(|band| {
                let correlation = self.correlator.correlate(&cross, band.bins);
                let (lag, _) = peak_lag(&correlation, max_lag);
                let offset = if self.refine {
                    parabolic_offset(&correlation, max_lag, lag)
                } else {
                    0.0
                };
                let itd_us = (lag as f32 + offset) / sample_rate * 1e6;
                self.range.clamp(itd_us)
            })
            .collect()
    }

    /// Estimate every frame of `buffer`.
    pub fn track(&self, buffer: &AudioBuffer) -> Result<CueTrack> {
        check_rate(buffer, &self.decomposer)?;
        let values = self
            .decomposer
            .map_frames(&self.framer, buffer, |l, r| self.estimate_frame(l, r));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            frames = values.len(),
            bands = self.bands.len(),
            max_lag = self.max_lag(),
            "estimated ITD track"
        );

        Ok(CueTrack {
            kind: CueKind::Itd,
            range: self.range,
            values,
            bands_hz: self.bands.iter().map(|b| (b.low_hz, b.high_hz)).collect(),
            hop_len: self.framer.hop_len(),
            sample_rate: buffer.sample_rate(),
        })
    }
}

pub(crate) fn check_rate(buffer: &AudioBuffer, decomposer: &BandDecomposer) -> Result<()> {
    if buffer.sample_rate() == decomposer.sample_rate() {
        Ok(())
    } else {
        Err(Error::invalid(
            "sample_rate",
            format!(
                "estimator built for {} Hz, buffer is {} Hz",
                decomposer.sample_rate(),
                buffer.sample_rate()
            ),
        ))
    }
}

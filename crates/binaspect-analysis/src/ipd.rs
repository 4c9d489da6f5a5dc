//! Interaural phase difference over a frequency sub-range.
//!
//! For each frame and each bin in the requested range the estimate is
//! `arg(L · conj(R))` in (-π, π]. When unwrapping is requested, each frame's
//! sequence across bins is unwrapped independently; frames are never
//! unwrapped relative to each other.

use crate::band::{BandDecomposer, BandSpectrum, BinRange};
use crate::buffer::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::frame::Framer;
use crate::itd::check_rate;
use crate::phase::{phase_difference, unwrap_phase};

/// Phase difference map over `(bin, frame)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IpdSpectrogram {
    /// Phase differences in radians, `[bin][frame]` (row 0 = `bins.start`).
    pub data: Vec<Vec<f32>>,
    /// Transform bins covered by the rows.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub bins: BinRange,
    /// Centre frequency of each row in Hz.
    pub freqs: Vec<f32>,
    /// True if values are wrapped to (-π, π].
    pub wrapped: bool,
    /// Hop between frames in samples.
    pub hop_len: usize,
    /// Sample rate of the analysed buffer.
    pub sample_rate: f32,
}

impl IpdSpectrogram {
    /// Number of bin rows.
    pub fn num_bins(&self) -> usize {
        self.data.len()
    }

    /// Number of frame columns.
    pub fn num_frames(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// `(bins, frames)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_bins(), self.num_frames())
    }

    /// Value at `(row, frame)`, or `None` out of bounds.
    pub fn get(&self, row: usize, frame: usize) -> Option<f32> {
        self.data.get(row).and_then(|r| r.get(frame)).copied()
    }

    /// All rows for one frame, low frequency first.
    pub fn frame(&self, frame: usize) -> Vec<f32> {
        self.data
            .iter()
            .filter_map(|row| row.get(frame).copied())
            .collect()
    }

    /// Smallest and largest value, `(0, 0)` when empty.
    pub fn value_range(&self) -> (f32, f32) {
        let mut values = self.data.iter().flatten().copied();
        let Some(first) = values.next() else {
            return (0.0, 0.0);
        };
        values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

/// IPD estimator for one sample rate and frequency range.
#[derive(Debug, Clone)]
pub struct IpdEstimator {
    framer: Framer,
    decomposer: BandDecomposer,
    bins: BinRange,
    wrapped: bool,
}

impl IpdEstimator {
    /// Build an estimator over `[start_freq, stop_freq]`.
    ///
    /// The range is widened to the nearest enclosing bins. Fails with
    /// [`crate::Error::InvalidParameter`] if `start_freq >= stop_freq` or the
    /// range leaves `[0, Nyquist]`.
    pub fn new(
        config: &AnalysisConfig,
        sample_rate: f32,
        start_freq: f32,
        stop_freq: f32,
        wrapped: bool,
    ) -> Result<Self> {
        config.validate()?;
        let framer = Framer::from_config(config)?;
        let decomposer = BandDecomposer::new(&framer, sample_rate)?;
        let bins = decomposer.bin_range(start_freq, stop_freq)?;
        Ok(Self {
            framer,
            decomposer,
            bins,
            wrapped,
        })
    }

    /// Bins covered.
    pub fn bins(&self) -> BinRange {
        self.bins
    }

    /// Phase difference of each bin for one frame's spectra.
    pub fn estimate_frame(&self, left: &BandSpectrum, right: &BandSpectrum) -> Vec<f32> {
        let wrapped: Vec<f32> = self
            .bins
            .iter()
            .map(|k| phase_difference(left.bins[k], right.bins[k]))
            .collect();
        if self.wrapped {
            wrapped
        } else {
            unwrap_phase(&wrapped)
        }
    }

    /// Estimate every frame of `buffer`.
    pub fn spectrogram(&self, buffer: &AudioBuffer) -> Result<IpdSpectrogram> {
        check_rate(buffer, &self.decomposer)?;
        let columns = self
            .decomposer
            .map_frames(&self.framer, buffer, |l, r| self.estimate_frame(l, r));

        let data = (0..self.bins.len())
            .map(|row| columns.iter().map(|column| column[row]).collect())
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            frames = columns.len(),
            start_bin = self.bins.start,
            stop_bin = self.bins.stop,
            wrapped = self.wrapped,
            "estimated IPD spectrogram"
        );

        Ok(IpdSpectrogram {
            data,
            bins: self.bins,
            freqs: self
                .bins
                .iter()
                .map(|k| self.decomposer.bin_to_freq(k))
                .collect(),
            wrapped: self.wrapped,
            hop_len: self.framer.hop_len(),
            sample_rate: buffer.sample_rate(),
        })
    }
}

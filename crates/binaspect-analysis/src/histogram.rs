//! Cue histograms: quantized cue value against frame index.
//!
//! A [`CueHistogram`] has shape `(bins, frames)`. Column `j` counts the band
//! estimates of frame `j`, so every frame contributes a column whatever its
//! energy. Quantization is linear over the cue range with the upper edge
//! inclusive:
//!
//! ```text
//! bin = min(floor((v - lo) / (hi - lo) · B), B - 1)
//! ```

use crate::cue::{CueKind, CueRange, CueTrack};
use crate::error::{Error, Result, ensure_same};

/// Bin of `value` on a `bins`-bin axis over `range`; out-of-range values
/// land in the first or last bin.
pub fn bin_index(value: f32, range: CueRange, bins: usize) -> usize {
    let position = (value - range.lo) / range.width() * bins as f32;
    if position.is_nan() || position <= 0.0 {
        return 0;
    }
    (position.floor() as usize).min(bins.saturating_sub(1))
}

/// Occupancy map of a cue over time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CueHistogram {
    /// Cue counted.
    pub kind: CueKind,
    /// Physical range of the bin axis.
    pub range: CueRange,
    /// Counts `[bin][frame]`; bin 0 holds the lowest values.
    pub data: Vec<Vec<f32>>,
    /// Hop between frames in samples.
    pub hop_len: usize,
    /// Sample rate of the analysed buffer.
    pub sample_rate: f32,
}

impl CueHistogram {
    /// Count a track's estimates into `bins` bins over the track's range.
    pub fn from_track(track: &CueTrack, bins: usize) -> Result<Self> {
        Self::with_range(track, track.range, bins)
    }

    /// Count a track's estimates into `bins` bins over `range`.
    pub fn with_range(track: &CueTrack, range: CueRange, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(Error::invalid("bins", "must be positive"));
        }
        let range = CueRange::new(range.lo, range.hi)?;

        let mut data = vec![vec![0.0f32; track.num_frames()]; bins];
        for (frame, estimates) in track.values.iter().enumerate() {
            for &value in estimates {
                data[bin_index(value, range, bins)][frame] += 1.0;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %track.kind, bins, frames = track.num_frames(), "binned cue track");

        Ok(Self {
            kind: track.kind,
            range,
            data,
            hop_len: track.hop_len,
            sample_rate: track.sample_rate,
        })
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.data.len()
    }

    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// `(bins, frames)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_bins(), self.num_frames())
    }

    /// Count at `(bin, frame)`, or `None` out of bounds.
    pub fn get(&self, bin: usize, frame: usize) -> Option<f32> {
        self.data.get(bin).and_then(|row| row.get(frame)).copied()
    }

    /// Counts of one frame, lowest bin first.
    pub fn column(&self, frame: usize) -> Vec<f32> {
        self.data
            .iter()
            .filter_map(|row| row.get(frame).copied())
            .collect()
    }

    /// Width of one bin in cue units.
    pub fn bin_width(&self) -> f32 {
        self.range.width() / self.num_bins() as f32
    }

    /// Bin a value would fall into.
    pub fn bin_of(&self, value: f32) -> usize {
        bin_index(value, self.range, self.num_bins())
    }

    /// Cue value at the centre of `bin`.
    pub fn bin_center(&self, bin: usize) -> f32 {
        self.range.lo + (bin as f32 + 0.5) * self.bin_width()
    }

    /// Fullest bin of a frame; `None` for an empty column. Ties go to the
    /// lower bin.
    pub fn peak_bin(&self, frame: usize) -> Option<usize> {
        let column = self.column(frame);
        let mut best: Option<(usize, f32)> = None;
        for (bin, &count) in column.iter().enumerate() {
            if count > best.map_or(0.0, |(_, c)| c) {
                best = Some((bin, count));
            }
        }
        best.map(|(bin, _)| bin)
    }

    /// Count-weighted mean cue value of a frame; `None` for an empty column.
    pub fn mean_value(&self, frame: usize) -> Option<f32> {
        let column = self.column(frame);
        let total: f32 = column.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let weighted: f32 = column
            .iter()
            .enumerate()
            .map(|(bin, &count)| count * self.bin_center(bin))
            .sum();
        Some(weighted / total)
    }

    /// Copy with every non-empty column scaled to unit mass.
    pub fn normalized(&self) -> CueHistogram {
        let totals: Vec<f32> = (0..self.num_frames())
            .map(|frame| self.data.iter().map(|row| row[frame]).sum())
            .collect();

        let data = self
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .zip(totals.iter())
                    .map(|(&count, &total)| if total > 0.0 { count / total } else { 0.0 })
                    .collect()
            })
            .collect();

        CueHistogram {
            data,
            ..self.clone()
        }
    }

    /// Fail with [`Error::IncompatibleShape`] unless `other` has the same
    /// cue, axis and frame count.
    pub fn ensure_compatible(&self, other: &CueHistogram) -> Result<()> {
        ensure_same("cue kind", self.kind, other.kind)?;
        ensure_same("cue range", self.range, other.range)?;
        ensure_same("bin count", self.num_bins(), other.num_bins())?;
        ensure_same("sample rate", self.sample_rate, other.sample_rate)?;
        ensure_same("frame count", self.num_frames(), other.num_frames())
    }
}

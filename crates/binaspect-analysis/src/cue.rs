//! Cue kinds, physical ranges, and per-frame estimate tracks.

use std::f32::consts::PI;
use std::fmt;

use crate::error::{Error, Result, ensure_same};

/// Which interaural cue a track or histogram holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CueKind {
    /// Interaural time difference, microseconds.
    Itd,
    /// Interaural level ratio, dimensionless in [-1, 1].
    Ilr,
    /// Interaural phase difference, radians.
    Ipd,
}

impl CueKind {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            CueKind::Itd => "itd",
            CueKind::Ilr => "ilr",
            CueKind::Ipd => "ipd",
        }
    }

    /// Axis label for the cue value.
    pub fn axis_label(&self) -> &'static str {
        match self {
            CueKind::Itd => "ITD (us)",
            CueKind::Ilr => "ILR",
            CueKind::Ipd => "IPD (rad)",
        }
    }
}

impl fmt::Display for CueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CueKind::Itd => "ITD",
            CueKind::Ilr => "ILR",
            CueKind::Ipd => "IPD",
        })
    }
}

/// Closed physical range `[lo, hi]` of a cue axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CueRange {
    /// Lower bound.
    pub lo: f32,
    /// Upper bound.
    pub hi: f32,
}

impl CueRange {
    /// Create a range, rejecting non-finite or empty bounds.
    pub fn new(lo: f32, hi: f32) -> Result<Self> {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::invalid(
                "range",
                format!("expected finite lo < hi, got [{lo}, {hi}]"),
            ));
        }
        Ok(Self { lo, hi })
    }

    /// Symmetric ITD range `±range_us`.
    pub fn itd(range_us: f32) -> Self {
        Self {
            lo: -range_us,
            hi: range_us,
        }
    }

    /// ILR range `[-1, 1]`.
    pub fn ilr() -> Self {
        Self { lo: -1.0, hi: 1.0 }
    }

    /// Wrapped phase range `[-π, π]`.
    pub fn ipd() -> Self {
        Self { lo: -PI, hi: PI }
    }

    /// `hi - lo`.
    pub fn width(&self) -> f32 {
        self.hi - self.lo
    }

    /// Clamp `value` into the range.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.lo, self.hi)
    }

    /// True if `lo <= value <= hi`.
    pub fn contains(&self, value: f32) -> bool {
        (self.lo..=self.hi).contains(&value)
    }
}

impl fmt::Display for CueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Per-frame, per-band estimates of one cue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CueTrack {
    /// Cue held by the track.
    pub kind: CueKind,
    /// Range every value lies in.
    pub range: CueRange,
    /// Estimates `[frame][band]`.
    pub values: Vec<Vec<f32>>,
    /// Band edges in Hz, one pair per band.
    pub bands_hz: Vec<(f32, f32)>,
    /// Hop between frames in samples.
    pub hop_len: usize,
    /// Sample rate of the analysed buffer.
    pub sample_rate: f32,
}

impl CueTrack {
    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.values.len()
    }

    /// Number of bands per frame.
    pub fn num_bands(&self) -> usize {
        self.bands_hz.len()
    }

    /// Estimates for one frame.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        self.values.get(index).map(Vec::as_slice)
    }

    /// One band's estimates across all frames.
    pub fn band_over_time(&self, band: usize) -> Vec<f32> {
        self.values
            .iter()
            .filter_map(|frame| frame.get(band).copied())
            .collect()
    }

    /// Mean of each frame's band estimates.
    pub fn frame_means(&self) -> Vec<f32> {
        self.values
            .iter()
            .map(|frame| {
                if frame.is_empty() {
                    0.0
                } else {
                    frame.iter().sum::<f32>() / frame.len() as f32
                }
            })
            .collect()
    }

    /// Iterate every estimate in frame order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().flatten().copied()
    }

    /// Start time of frame `index` in seconds.
    pub fn frame_to_time(&self, index: usize) -> f32 {
        (index * self.hop_len) as f32 / self.sample_rate
    }

    /// Fail with [`Error::IncompatibleShape`] unless `other` can be compared
    /// with `self` element-wise.
    pub fn ensure_compatible(&self, other: &CueTrack) -> Result<()> {
        ensure_same("cue kind", self.kind, other.kind)?;
        ensure_same("cue range", self.range, other.range)?;
        ensure_same("sample rate", self.sample_rate, other.sample_rate)?;
        ensure_same("frame count", self.num_frames(), other.num_frames())?;
        ensure_same("band count", self.num_bands(), other.num_bands())
    }
}

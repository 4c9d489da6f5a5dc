//! Reference/test comparison: signed difference maps and similarity scores.
//!
//! Both inputs must have exactly the same shape; nothing is truncated or
//! padded. Differences are `test - reference`. Similarity scores lie in
//! [0, 1], are 1 for identical inputs and do not depend on argument order.

use std::fmt;

use crate::cue::{CueKind, CueRange, CueTrack};
use crate::error::Result;
use crate::histogram::CueHistogram;

/// Agreement between two inputs: 0 = none, 1 = identical.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct SimilarityScore(f32);

impl SimilarityScore {
    /// Wrap a raw score, clamping it into [0, 1].
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Score in [0, 1].
    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// What the rows of a [`DifferenceMap`] stand for.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "axis", rename_all = "kebab-case")
)]
pub enum DiffRows {
    /// Histogram bins evenly spanning a cue range.
    CueBins {
        /// Range of the bin axis.
        range: CueRange,
    },
    /// Analysis bands, one row per band.
    Bands {
        /// Band edges in Hz.
        edges_hz: Vec<(f32, f32)>,
    },
}

/// Signed element-wise difference, `[row][frame]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DifferenceMap {
    /// Cue compared.
    pub kind: CueKind,
    /// Row axis.
    pub rows: DiffRows,
    /// `test - reference`, `[row][frame]`.
    pub data: Vec<Vec<f32>>,
    /// Hop between frames in samples.
    pub hop_len: usize,
    /// Sample rate of both inputs.
    pub sample_rate: f32,
}

impl DifferenceMap {
    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    /// Number of frames.
    pub fn num_frames(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// `(rows, frames)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_frames())
    }

    /// Value at `(row, frame)`, or `None` out of bounds.
    pub fn get(&self, row: usize, frame: usize) -> Option<f32> {
        self.data.get(row).and_then(|r| r.get(frame)).copied()
    }

    /// Largest absolute difference, 0 when empty.
    pub fn max_abs(&self) -> f32 {
        self.data
            .iter()
            .flatten()
            .fold(0.0f32, |acc, v| acc.max(v.abs()))
    }

    /// Mean absolute difference, 0 when empty.
    pub fn mean_abs(&self) -> f32 {
        let count = self.num_rows() * self.num_frames();
        if count == 0 {
            return 0.0;
        }
        self.data.iter().flatten().map(|v| v.abs()).sum::<f32>() / count as f32
    }

    /// True if every element is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().flatten().all(|&v| v == 0.0)
    }
}

fn subtract(reference: &[Vec<f32>], test: &[Vec<f32>]) -> Vec<Vec<f32>> {
    reference
        .iter()
        .zip(test.iter())
        .map(|(r, t)| t.iter().zip(r.iter()).map(|(t, r)| t - r).collect())
        .collect()
}

fn transpose(values: &[Vec<f32>], rows: usize) -> Vec<Vec<f32>> {
    (0..rows)
        .map(|row| values.iter().map(|frame| frame[row]).collect())
        .collect()
}

/// `test - reference` over two histograms of identical shape.
pub fn histogram_difference(
    reference: &CueHistogram,
    test: &CueHistogram,
) -> Result<DifferenceMap> {
    reference.ensure_compatible(test)?;
    Ok(DifferenceMap {
        kind: reference.kind,
        rows: DiffRows::CueBins {
            range: reference.range,
        },
        data: subtract(&reference.data, &test.data),
        hop_len: reference.hop_len,
        sample_rate: reference.sample_rate,
    })
}

/// `test - reference` over two tracks of identical shape, one row per band.
pub fn track_difference(reference: &CueTrack, test: &CueTrack) -> Result<DifferenceMap> {
    reference.ensure_compatible(test)?;
    let rows = reference.num_bands();
    Ok(DifferenceMap {
        kind: reference.kind,
        rows: DiffRows::Bands {
            edges_hz: reference.bands_hz.clone(),
        },
        data: subtract(
            &transpose(&reference.values, rows),
            &transpose(&test.values, rows),
        ),
        hop_len: reference.hop_len,
        sample_rate: reference.sample_rate,
    })
}

/// Weighted Jaccard similarity of two histograms after column normalization.
///
/// ```text
/// S = Σ min(p, q) / Σ max(p, q)
/// ```
///
/// where `p` and `q` are the column-normalized densities. Two empty inputs
/// score 1.
pub fn histogram_similarity(a: &CueHistogram, b: &CueHistogram) -> Result<SimilarityScore> {
    a.ensure_compatible(b)?;
    let (p, q) = (a.normalized(), b.normalized());

    let mut overlap = 0.0f32;
    let mut union = 0.0f32;
    for (x, y) in p.data.iter().flatten().zip(q.data.iter().flatten()) {
        overlap += x.min(*y);
        union += x.max(*y);
    }

    let score = if union > 0.0 { overlap / union } else { 1.0 };

    #[cfg(feature = "tracing")]
    tracing::debug!(kind = %a.kind, score, "histogram similarity");

    Ok(SimilarityScore::new(score))
}

/// One minus the mean absolute difference relative to the cue range width.
pub fn track_similarity(a: &CueTrack, b: &CueTrack) -> Result<SimilarityScore> {
    a.ensure_compatible(b)?;
    let count = a.num_frames() * a.num_bands();
    if count == 0 {
        return Ok(SimilarityScore::new(1.0));
    }
    let total: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
    let distance = total / count as f32 / a.range.width();
    Ok(SimilarityScore::new(1.0 - distance))
}

//! Hand-off of finished results to a visualization consumer.
//!
//! The engine never draws anything itself. When a caller passes a
//! [`Render`] implementation, each operation hands over its maps and scores
//! after all numbers are computed; rendering cannot change them.

use crate::compare::{DiffRows, DifferenceMap, SimilarityScore};
use crate::histogram::CueHistogram;
use crate::ipd::IpdSpectrogram;

/// Borrowed `[row][frame]` grid with axis metadata.
#[derive(Debug, Clone, Copy)]
pub struct MapView<'a> {
    /// Values, `[row][frame]`; row 0 is the bottom of the plot.
    pub data: &'a [Vec<f32>],
    /// Label of the row axis.
    pub row_label: &'static str,
    /// Physical value at the bottom edge of row 0 and the top edge of the
    /// last row.
    pub row_span: (f32, f32),
    /// Seconds between frame columns.
    pub frame_secs: f32,
    /// True if values are signed and should use a diverging scale.
    pub signed: bool,
}

impl MapView<'_> {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Number of frame columns.
    pub fn frames(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
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

impl<'a> From<&'a CueHistogram> for MapView<'a> {
    fn from(hist: &'a CueHistogram) -> Self {
        MapView {
            data: &hist.data,
            row_label: hist.kind.axis_label(),
            row_span: (hist.range.lo, hist.range.hi),
            frame_secs: hist.hop_len as f32 / hist.sample_rate,
            signed: false,
        }
    }
}

impl<'a> From<&'a DifferenceMap> for MapView<'a> {
    fn from(diff: &'a DifferenceMap) -> Self {
        let (row_label, row_span) = match &diff.rows {
            DiffRows::CueBins { range } => (diff.kind.axis_label(), (range.lo, range.hi)),
            DiffRows::Bands { edges_hz } => (
                "band (Hz)",
                (
                    edges_hz.first().map_or(0.0, |b| b.0),
                    edges_hz.last().map_or(0.0, |b| b.1),
                ),
            ),
        };
        MapView {
            data: &diff.data,
            row_label,
            row_span,
            frame_secs: diff.hop_len as f32 / diff.sample_rate,
            signed: true,
        }
    }
}

impl<'a> From<&'a IpdSpectrogram> for MapView<'a> {
    fn from(spect: &'a IpdSpectrogram) -> Self {
        let first = spect.freqs.first().copied().unwrap_or(0.0);
        let last = spect.freqs.last().copied().unwrap_or(0.0);
        // Rows are bin centres; widen by half a bin to get edges.
        let half_bin = match spect.freqs.as_slice() {
            [a, b, ..] => 0.5 * (b - a),
            _ => 0.0,
        };
        MapView {
            data: &spect.data,
            row_label: "frequency (Hz)",
            row_span: (first - half_bin, last + half_bin),
            frame_secs: spect.hop_len as f32 / spect.sample_rate,
            signed: true,
        }
    }
}

/// Consumer of rendered results.
///
/// Methods are infallible: a sink that can fail (e.g. one writing files)
/// keeps its first error and reports it once the caller is done.
pub trait Render {
    /// Receive a 2-D map.
    fn render_map(&mut self, title: &str, view: &MapView<'_>);

    /// Receive a scalar score.
    fn render_score(&mut self, title: &str, score: SimilarityScore);
}

//! The analysis operations, one free function per cue and output kind.
//!
//! | Function | Output |
//! |---|---|
//! | [`itd_hist`], [`ilr_hist`] | [`CueHistogram`] `(bins, frames)` |
//! | [`itd_spect_diff`], [`ilr_spect_diff`] | histogram [`DifferenceMap`], test − reference |
//! | [`ilr_sim`] | [`SimilarityScore`] of the two ILR histograms |
//! | [`ipd_spect`] | [`IpdSpectrogram`] over a frequency range |
//!
//! Every function validates its parameters before touching any samples.
//! Operations taking a reference and a test buffer also require equal sample
//! rates, channel counts and frame counts. A renderer, when given, receives
//! the finished results and cannot alter them.

use crate::buffer::AudioBuffer;
use crate::compare::{DifferenceMap, SimilarityScore, histogram_difference, histogram_similarity};
use crate::config::AnalysisConfig;
use crate::cue::{CueKind, CueTrack};
use crate::error::{Error, Result, ensure_same};
use crate::frame::Framer;
use crate::histogram::CueHistogram;
use crate::ilr::IlrEstimator;
use crate::ipd::{IpdEstimator, IpdSpectrogram};
use crate::itd::ItdEstimator;
use crate::render::{MapView, Render};

/// Options for reference/test comparisons.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DiffOptions {
    /// Title prefix handed to the renderer.
    pub title: String,
    /// Shared analysis parameters.
    pub config: AnalysisConfig,
}

impl DiffOptions {
    /// Options with a title and default parameters.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Options for [`ipd_spect`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct IpdOptions {
    /// Lower frequency bound in Hz (default 50).
    pub start_freq: f32,
    /// Upper frequency bound in Hz (default 620).
    pub stop_freq: f32,
    /// Keep values wrapped to (-π, π] (default) or unwrap across bins.
    pub wrapped: bool,
    /// Title handed to the renderer.
    pub title: String,
    /// Framing and window parameters.
    pub config: AnalysisConfig,
}

impl Default for IpdOptions {
    fn default() -> Self {
        Self {
            start_freq: 50.0,
            stop_freq: 620.0,
            wrapped: true,
            title: String::new(),
            config: AnalysisConfig::default(),
        }
    }
}

fn label(title: &str, kind: CueKind, part: &str) -> String {
    if title.is_empty() {
        format!("{kind} {part}")
    } else {
        format!("{title} | {kind} {part}")
    }
}

/// Per-frame, per-band estimates of `kind` for one buffer.
///
/// IPD has no band track; use [`ipd_spect`].
pub fn cue_track(kind: CueKind, buffer: &AudioBuffer, config: &AnalysisConfig) -> Result<CueTrack> {
    match kind {
        CueKind::Itd => ItdEstimator::new(config, buffer.sample_rate())?.track(buffer),
        CueKind::Ilr => IlrEstimator::new(config, buffer.sample_rate())?.track(buffer),
        CueKind::Ipd => Err(Error::invalid(
            "kind",
            "IPD is estimated per bin, use ipd_spect",
        )),
    }
}

/// Histogram of `kind` with `config.bins` bins over the cue's range.
pub fn cue_hist(
    kind: CueKind,
    buffer: &AudioBuffer,
    config: &AnalysisConfig,
) -> Result<CueHistogram> {
    let track = cue_track(kind, buffer, config)?;
    CueHistogram::from_track(&track, config.bins)
}

/// ITD estimates in microseconds, `[frame][band]`.
pub fn itd_track(buffer: &AudioBuffer, config: &AnalysisConfig) -> Result<CueTrack> {
    cue_track(CueKind::Itd, buffer, config)
}

/// ILR estimates in [-1, 1], `[frame][band]`.
pub fn ilr_track(buffer: &AudioBuffer, config: &AnalysisConfig) -> Result<CueTrack> {
    cue_track(CueKind::Ilr, buffer, config)
}

/// ITD histogram: `config.bins` bins over ±`config.itd_range_us`.
///
/// # Example
///
/// ```rust
/// use binaspect_analysis::{AnalysisConfig, AudioBuffer, itd_hist};
///
/// let noise: Vec<f32> = (0..44100u32).map(|i| ((i * 7919) % 101) as f32 / 101.0 - 0.5).collect();
/// let buffer = AudioBuffer::stereo(noise.clone(), noise, 44100.0).unwrap();
/// let hist = itd_hist(&buffer, &AnalysisConfig::default()).unwrap();
/// assert_eq!(hist.shape(), (400, 43));
/// assert_eq!(hist.peak_bin(0), Some(200));
/// ```
pub fn itd_hist(buffer: &AudioBuffer, config: &AnalysisConfig) -> Result<CueHistogram> {
    cue_hist(CueKind::Itd, buffer, config)
}

/// ILR histogram: `config.bins` bins over [-1, 1].
pub fn ilr_hist(buffer: &AudioBuffer, config: &AnalysisConfig) -> Result<CueHistogram> {
    cue_hist(CueKind::Ilr, buffer, config)
}

/// Histograms of `kind` for a reference and a test buffer, checked for
/// comparability before any estimation.
fn paired_hists(
    kind: CueKind,
    reference: &AudioBuffer,
    test: &AudioBuffer,
    config: &AnalysisConfig,
) -> Result<(CueHistogram, CueHistogram)> {
    config.validate()?;
    ensure_same("sample rate", reference.sample_rate(), test.sample_rate())?;
    ensure_same("channel count", reference.num_channels(), test.num_channels())?;
    let framer = Framer::from_config(config)?;
    ensure_same(
        "frame count",
        framer.frame_count(reference.len()),
        framer.frame_count(test.len()),
    )?;

    Ok((
        cue_hist(kind, reference, config)?,
        cue_hist(kind, test, config)?,
    ))
}

/// Histogram difference map of `kind`, test − reference.
pub fn spect_diff(
    kind: CueKind,
    reference: &AudioBuffer,
    test: &AudioBuffer,
    options: &DiffOptions,
    render: Option<&mut dyn Render>,
) -> Result<DifferenceMap> {
    let (ref_hist, test_hist) = paired_hists(kind, reference, test, &options.config)?;
    let diff = histogram_difference(&ref_hist, &test_hist)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(%kind, frames = diff.num_frames(), max_abs = diff.max_abs(), "difference map");

    if let Some(render) = render {
        render.render_map(&label(&options.title, kind, "reference"), &MapView::from(&ref_hist));
        render.render_map(&label(&options.title, kind, "test"), &MapView::from(&test_hist));
        render.render_map(&label(&options.title, kind, "difference"), &MapView::from(&diff));
    }
    Ok(diff)
}

/// ITD histogram difference map, test − reference.
pub fn itd_spect_diff(
    reference: &AudioBuffer,
    test: &AudioBuffer,
    options: &DiffOptions,
    render: Option<&mut dyn Render>,
) -> Result<DifferenceMap> {
    spect_diff(CueKind::Itd, reference, test, options, render)
}

/// ILR histogram difference map, test − reference.
pub fn ilr_spect_diff(
    reference: &AudioBuffer,
    test: &AudioBuffer,
    options: &DiffOptions,
    render: Option<&mut dyn Render>,
) -> Result<DifferenceMap> {
    spect_diff(CueKind::Ilr, reference, test, options, render)
}

/// Similarity of the `kind` histograms of two buffers.
pub fn similarity(
    kind: CueKind,
    reference: &AudioBuffer,
    test: &AudioBuffer,
    options: &DiffOptions,
    render: Option<&mut dyn Render>,
) -> Result<SimilarityScore> {
    let (ref_hist, test_hist) = paired_hists(kind, reference, test, &options.config)?;
    let score = histogram_similarity(&ref_hist, &test_hist)?;

    if let Some(render) = render {
        render.render_map(&label(&options.title, kind, "reference"), &MapView::from(&ref_hist));
        render.render_map(&label(&options.title, kind, "test"), &MapView::from(&test_hist));
        render.render_score(&label(&options.title, kind, "similarity"), score);
    }
    Ok(score)
}

/// ILR similarity score in [0, 1].
pub fn ilr_sim(
    reference: &AudioBuffer,
    test: &AudioBuffer,
    options: &DiffOptions,
    render: Option<&mut dyn Render>,
) -> Result<SimilarityScore> {
    similarity(CueKind::Ilr, reference, test, options, render)
}

/// ITD similarity score in [0, 1].
pub fn itd_sim(
    reference: &AudioBuffer,
    test: &AudioBuffer,
    options: &DiffOptions,
    render: Option<&mut dyn Render>,
) -> Result<SimilarityScore> {
    similarity(CueKind::Itd, reference, test, options, render)
}

/// Phase difference over `[start_freq, stop_freq]` for every frame.
pub fn ipd_spect(
    buffer: &AudioBuffer,
    options: &IpdOptions,
    render: Option<&mut dyn Render>,
) -> Result<IpdSpectrogram> {
    let estimator = IpdEstimator::new(
        &options.config,
        buffer.sample_rate(),
        options.start_freq,
        options.stop_freq,
        options.wrapped,
    )?;
    let spect = estimator.spectrogram(buffer)?;

    if let Some(render) = render {
        let part = if options.wrapped { "wrapped" } else { "unwrapped" };
        render.render_map(&label(&options.title, CueKind::Ipd, part), &MapView::from(&spect));
    }
    Ok(spect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        maps: Vec<(String, (usize, usize))>,
        scores: Vec<(String, f32)>,
    }

    impl Render for Recorder {
        fn render_map(&mut self, title: &str, view: &MapView<'_>) {
            self.maps.push((title.to_string(), (view.rows(), view.frames())));
        }

        fn render_score(&mut self, title: &str, score: SimilarityScore) {
            self.scores.push((title.to_string(), score.value()));
        }
    }

    fn noise(n: usize, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state as i32 as f32) / (i32::MAX as f32) * 0.5
            })
            .collect()
    }

    fn stereo(n: usize, gain_right: f32) -> AudioBuffer {
        let left = noise(n, 1);
        let right = left.iter().map(|s| s * gain_right).collect();
        AudioBuffer::stereo(left, right, 44100.0).unwrap()
    }

    #[test]
    fn histograms_have_fixed_shape() {
        let buffer = stereo(44100, 1.0);
        let config = AnalysisConfig::default();
        assert_eq!(itd_hist(&buffer, &config).unwrap().shape(), (400, 43));
        assert_eq!(ilr_hist(&buffer, &config).unwrap().shape(), (400, 43));
    }

    #[test]
    fn ipd_has_no_band_track() {
        let buffer = stereo(4096, 1.0);
        assert!(cue_track(CueKind::Ipd, &buffer, &AnalysisConfig::default()).is_err());
    }

    #[test]
    fn self_comparison() {
        let buffer = stereo(20000, 0.5);
        let options = DiffOptions::titled("self");
        let diff = itd_spect_diff(&buffer, &buffer, &options, None).unwrap();
        assert!(diff.is_zero());
        assert_eq!(ilr_sim(&buffer, &buffer, &options, None).unwrap().value(), 1.0);
        assert_eq!(itd_sim(&buffer, &buffer, &options, None).unwrap().value(), 1.0);
    }

    #[test]
    fn diff_renders_three_maps() {
        let reference = stereo(20000, 1.0);
        let test = stereo(20000, 0.25);
        let mut recorder = Recorder::default();
        let diff = ilr_spect_diff(
            &reference,
            &test,
            &DiffOptions::titled("room A"),
            Some(&mut recorder),
        )
        .unwrap();

        let titles: Vec<&str> = recorder.maps.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            titles,
            ["room A | ILR reference", "room A | ILR test", "room A | ILR difference"]
        );
        assert!(recorder.maps.iter().all(|(_, shape)| *shape == diff.shape()));
        // Reference sits at ILR 0; the quieter right channel moves the test towards +1.
        assert_eq!(diff.get(200, 0), Some(-1.0));
    }

    #[test]
    fn rendering_does_not_change_results() {
        let reference = stereo(20000, 1.0);
        let test = stereo(20000, 0.7);
        let options = DiffOptions::default();
        let mut recorder = Recorder::default();
        let plain = ilr_sim(&reference, &test, &options, None).unwrap();
        let rendered = ilr_sim(&reference, &test, &options, Some(&mut recorder)).unwrap();
        assert_eq!(plain, rendered);
        assert_eq!(recorder.maps.len(), 2);
        assert_eq!(recorder.scores, vec![("ILR similarity".to_string(), plain.value())]);
    }

    #[test]
    fn comparisons_fail_fast_on_mismatch() {
        let a = stereo(20000, 1.0);
        let b = stereo(30000, 1.0);
        let options = DiffOptions::default();
        assert!(matches!(
            ilr_sim(&a, &b, &options, None),
            Err(Error::IncompatibleShape { what: "frame count", .. })
        ));

        let resampled = AudioBuffer::stereo(noise(20000, 2), noise(20000, 3), 48000.0).unwrap();
        assert!(matches!(
            itd_spect_diff(&a, &resampled, &options, None),
            Err(Error::IncompatibleShape { what: "sample rate", .. })
        ));

        let mono = AudioBuffer::mono(noise(20000, 4), 44100.0).unwrap();
        assert!(matches!(
            ilr_spect_diff(&a, &mono, &options, None),
            Err(Error::IncompatibleShape { what: "channel count", .. })
        ));
    }

    #[test]
    fn invalid_config_fails_before_work() {
        let buffer = stereo(1000, 1.0);
        let options = DiffOptions {
            config: AnalysisConfig::default().with_framing(256, 512),
            ..DiffOptions::default()
        };
        assert!(matches!(
            ilr_sim(&buffer, &buffer, &options, None),
            Err(Error::InvalidParameter { name: "hop_len", .. })
        ));
    }

    #[test]
    fn ipd_defaults_and_render() {
        let buffer = stereo(44100, 1.0);
        let mut recorder = Recorder::default();
        let spect = ipd_spect(&buffer, &IpdOptions::default(), Some(&mut recorder)).unwrap();
        // 44100 / 4096 = 10.77 Hz per bin: bins 4 ..= 58
        assert_eq!(spect.bins.start, 4);
        assert_eq!(spect.bins.stop, 58);
        assert_eq!(recorder.maps[0].0, "IPD wrapped");
        assert_eq!(recorder.maps[0].1, spect.shape());

        let options = IpdOptions {
            start_freq: 700.0,
            stop_freq: 600.0,
            ..IpdOptions::default()
        };
        assert!(ipd_spect(&buffer, &options, None).is_err());
    }
}

//! Multichannel to stereo downmix.
//!
//! The analysis engine only accepts one or two channels. Surround renders
//! are folded to a left/right pair here, before analysis. Channel order
//! follows the WAV convention: FL FR FC LFE BL BR, then SL SR for 7.1.

use crate::wav::read_audio;
use crate::{Error, Result};
use binaspect_analysis::AudioBuffer;
use std::fmt;
use std::path::Path;

/// Gain applied to the centre and surround channels (-3 dB).
const ITU_GAIN: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// How to reduce a multichannel file to the engine's left/right pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownmixRule {
    /// Accept mono or stereo unchanged; anything wider is an error.
    #[default]
    Passthrough,
    /// Keep channels 0 and 1, drop the rest.
    FirstPair,
    /// ITU-R BS.775 fold-down of 5.1 or 7.1, LFE dropped, normalized by
    /// the summed gains so a full-scale input stays in [-1, 1].
    ItuBs775,
}

impl DownmixRule {
    /// Short name used on the command line and in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::FirstPair => "first-pair",
            Self::ItuBs775 => "itu",
        }
    }
}

impl fmt::Display for DownmixRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduce channel-major audio to one or two channels.
///
/// Mono and stereo input pass through under every rule.
///
/// # Example
///
/// ```rust
/// use binaspect_io::{DownmixRule, downmix_to_stereo};
///
/// // FL FR FC LFE BL BR
/// let surround = vec![vec![1.0], vec![0.0], vec![0.0], vec![1.0], vec![0.0], vec![0.0]];
/// let stereo = downmix_to_stereo(surround, DownmixRule::ItuBs775).unwrap();
/// assert_eq!(stereo.len(), 2);
/// assert!(stereo[0][0] > 0.0);
/// assert_eq!(stereo[1][0], 0.0);
/// ```
pub fn downmix_to_stereo(mut channels: Vec<Vec<f32>>, rule: DownmixRule) -> Result<Vec<Vec<f32>>> {
    let count = channels.len();
    let unsupported = || Error::UnsupportedLayout {
        channels: count,
        rule,
    };

    match (rule, count) {
        (_, 0) => Err(unsupported()),
        (_, 1 | 2) => Ok(channels),
        (DownmixRule::Passthrough, _) => Err(unsupported()),
        (DownmixRule::FirstPair, _) => {
            channels.truncate(2);
            Ok(channels)
        }
        (DownmixRule::ItuBs775, 6 | 8) => Ok(fold_itu(&channels)),
        (DownmixRule::ItuBs775, _) => Err(unsupported()),
    }
}

/// BS.775 fold of a 6- or 8-channel layout.
fn fold_itu(channels: &[Vec<f32>]) -> Vec<Vec<f32>> {
    // Per side: front at unity, then centre and each surround pair at -3 dB.
    let (left_sources, right_sources): (&[usize], &[usize]) = if channels.len() == 8 {
        (&[0, 2, 4, 6], &[1, 2, 5, 7])
    } else {
        (&[0, 2, 4], &[1, 2, 5])
    };
    let norm = 1.0 + ITU_GAIN * (left_sources.len() - 1) as f32;

    let fold = |sources: &[usize]| -> Vec<f32> {
        let len = channels[0].len();
        (0..len)
            .map(|i| {
                let sum: f32 = sources
                    .iter()
                    .enumerate()
                    .map(|(k, &ch)| {
                        let gain = if k == 0 { 1.0 } else { ITU_GAIN };
                        gain * channels[ch][i]
                    })
                    .sum();
                sum / norm
            })
            .collect()
    };

    vec![fold(left_sources), fold(right_sources)]
}

/// Decode a WAV file and downmix it into an [`AudioBuffer`].
pub fn load_stereo<P: AsRef<Path>>(path: P, rule: DownmixRule) -> Result<AudioBuffer> {
    let (channels, spec) = read_audio(path)?;
    let source_channels = channels.len();
    let channels = downmix_to_stereo(channels, rule)?;

    tracing::debug!(
        source_channels,
        output_channels = channels.len(),
        rule = rule.name(),
        "downmixed"
    );

    Ok(AudioBuffer::new(channels, spec.sample_rate as f32)?)
}

//! Channel-major audio buffer handed to the engine.
//!
//! [`AudioBuffer`] holds one `Vec<f32>` per channel plus the sample rate.
//! The engine only accepts one or two channels: channel 0 is left, channel 1
//! is right, and a mono buffer is analysed as if both ears heard it.

use crate::error::{Error, Result};

/// Decoded audio ready for cue analysis.
///
/// # Example
///
/// ```rust
/// use binaspect_analysis::AudioBuffer;
///
/// let buffer = AudioBuffer::stereo(vec![0.5; 1024], vec![0.25; 1024], 44100.0).unwrap();
/// assert_eq!(buffer.len(), 1024);
/// assert_eq!(buffer.num_channels(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: f32,
}

impl AudioBuffer {
    /// Build a buffer from channel-major samples.
    ///
    /// Fails with [`Error::InvalidParameter`] unless there are one or two
    /// channels of equal length and the sample rate is positive and finite.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: f32) -> Result<Self> {
        if channels.is_empty() || channels.len() > 2 {
            return Err(Error::invalid(
                "channels",
                format!(
                    "expected 1 or 2 channels, got {} (downmix first)",
                    channels.len()
                ),
            ));
        }
        if channels.iter().any(|c| c.len() != channels[0].len()) {
            return Err(Error::invalid(
                "channels",
                "all channels must have the same length",
            ));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::invalid(
                "sample_rate",
                format!("must be positive and finite, got {sample_rate}"),
            ));
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Build a two-channel buffer.
    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: f32) -> Result<Self> {
        Self::new(vec![left, right], sample_rate)
    }

    /// Build a single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: f32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Left channel (channel 0).
    pub fn left(&self) -> &[f32] {
        &self.channels[0]
    }

    /// Right channel (channel 1, or channel 0 for mono input).
    pub fn right(&self) -> &[f32] {
        self.channels.get(1).unwrap_or(&self.channels[0])
    }

    /// All channels, channel-major.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Number of channels (1 or 2).
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.len() as f32 / self.sample_rate
    }

    /// Copy with left and right exchanged.
    pub fn swapped(&self) -> Self {
        let channels = if self.channels.len() == 2 {
            vec![self.channels[1].clone(), self.channels[0].clone()]
        } else {
            self.channels.clone()
        };
        Self {
            channels,
            sample_rate: self.sample_rate,
        }
    }
}

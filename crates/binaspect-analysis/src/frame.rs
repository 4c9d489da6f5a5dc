//! Overlapping, windowed analysis frames.
//!
//! A [`Framer`] slices both channels of an [`AudioBuffer`] into frames of
//! `frame_len` samples spaced `hop_len` apart and applies a window. Frames
//! are independent of each other, so [`Framer::frame_at`] can build any frame
//! directly and [`Framer::frames`] can be restarted at will.

use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::fft::Window;

/// Treatment of the final partial frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TailPolicy {
    /// Zero-pad the last frame so every sample is covered.
    #[default]
    Pad,
    /// Drop samples that do not fill a whole frame.
    Truncate,
}

/// Channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Channel 0.
    Left,
    /// Channel 1 (channel 0 for mono buffers).
    Right,
}

/// One windowed frame of both channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame index in hop units.
    pub index: usize,
    /// Offset of the first sample within the buffer.
    pub start: usize,
    /// Windowed left samples, `frame_len` long.
    pub left: Vec<f32>,
    /// Windowed right samples, `frame_len` long.
    pub right: Vec<f32>,
}

impl Frame {
    /// Samples for one channel.
    pub fn channel(&self, channel: Channel) -> &[f32] {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }
}

/// Frame slicer.
#[derive(Debug, Clone)]
pub struct Framer {
    frame_len: usize,
    hop_len: usize,
    window: Window,
    tail: TailPolicy,
    window_coeffs: Arc<[f32]>,
}

impl Framer {
    /// Create a framer.
    ///
    /// Fails with [`Error::InvalidParameter`] if either length is zero or the
    /// hop exceeds the frame length.
    pub fn new(frame_len: usize, hop_len: usize, window: Window, tail: TailPolicy) -> Result<Self> {
        if frame_len == 0 {
            return Err(Error::invalid("frame_len", "must be positive"));
        }
        if hop_len == 0 {
            return Err(Error::invalid("hop_len", "must be positive"));
        }
        if hop_len > frame_len {
            return Err(Error::invalid(
                "hop_len",
                format!("must not exceed frame_len ({frame_len}), got {hop_len}"),
            ));
        }

        Ok(Self {
            frame_len,
            hop_len,
            window,
            tail,
            window_coeffs: window.coefficients(frame_len).into(),
        })
    }

    /// Create a framer from the framing fields of a config.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::new(config.frame_len, config.hop_len, config.window, config.tail)
    }

    /// Frame length in samples.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Hop length in samples.
    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Window applied to each frame.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Tail policy.
    pub fn tail(&self) -> TailPolicy {
        self.tail
    }

    /// Number of frames produced for a buffer of `num_samples`.
    pub fn frame_count(&self, num_samples: usize) -> usize {
        match self.tail {
            TailPolicy::Pad => {
                if num_samples == 0 {
                    0
                } else {
                    1 + num_samples
                        .saturating_sub(self.frame_len)
                        .div_ceil(self.hop_len)
                }
            }
            TailPolicy::Truncate => {
                if num_samples < self.frame_len {
                    0
                } else {
                    1 + (num_samples - self.frame_len) / self.hop_len
                }
            }
        }
    }

    /// Build frame `index`, or `None` past the end.
    pub fn frame_at(&self, buffer: &AudioBuffer, index: usize) -> Option<Frame> {
        if index >= self.frame_count(buffer.len()) {
            return None;
        }
        let start = index * self.hop_len;
        Some(Frame {
            index,
            start,
            left: self.windowed(buffer.left(), start),
            right: self.windowed(buffer.right(), start),
        })
    }

    /// Lazy iterator over every frame of `buffer`, in time order.
    pub fn frames<'a>(&'a self, buffer: &'a AudioBuffer) -> Frames<'a> {
        Frames {
            framer: self,
            buffer,
            next: 0,
            count: self.frame_count(buffer.len()),
        }
    }

    /// Frame start time in seconds.
    pub fn frame_to_time(&self, index: usize, sample_rate: f32) -> f32 {
        (index * self.hop_len) as f32 / sample_rate
    }

    fn windowed(&self, samples: &[f32], start: usize) -> Vec<f32> {
        let end = (start + self.frame_len).min(samples.len());
        let mut frame = samples[start.min(end)..end].to_vec();
        frame.resize(self.frame_len, 0.0);

        for (sample, &coeff) in frame.iter_mut().zip(self.window_coeffs.iter()) {
            *sample *= coeff;
        }
        frame
    }
}

/// Iterator returned by [`Framer::frames`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    framer: &'a Framer,
    buffer: &'a AudioBuffer,
    next: usize,
    count: usize,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.count {
            return None;
        }
        let frame = self.framer.frame_at(self.buffer, self.next);
        self.next += 1;
        frame
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

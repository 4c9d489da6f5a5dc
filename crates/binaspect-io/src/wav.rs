//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file into channel-major f32 samples in [-1, 1].
///
/// Integer PCM is scaled by `2^(bits - 1)`; float files are passed through.
/// Every channel is returned; use [`downmix_to_stereo`](crate::downmix_to_stereo)
/// to reduce surround layouts. A file with no sample frames is
/// [`Error::Empty`].
///
/// # Example
/// ```ignore
/// let (channels, spec) = read_audio("binaural.wav")?;
/// println!("{} channels at {} Hz", channels.len(), spec.sample_rate);
/// ```
pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let num_channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let num_frames = interleaved.len() / num_channels;
    if num_frames == 0 {
        return Err(Error::Empty);
    }

    let mut channels = vec![Vec::with_capacity(num_frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    tracing::debug!(
        channels = num_channels,
        frames = num_frames,
        sample_rate = spec.sample_rate,
        "decoded WAV"
    );

    Ok((channels, spec))
}

/// Write channel-major samples to a WAV file.
///
/// The channel count is taken from `channels`, overriding `spec.channels`.
/// All channels must have the same length. 32-bit output is IEEE float;
/// 16/24-bit output is clamped PCM.
///
/// # Example
/// ```ignore
/// let silence = vec![vec![0.0f32; 44100]; 2];
/// write_audio("silence.wav", &silence, WavSpec::default())?;
/// ```
pub fn write_audio<P: AsRef<Path>>(path: P, channels: &[Vec<f32>], spec: WavSpec) -> Result<()> {
    let Some(first) = channels.first() else {
        return Err(Error::InvalidChannels("no channels to write".into()));
    };
    let num_frames = first.len();
    if channels.iter().any(|c| c.len() != num_frames) {
        return Err(Error::InvalidChannels(
            "all channels must have the same length".into(),
        ));
    }
    let num_channels = u16::try_from(channels.len())
        .map_err(|_| Error::InvalidChannels(format!("too many channels: {}", channels.len())))?;

    let spec = WavSpec {
        channels: num_channels,
        ..spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for i in 0..num_frames {
            for channel in channels {
                writer.write_sample(channel[i])?;
            }
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for i in 0..num_frames {
            for channel in channels {
                let int_sample = (channel[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

//! Audio input layer for binaspect.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_audio`] and [`write_audio`] for channel-major
//!   f32 samples, [`read_wav_info`] for header-only metadata
//! - **Downmix**: [`downmix_to_stereo`] folds 5.1/7.1 layouts into a
//!   left/right pair the analysis engine accepts
//! - **Loading**: [`load_stereo`] chains decode and downmix into an
//!   [`AudioBuffer`](binaspect_analysis::AudioBuffer)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binaspect_analysis::{AnalysisConfig, itd_hist};
//! use binaspect_io::{DownmixRule, load_stereo};
//!
//! let buffer = load_stereo("render_7_1.wav", DownmixRule::ItuBs775)?;
//! let hist = itd_hist(&buffer, &AnalysisConfig::default())?;
//! println!("{} frames", hist.num_frames());
//! ```

mod downmix;
mod wav;

pub use downmix::{DownmixRule, downmix_to_stereo, load_stereo};
pub use wav::{WavFormat, WavInfo, WavSpec, read_audio, read_wav_info, write_audio};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The channel count has no mapping under the requested downmix rule.
    #[error("Unsupported channel layout: {channels} channels cannot be downmixed with rule '{rule}'")]
    UnsupportedLayout {
        /// Number of channels in the input.
        channels: usize,
        /// Rule that was requested.
        rule: DownmixRule,
    },

    /// The file holds no sample frames.
    #[error("Audio file contains no samples")]
    Empty,

    /// Channels passed for writing do not agree in count or length.
    #[error("Invalid channel data: {0}")]
    InvalidChannels(String),

    /// The decoded audio was rejected by the analysis engine.
    #[error("Analysis error: {0}")]
    Analysis(#[from] binaspect_analysis::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

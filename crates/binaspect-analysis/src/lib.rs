//! Binaspect Analysis - Binaural spatial-cue estimation
//!
//! This crate turns stereo (or mono) sample buffers into interaural cue
//! estimates and compares them between recordings:
//!
//! - [`frame`] - Overlapping windowed frames
//! - [`band`] - Spectral decomposition, bin ranges, and band layouts
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`xcorr`] - Band-limited cross-correlation, peak picking
//! - [`phase`] - Phase wrapping and unwrapping
//! - [`itd`] - Interaural time difference per frame and band
//! - [`ilr`] - Interaural level ratio per frame and band
//! - [`ipd`] - Interaural phase difference per frame and bin
//! - [`histogram`] - Cue value against time occupancy maps
//! - [`compare`] - Difference maps and similarity scores
//! - [`render`] - Hand-off of results to a visualization consumer
//! - [`engine`] - The analysis operations as free functions
//!
//! ## Data Flow
//!
//! ```text
//! AudioBuffer → Framer → BandDecomposer → {ITD, ILR, IPD} → CueHistogram → Comparator
//! ```
//!
//! Every operation is a pure function of its inputs: no I/O, no state kept
//! between calls. With the `parallel` feature frames are estimated on the
//! rayon pool; output columns stay in frame order.
//!
//! ## Example
//!
//! ```rust
//! use binaspect_analysis::{AudioBuffer, DiffOptions, ilr_sim};
//!
//! let left: Vec<f32> = (0..8192).map(|i| (i as f32 * 0.37).sin()).collect();
//! let right = left.iter().map(|s| s * 0.5).collect();
//! let buffer = AudioBuffer::stereo(left, right, 44100.0).unwrap();
//!
//! let score = ilr_sim(&buffer, &buffer, &DiffOptions::default(), None).unwrap();
//! assert_eq!(score.value(), 1.0);
//! ```
//!
//! ## Conventions
//!
//! - Channel 0 is left, channel 1 is right.
//! - Positive ITD: the right channel lags (source on the left).
//! - Positive ILR: the left channel is louder.
//! - Difference maps are `test - reference`.

pub mod band;
pub mod buffer;
pub mod compare;
pub mod config;
pub mod cue;
pub mod engine;
pub mod error;
pub mod fft;
pub mod frame;
pub mod histogram;
pub mod ilr;
pub mod ipd;
pub mod itd;
pub mod phase;
pub mod render;
pub mod xcorr;

// Re-export main types
pub use band::{Band, BandDecomposer, BandLayout, BandSpectrum, BinRange};
pub use buffer::AudioBuffer;
pub use compare::{
    DiffRows, DifferenceMap, SimilarityScore, histogram_difference, histogram_similarity,
    track_difference, track_similarity,
};
pub use config::AnalysisConfig;
pub use cue::{CueKind, CueRange, CueTrack};
pub use engine::{
    DiffOptions, IpdOptions, cue_hist, cue_track, ilr_hist, ilr_sim, ilr_spect_diff, ilr_track,
    ipd_spect, itd_hist, itd_sim, itd_spect_diff, itd_track, similarity, spect_diff,
};
pub use error::{Error, Result};
pub use fft::{Fft, Window};
pub use frame::{Channel, Frame, Framer, TailPolicy};
pub use histogram::CueHistogram;
pub use ilr::IlrEstimator;
pub use ipd::{IpdEstimator, IpdSpectrogram};
pub use itd::ItdEstimator;
pub use phase::{unwrap_phase, wrap_to_pi};
pub use render::{MapView, Render};

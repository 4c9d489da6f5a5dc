//! Spectral decomposition of frames into bins and analysis bands.
//!
//! The transform size is twice the frame length: frames are zero-padded so
//! that products of two spectra correspond to linear (not circular)
//! correlations. Bin `k` sits at `k · sample_rate / fft_size` Hz.

use rustfft::num_complex::Complex;

use crate::buffer::AudioBuffer;
use crate::error::{Error, Result};
use crate::fft::{Fft, Window};
use crate::frame::{Channel, Frame, Framer};

/// Inclusive range of FFT bin indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    /// First bin.
    pub start: usize,
    /// Last bin (inclusive).
    pub stop: usize,
}

impl BinRange {
    /// Number of bins in the range.
    pub fn len(&self) -> usize {
        self.stop + 1 - self.start
    }

    /// Always false: a range holds at least one bin.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate bin indices.
    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.stop
    }
}

/// How the spectrum is split into independently estimated bands.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "kebab-case")
)]
pub enum BandLayout {
    /// One band from the first non-DC bin to Nyquist.
    #[default]
    Broadband,
    /// Contiguous octaves `[f, 2f)` from `low_hz` up to `high_hz`.
    Octave {
        /// Lower edge of the first octave in Hz.
        low_hz: f32,
        /// Upper edge of the last octave in Hz.
        high_hz: f32,
    },
}

impl BandLayout {
    /// Octave bands over 125 Hz – 16 kHz.
    pub fn octaves() -> Self {
        BandLayout::Octave {
            low_hz: 125.0,
            high_hz: 16000.0,
        }
    }

    /// Check the layout independently of sample rate.
    pub fn validate(&self) -> Result<()> {
        match *self {
            BandLayout::Broadband => Ok(()),
            BandLayout::Octave { low_hz, high_hz } => {
                if !(low_hz.is_finite() && low_hz > 0.0) {
                    return Err(Error::invalid(
                        "bands",
                        format!("octave low_hz must be positive, got {low_hz}"),
                    ));
                }
                if !(high_hz.is_finite() && high_hz > low_hz) {
                    return Err(Error::invalid(
                        "bands",
                        format!("octave high_hz ({high_hz}) must exceed low_hz ({low_hz})"),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// One analysis band resolved against a transform size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower edge in Hz.
    pub low_hz: f32,
    /// Upper edge in Hz.
    pub high_hz: f32,
    /// Bins belonging to the band.
    pub bins: BinRange,
}

/// Complex spectrum of one channel of one frame, DC to Nyquist.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSpectrum {
    /// Complex bin values.
    pub bins: Vec<Complex<f32>>,
    /// Bin spacing in Hz.
    pub bin_hz: f32,
}

impl BandSpectrum {
    /// Sum of squared magnitudes over `range`.
    pub fn energy(&self, range: BinRange) -> f32 {
        self.bins[range.start..=range.stop]
            .iter()
            .map(|c| c.norm_sqr())
            .sum()
    }
}

/// Turns frames into per-channel spectra.
#[derive(Debug, Clone)]
pub struct BandDecomposer {
    fft: Fft,
    window: Window,
    sample_rate: f32,
}

impl BandDecomposer {
    /// Create a decomposer matching `framer`'s frame length and window.
    pub fn new(framer: &Framer, sample_rate: f32) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::invalid(
                "sample_rate",
                format!("must be positive and finite, got {sample_rate}"),
            ));
        }
        Ok(Self {
            fft: Fft::new(framer.frame_len() * 2),
            window: framer.window(),
            sample_rate,
        })
    }

    /// Transform size in samples.
    pub fn fft_size(&self) -> usize {
        self.fft.size()
    }

    /// Number of bins from DC to Nyquist.
    pub fn num_bins(&self) -> usize {
        self.fft.num_bins()
    }

    /// Bin spacing in Hz.
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate / self.fft.size() as f32
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Window the frames were built with.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Centre frequency of bin `k` in Hz.
    pub fn bin_to_freq(&self, k: usize) -> f32 {
        k as f32 * self.bin_hz()
    }

    /// Spectrum of one channel of an already windowed frame.
    pub fn spectrum(&self, frame: &Frame, channel: Channel) -> BandSpectrum {
        BandSpectrum {
            bins: self.fft.forward(frame.channel(channel)),
            bin_hz: self.bin_hz(),
        }
    }

    /// Smallest bin range enclosing `[start_freq, stop_freq]`.
    pub fn bin_range(&self, start_freq: f32, stop_freq: f32) -> Result<BinRange> {
        if !(start_freq.is_finite() && stop_freq.is_finite()) {
            return Err(Error::invalid("start_freq", "frequencies must be finite"));
        }
        if start_freq < 0.0 {
            return Err(Error::invalid(
                "start_freq",
                format!("must not be negative, got {start_freq}"),
            ));
        }
        if start_freq >= stop_freq {
            return Err(Error::invalid(
                "start_freq",
                format!("must be below stop_freq ({stop_freq}), got {start_freq}"),
            ));
        }
        if stop_freq > self.nyquist() {
            return Err(Error::invalid(
                "stop_freq",
                format!("exceeds Nyquist ({} Hz), got {stop_freq}", self.nyquist()),
            ));
        }

        let last = self.num_bins() - 1;
        let start = ((start_freq / self.bin_hz()).floor() as usize).min(last);
        let stop = ((stop_freq / self.bin_hz()).ceil() as usize).min(last);
        Ok(BinRange { start, stop })
    }

    /// Resolve a band layout into bin ranges.
    ///
    /// Octave bands are half-open `[low, high)` except the band reaching
    /// Nyquist, which keeps the Nyquist bin. Bands without bins are dropped.
    pub fn bands(&self, layout: &BandLayout) -> Result<Vec<Band>> {
        layout.validate()?;
        let last = self.num_bins() - 1;

        let bands = match *layout {
            BandLayout::Broadband => vec![Band {
                low_hz: self.bin_hz(),
                high_hz: self.nyquist(),
                bins: BinRange {
                    start: 1.min(last),
                    stop: last,
                },
            }],
            BandLayout::Octave { low_hz, high_hz } => {
                let mut bands = Vec::new();
                let mut low = low_hz;
                while low < high_hz && low < self.nyquist() {
                    let high = (low * 2.0).min(high_hz).min(self.nyquist());
                    let start = (low / self.bin_hz()).ceil() as usize;
                    let stop = if high >= self.nyquist() {
                        last
                    } else {
                        ((high / self.bin_hz()).ceil() as usize).saturating_sub(1)
                    };
                    if start <= stop && start <= last {
                        bands.push(Band {
                            low_hz: low,
                            high_hz: high,
                            bins: BinRange { start, stop },
                        });
                    }
                    low *= 2.0;
                }
                bands
            }
        };

        if bands.is_empty() {
            return Err(Error::invalid(
                "bands",
                format!("{layout:?} resolves to no bins at {} Hz", self.sample_rate),
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bands = bands.len(), fft_size = self.fft_size(), "resolved band layout");

        Ok(bands)
    }

    /// Apply `f` to the left and right spectra of every frame.
    ///
    /// Results come back in frame order. With the `parallel` feature frames
    /// are processed on the rayon pool.
    pub fn map_frames<T, F>(&self, framer: &Framer, buffer: &AudioBuffer, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&BandSpectrum, &BandSpectrum) -> T + Sync + Send,
    {
        let per_frame = |frame: Frame| {
            let left = self.spectrum(&frame, Channel::Left);
            let right = self.spectrum(&frame, Channel::Right);
            f(&left, &right)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            (0..framer.frame_count(buffer.len()))
                .into_par_iter()
                .filter_map(|i| framer.frame_at(buffer, i))
                .map(per_frame)
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            framer.frames(buffer).map(per_frame).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::TailPolicy;
    use std::f32::consts::PI;

    fn decomposer(frame_len: usize, sample_rate: f32) -> (Framer, BandDecomposer) {
        let framer = Framer::new(frame_len, frame_len / 2, Window::Hann, TailPolicy::Pad).unwrap();
        let decomposer = BandDecomposer::new(&framer, sample_rate).unwrap();
        (framer, decomposer)
    }

    #[test]
    fn transform_is_twice_frame_len() {
        let (_, d) = decomposer(1024, 48000.0);
        assert_eq!(d.fft_size(), 2048);
        assert_eq!(d.num_bins(), 1025);
        assert!((d.bin_hz() - 23.4375).abs() < 1e-4);
        assert!((d.bin_to_freq(1024) - 24000.0).abs() < 1e-2);
    }

    #[test]
    fn bin_range_encloses_request() {
        let (_, d) = decomposer(1024, 48000.0);
        // 23.4375 Hz per bin: 50 Hz -> floor 2.13 = 2, 620 Hz -> ceil 26.45 = 27
        let range = d.bin_range(50.0, 620.0).unwrap();
        assert_eq!(range, BinRange { start: 2, stop: 27 });
        assert_eq!(range.len(), 26);
        assert!(d.bin_to_freq(range.start) <= 50.0);
        assert!(d.bin_to_freq(range.stop) >= 620.0);
    }

    #[test]
    fn bin_range_rejects_bad_requests() {
        let (_, d) = decomposer(1024, 48000.0);
        assert!(d.bin_range(620.0, 50.0).is_err());
        assert!(d.bin_range(100.0, 100.0).is_err());
        assert!(d.bin_range(-1.0, 100.0).is_err());
        assert!(matches!(
            d.bin_range(100.0, 30000.0),
            Err(Error::InvalidParameter { name: "stop_freq", .. })
        ));
        assert!(d.bin_range(0.0, 24000.0).is_ok());
    }

    #[test]
    fn broadband_covers_all_non_dc_bins() {
        let (_, d) = decomposer(512, 44100.0);
        let bands = d.bands(&BandLayout::Broadband).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].bins, BinRange { start: 1, stop: 512 });
    }

    #[test]
    fn octave_bands_are_contiguous() {
        let (_, d) = decomposer(2048, 44100.0);
        let bands = d.bands(&BandLayout::octaves()).unwrap();
        assert_eq!(bands.len(), 7);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].bins.stop + 1, pair[1].bins.start);
            assert_eq!(pair[0].high_hz, pair[1].low_hz);
        }
        assert_eq!(bands[6].high_hz, 16000.0);
    }

    #[test]
    fn octave_bands_clip_at_nyquist() {
        let (_, d) = decomposer(256, 8000.0);
        let bands = d.bands(&BandLayout::octaves()).unwrap();
        let last = bands.last().unwrap();
        assert_eq!(last.high_hz, 4000.0);
        assert_eq!(last.bins.stop, d.num_bins() - 1);
    }

    #[test]
    fn octave_layout_validation() {
        let (_, d) = decomposer(256, 8000.0);
        let inverted = BandLayout::Octave {
            low_hz: 1000.0,
            high_hz: 500.0,
        };
        assert!(d.bands(&inverted).is_err());
        let above_nyquist = BandLayout::Octave {
            low_hz: 5000.0,
            high_hz: 10000.0,
        };
        assert!(d.bands(&above_nyquist).is_err());
    }

    #[test]
    fn band_energy_tracks_tone() {
        let sr = 48000.0;
        let (framer, d) = decomposer(1024, sr);
        let tone: Vec<f32> = (0..1024)
            .map(|i| (2.0 * PI * 1000.0 * i as f32 / sr).sin())
            .collect();
        let buffer = AudioBuffer::mono(tone, sr).unwrap();
        let frame = framer.frame_at(&buffer, 0).unwrap();
        let spectrum = d.spectrum(&frame, Channel::Left);

        let around = d.bin_range(900.0, 1100.0).unwrap();
        let elsewhere = d.bin_range(3000.0, 6000.0).unwrap();
        assert!(spectrum.energy(around) > 1000.0 * spectrum.energy(elsewhere));
    }

    #[test]
    fn map_frames_preserves_order() {
        let sr = 8000.0;
        let (framer, d) = decomposer(64, sr);
        let buffer = AudioBuffer::mono((0..1000).map(|i| (i as f32 * 0.01).sin()).collect(), sr)
            .unwrap();
        let energies = d.map_frames(&framer, &buffer, |l, _| l.energy(BinRange { start: 0, stop: 64 }));
        let expected: Vec<f32> = framer
            .frames(&buffer)
            .map(|f| d.spectrum(&f, Channel::Left).energy(BinRange { start: 0, stop: 64 }))
            .collect();
        assert_eq!(energies, expected);
    }
}

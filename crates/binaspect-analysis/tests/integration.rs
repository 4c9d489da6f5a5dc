//! Integration tests for binaspect-analysis.
//!
//! Tests exercise the public engine operations with synthetic binaural
//! signals whose cues are known: identical channels, pure delays, gain
//! offsets, and channel swaps.

use std::f32::consts::PI;

use binaspect_analysis::{
    AnalysisConfig, AudioBuffer, BandLayout, CueKind, DiffOptions, Error, IpdOptions, TailPolicy,
    Window, ilr_hist, ilr_sim, ilr_spect_diff, ilr_track, ipd_spect, itd_hist, itd_spect_diff,
    itd_track, wrap_to_pi,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reproducible white noise in [-amplitude, amplitude].
fn noise(num_samples: usize, seed: u32, amplitude: f32) -> Vec<f32> {
    let mut state = seed;
    (0..num_samples)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            amplitude * (state as i32 as f32) / (i32::MAX as f32)
        })
        .collect()
}

/// Generate a sine wave at a given frequency and amplitude.
fn sine(freq_hz: f32, sample_rate: f32, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / sample_rate).sin())
        .collect()
}

/// Stereo buffer whose right channel is the left delayed by `delay` samples.
fn delayed(left: Vec<f32>, delay: usize, sample_rate: f32) -> AudioBuffer {
    let n = left.len();
    let mut right = vec![0.0; n];
    right[delay..].copy_from_slice(&left[..n - delay]);
    AudioBuffer::stereo(left, right, sample_rate).unwrap()
}

/// Frames whose samples all come from the buffer (no tail padding).
fn full_frames(num_samples: usize, config: &AnalysisConfig) -> usize {
    if num_samples < config.frame_len {
        0
    } else {
        1 + (num_samples - config.frame_len) / config.hop_len
    }
}

// ===========================================================================
// 1. Identical channels
// ===========================================================================

#[test]
fn identical_channels_concentrate_at_zero() {
    let sample_rate = 44100.0;
    let signal: Vec<f32> = noise(44100, 17, 0.3)
        .iter()
        .zip(sine(440.0, sample_rate, 44100, 0.3))
        .map(|(n, s)| n + s)
        .collect();
    let buffer = AudioBuffer::stereo(signal.clone(), signal, sample_rate).unwrap();
    let config = AnalysisConfig::default();

    let itd = itd_hist(&buffer, &config).unwrap();
    let ilr = ilr_hist(&buffer, &config).unwrap();
    assert_eq!(itd.shape(), (400, 43));
    assert_eq!(ilr.shape(), (400, 43));
    assert_eq!(itd.bin_of(0.0), 200);
    assert_eq!(ilr.bin_of(0.0), 200);

    for frame in 0..itd.num_frames() {
        let itd_column = itd.column(frame);
        let ilr_column = ilr.column(frame);
        assert_eq!(itd_column[200], itd_column.iter().sum::<f32>(), "ITD frame {frame}");
        assert_eq!(ilr_column[200], ilr_column.iter().sum::<f32>(), "ILR frame {frame}");
    }
}

#[test]
fn mono_buffer_is_centred() {
    let buffer = AudioBuffer::mono(noise(20000, 5, 0.5), 44100.0).unwrap();
    let config = AnalysisConfig::default();
    assert!(itd_track(&buffer, &config).unwrap().iter().all(|v| v == 0.0));
    assert!(ilr_track(&buffer, &config).unwrap().iter().all(|v| v == 0.0));
}

// ===========================================================================
// 2. Pure delays
// ===========================================================================

#[test]
fn delay_of_500_us_at_48k() {
    let sample_rate = 48000.0;
    let n = 48000;
    let buffer = delayed(noise(n, 3, 0.5), 24, sample_rate);
    let config = AnalysisConfig::default();

    let track = itd_track(&buffer, &config).unwrap();
    let hist = itd_hist(&buffer, &config).unwrap();
    let target = hist.bin_of(500.0);
    assert_eq!(target, 325);

    for frame in 0..full_frames(n, &config) {
        let itd = track.values[frame][0];
        assert!((itd - 500.0).abs() <= hist.bin_width(), "frame {frame}: {itd} us");
        let peak = hist.peak_bin(frame).unwrap();
        assert!(peak.abs_diff(target) <= 1, "frame {frame}: peak bin {peak}");
    }
}

#[test]
fn delay_of_22_samples_at_44k1() {
    // 22 / 44100 s = 498.87 us
    let sample_rate = 44100.0;
    let n = 44100;
    let buffer = delayed(noise(n, 11, 0.5), 22, sample_rate);
    let config = AnalysisConfig::default();
    let expected = 22.0 / sample_rate * 1e6;

    let track = itd_track(&buffer, &config).unwrap();
    for frame in 0..full_frames(n, &config) {
        let itd = track.values[frame][0];
        assert!((itd - expected).abs() < 4.0, "frame {frame}: {itd} us");
    }
}

#[test]
fn fractional_delay_of_500_us_at_44k1() {
    // 500 us is 22.05 samples here; only the peak refinement gets it right.
    let sample_rate = 44100.0;
    let n = 44100;
    let delay = 500e-6;

    // Sum of sines from 60 Hz to 15 kHz, evaluated at t and t - delay.
    let mut state = 0x2545_F491u32;
    let partials: Vec<(f64, f64)> = (0..300u32)
        .map(|k| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let phase = f64::from(state) / f64::from(u32::MAX) * std::f64::consts::TAU;
            (60.0 + 50.0 * f64::from(k), phase)
        })
        .collect();
    let render = |offset: f64| -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f64 / f64::from(sample_rate) - offset;
                let sum: f64 = partials
                    .iter()
                    .map(|&(freq, phase)| (std::f64::consts::TAU * freq * t + phase).sin())
                    .sum();
                (sum / 60.0) as f32
            })
            .collect()
    };
    let buffer = AudioBuffer::stereo(render(0.0), render(delay), sample_rate).unwrap();
    let config = AnalysisConfig::default();
    assert!(config.refine_peak);

    let track = itd_track(&buffer, &config).unwrap();
    let hist = itd_hist(&buffer, &config).unwrap();
    let target = hist.bin_of(500.0);

    for frame in 0..full_frames(n, &config) {
        let itd = track.values[frame][0];
        assert!((itd - 500.0).abs() < hist.bin_width(), "frame {frame}: {itd} us");
        let peak = hist.peak_bin(frame).unwrap();
        assert!(peak.abs_diff(target) <= 1, "frame {frame}: peak bin {peak}");
    }
}

#[test]
fn left_channel_lagging_gives_negative_itd() {
    let sample_rate = 48000.0;
    let buffer = delayed(noise(16384, 8, 0.5), 10, sample_rate).swapped();
    let config = AnalysisConfig::default();
    let track = itd_track(&buffer, &config).unwrap();
    let expected = -10.0 / sample_rate * 1e6;
    for frame in 0..full_frames(16384, &config) {
        assert!((track.values[frame][0] - expected).abs() < 4.0);
    }
}

#[test]
fn swapping_channels_negates_every_itd() {
    let buffer = delayed(noise(30000, 21, 0.5), 7, 44100.0);
    let config = AnalysisConfig::default().with_bands(BandLayout::octaves());
    let forward = itd_track(&buffer, &config).unwrap();
    let backward = itd_track(&buffer.swapped(), &config).unwrap();

    assert_eq!(forward.num_frames(), backward.num_frames());
    for (a, b) in forward.iter().zip(backward.iter()) {
        assert_eq!(a, -b);
    }
}

// ===========================================================================
// 3. Levels
// ===========================================================================

#[test]
fn ilr_stays_bounded_and_follows_gain() {
    let left = noise(20000, 31, 0.5);
    let right: Vec<f32> = left.iter().map(|s| s * 0.1).collect();
    let buffer = AudioBuffer::stereo(left, right, 44100.0).unwrap();
    let config = AnalysisConfig::default().with_bands(BandLayout::octaves());

    let track = ilr_track(&buffer, &config).unwrap();
    // 20 dB -> energy ratio 100 -> 99 / 101
    for value in track.iter() {
        assert!((-1.0..=1.0).contains(&value));
        assert!((value - 99.0 / 101.0).abs() < 1e-4, "{value}");
    }
}

#[test]
fn ilr_diff_points_towards_louder_side() {
    let sample_rate = 44100.0;
    let source = noise(30000, 41, 0.5);
    let reference = AudioBuffer::stereo(source.clone(), source.clone(), sample_rate).unwrap();
    let quiet_left: Vec<f32> = source.iter().map(|s| s * 0.5).collect();
    let test = AudioBuffer::stereo(quiet_left, source, sample_rate).unwrap();

    let diff = ilr_spect_diff(&reference, &test, &DiffOptions::default(), None).unwrap();
    assert_eq!(diff.kind, CueKind::Ilr);
    // Energy ratio 1:4 -> ILR -0.6, on the edge between bins 79 and 80
    for frame in 0..diff.num_frames() {
        assert_eq!(diff.get(200, frame), Some(-1.0));
        let moved_to = (0..diff.num_rows())
            .find(|&row| diff.get(row, frame) == Some(1.0))
            .unwrap();
        assert!((79..=80).contains(&moved_to), "frame {frame}: row {moved_to}");
    }
}

// ===========================================================================
// 4. Comparison
// ===========================================================================

#[test]
fn self_similarity_is_exactly_one() {
    let buffer = delayed(noise(44100, 2, 0.5), 12, 44100.0);
    let options = DiffOptions::default();
    assert_eq!(ilr_sim(&buffer, &buffer, &options, None).unwrap().value(), 1.0);
    assert!(itd_spect_diff(&buffer, &buffer, &options, None).unwrap().is_zero());
}

#[test]
fn similarity_is_symmetric_and_bounded() {
    let sample_rate = 44100.0;
    let a = AudioBuffer::stereo(noise(20000, 1, 0.5), noise(20000, 2, 0.5), sample_rate).unwrap();
    let b = delayed(noise(20000, 3, 0.5), 0, sample_rate);
    let options = DiffOptions::default();

    let ab = ilr_sim(&a, &b, &options, None).unwrap();
    let ba = ilr_sim(&b, &a, &options, None).unwrap();
    assert_eq!(ab, ba);
    assert!((0.0..=1.0).contains(&ab.value()));
    assert!(ab.value() < 1.0);
}

#[test]
fn mismatched_lengths_are_incompatible() {
    let a = delayed(noise(20000, 1, 0.5), 3, 44100.0);
    let b = delayed(noise(40000, 1, 0.5), 3, 44100.0);
    let options = DiffOptions::default();
    assert!(matches!(
        itd_spect_diff(&a, &b, &options, None),
        Err(Error::IncompatibleShape { what: "frame count", .. })
    ));
    assert!(matches!(
        ilr_sim(&a, &b, &options, None),
        Err(Error::IncompatibleShape { .. })
    ));
}

// ===========================================================================
// 5. Shape and determinism
// ===========================================================================

#[test]
fn histogram_shape_follows_framing() {
    let buffer = delayed(noise(10000, 9, 0.5), 2, 16000.0);
    for &(frame_len, hop_len) in &[(256, 64), (512, 512), (1024, 300), (2048, 1024)] {
        for tail in [TailPolicy::Pad, TailPolicy::Truncate] {
            let config = AnalysisConfig {
                frame_len,
                hop_len,
                tail,
                ..AnalysisConfig::default()
            };
            let expected = match tail {
                TailPolicy::Pad => 1 + (10000 - frame_len).div_ceil(hop_len),
                TailPolicy::Truncate => 1 + (10000 - frame_len) / hop_len,
            };
            assert_eq!(itd_hist(&buffer, &config).unwrap().shape(), (400, expected));
            assert_eq!(ilr_hist(&buffer, &config).unwrap().shape(), (400, expected));
        }
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let buffer = delayed(noise(30000, 77, 0.5), 5, 44100.0);
    let config = AnalysisConfig {
        window: Window::Blackman,
        ..AnalysisConfig::default()
    };
    assert_eq!(itd_track(&buffer, &config).unwrap(), itd_track(&buffer, &config).unwrap());
    assert_eq!(ilr_hist(&buffer, &config).unwrap(), ilr_hist(&buffer, &config).unwrap());
    let options = IpdOptions::default();
    assert_eq!(
        ipd_spect(&buffer, &options, None).unwrap(),
        ipd_spect(&buffer, &options, None).unwrap()
    );
}

// ===========================================================================
// 6. Phase
// ===========================================================================

#[test]
fn ipd_unwrapped_is_congruent_to_wrapped() {
    let buffer = delayed(noise(20000, 13, 0.5), 6, 16000.0);
    let wrapped = ipd_spect(
        &buffer,
        &IpdOptions {
            start_freq: 100.0,
            stop_freq: 4000.0,
            ..IpdOptions::default()
        },
        None,
    )
    .unwrap();
    let unwrapped = ipd_spect(
        &buffer,
        &IpdOptions {
            start_freq: 100.0,
            stop_freq: 4000.0,
            wrapped: false,
            ..IpdOptions::default()
        },
        None,
    )
    .unwrap();

    assert_eq!(wrapped.shape(), unwrapped.shape());
    for (w, u) in wrapped.data.iter().flatten().zip(unwrapped.data.iter().flatten()) {
        assert!(*w > -PI && *w <= PI);
        assert!(wrap_to_pi(u - w).abs() < 1e-3, "{u} vs {w}");
    }
}

#[test]
fn ipd_rejects_inverted_or_out_of_band_ranges() {
    let buffer = delayed(noise(4096, 1, 0.5), 0, 8000.0);
    let inverted = IpdOptions {
        start_freq: 620.0,
        stop_freq: 50.0,
        ..IpdOptions::default()
    };
    assert!(matches!(
        ipd_spect(&buffer, &inverted, None),
        Err(Error::InvalidParameter { .. })
    ));
    let beyond = IpdOptions {
        stop_freq: 5000.0,
        ..IpdOptions::default()
    };
    assert!(matches!(
        ipd_spect(&buffer, &beyond, None),
        Err(Error::InvalidParameter { name: "stop_freq", .. })
    ));
}

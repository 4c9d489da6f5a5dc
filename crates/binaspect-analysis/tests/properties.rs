//! Property-based tests for binaspect-analysis.
//!
//! Verifies channel-swap symmetry, value bounds, output shapes, phase wrap
//! consistency, and similarity symmetry using proptest for randomized input.

use proptest::prelude::*;

use binaspect_analysis::{
    AnalysisConfig, AudioBuffer, CueHistogram, CueKind, CueRange, CueTrack, DiffOptions,
    IpdOptions, histogram_similarity, ilr_sim, ilr_track, ipd_spect, itd_hist, itd_track,
    track_similarity, wrap_to_pi,
};

const SAMPLE_RATE: f32 = 16000.0;

fn small_config() -> AnalysisConfig {
    AnalysisConfig::default().with_framing(256, 128)
}

fn stereo(left: Vec<f32>, right: Vec<f32>) -> AudioBuffer {
    AudioBuffer::stereo(left, right, SAMPLE_RATE).unwrap()
}

fn ilr_track_of(values: Vec<Vec<f32>>) -> CueTrack {
    CueTrack {
        kind: CueKind::Ilr,
        range: CueRange::ilr(),
        bands_hz: vec![(0.0, 8000.0); values.first().map_or(1, Vec::len)],
        values,
        hop_len: 128,
        sample_rate: SAMPLE_RATE,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Swapping channels negates every ITD estimate.
    #[test]
    fn itd_swap_symmetry(
        signal in prop::collection::vec(-1.0f32..=1.0f32, 600..1500),
        delay in 0usize..12,
        gain in 0.1f32..=1.0f32,
    ) {
        let n = signal.len();
        let mut right = vec![0.0; n];
        for i in delay..n {
            right[i] = signal[i - delay] * gain;
        }
        let buffer = stereo(signal, right);
        let config = small_config();

        let forward = itd_track(&buffer, &config).unwrap();
        let backward = itd_track(&buffer.swapped(), &config).unwrap();
        for (a, b) in forward.iter().zip(backward.iter()) {
            prop_assert_eq!(a, -b);
        }
    }

    /// ITD estimates never leave the configured range.
    #[test]
    fn itd_within_range(
        left in prop::collection::vec(-1.0f32..=1.0f32, 300..1000),
        seed in any::<u32>(),
    ) {
        let mut state = seed;
        let right: Vec<f32> = left
            .iter()
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state as i32 as f32) / (i32::MAX as f32)
            })
            .collect();
        let track = itd_track(&stereo(left, right), &small_config()).unwrap();
        prop_assert!(track.iter().all(|v| (-800.0..=800.0).contains(&v)));
    }

    /// ILR lies in [-1, 1]; equal channels give exactly 0.
    #[test]
    fn ilr_bounds(
        left in prop::collection::vec(-1.0f32..=1.0f32, 256..1000),
        gain in 0.0f32..=4.0f32,
    ) {
        let right: Vec<f32> = left.iter().map(|s| s * gain).collect();
        let config = small_config();

        let track = ilr_track(&stereo(left.clone(), right), &config).unwrap();
        prop_assert!(track.iter().all(|v| (-1.0..=1.0).contains(&v)));

        let equal = ilr_track(&stereo(left.clone(), left), &config).unwrap();
        prop_assert!(equal.iter().all(|v| v == 0.0));
    }

    /// Histogram shape is (bins, frame count) for every valid framing.
    #[test]
    fn histogram_shape(
        num_samples in 1usize..3000,
        frame_len in 16usize..512,
        hop_divisor in 1usize..8,
        bins in 1usize..500,
    ) {
        let hop_len = (frame_len / hop_divisor).max(1);
        let config = AnalysisConfig {
            bins,
            ..AnalysisConfig::default().with_framing(frame_len, hop_len)
        };
        let buffer = stereo(vec![0.1; num_samples], vec![0.2; num_samples]);
        let hist = itd_hist(&buffer, &config).unwrap();
        let frames = 1 + num_samples.saturating_sub(frame_len).div_ceil(hop_len);
        prop_assert_eq!(hist.shape(), (bins, frames));
    }

    /// Unwrapped IPD is congruent to wrapped IPD modulo 2π.
    #[test]
    fn ipd_wrap_consistency(
        left in prop::collection::vec(-1.0f32..=1.0f32, 256..800),
        right in prop::collection::vec(-1.0f32..=1.0f32, 256..800),
    ) {
        let n = left.len().min(right.len());
        let buffer = stereo(left[..n].to_vec(), right[..n].to_vec());
        let mut options = IpdOptions {
            start_freq: 100.0,
            stop_freq: 3000.0,
            config: small_config(),
            ..IpdOptions::default()
        };
        let wrapped = ipd_spect(&buffer, &options, None).unwrap();
        options.wrapped = false;
        let unwrapped = ipd_spect(&buffer, &options, None).unwrap();

        for (w, u) in wrapped.data.iter().flatten().zip(unwrapped.data.iter().flatten()) {
            prop_assert!(wrap_to_pi(u - w).abs() < 1e-3);
        }
    }

    /// Similarity scores are symmetric and bounded; self-similarity is 1.
    #[test]
    fn similarity_symmetry(
        a in prop::collection::vec(prop::collection::vec(-1.0f32..=1.0f32, 3), 1..20),
        b_seed in prop::collection::vec(-1.0f32..=1.0f32, 60),
    ) {
        let frames = a.len();
        let b: Vec<Vec<f32>> = (0..frames).map(|i| b_seed[i * 3..i * 3 + 3].to_vec()).collect();
        let (ta, tb) = (ilr_track_of(a), ilr_track_of(b));

        let s_ab = track_similarity(&ta, &tb).unwrap();
        prop_assert_eq!(s_ab, track_similarity(&tb, &ta).unwrap());
        prop_assert!((0.0..=1.0).contains(&s_ab.value()));
        prop_assert_eq!(track_similarity(&ta, &ta).unwrap().value(), 1.0);

        let (ha, hb) = (
            CueHistogram::from_track(&ta, 40).unwrap(),
            CueHistogram::from_track(&tb, 40).unwrap(),
        );
        let h_ab = histogram_similarity(&ha, &hb).unwrap();
        prop_assert_eq!(h_ab, histogram_similarity(&hb, &ha).unwrap());
        prop_assert!((0.0..=1.0).contains(&h_ab.value()));
        prop_assert_eq!(histogram_similarity(&ha, &ha).unwrap().value(), 1.0);
    }

    /// Comparing any buffer with itself scores exactly 1.
    #[test]
    fn ilr_self_similarity(
        left in prop::collection::vec(-1.0f32..=1.0f32, 256..1000),
        gain in 0.0f32..=2.0f32,
    ) {
        let right: Vec<f32> = left.iter().map(|s| s * gain).collect();
        let buffer = stereo(left, right);
        let options = DiffOptions {
            config: small_config(),
            ..DiffOptions::default()
        };
        prop_assert_eq!(ilr_sim(&buffer, &buffer, &options, None).unwrap().value(), 1.0);
    }
}

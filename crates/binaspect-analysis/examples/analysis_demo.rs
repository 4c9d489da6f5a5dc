//! Analysis demo: ITD, ILR and IPD of a synthetic binaural source.
//!
//! Run with: cargo run -p binaspect-analysis --example analysis_demo

use binaspect_analysis::{
    AnalysisConfig, AudioBuffer, BandLayout, DiffOptions, IpdOptions, ilr_sim, ilr_track,
    ipd_spect, itd_hist, itd_track,
};

fn main() {
    let sample_rate = 48000.0;
    let num_samples = 48000;

    // --- A noise source 500 us closer to the left ear, 6 dB louder there ---
    let mut state = 0x2545_F491u32;
    let left: Vec<f32> = (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            0.5 * (state as i32 as f32) / (i32::MAX as f32)
        })
        .collect();
    let delay = 24;
    let mut right = vec![0.0; num_samples];
    for i in delay..num_samples {
        right[i] = 0.5 * left[i - delay];
    }
    let source = AudioBuffer::stereo(left.clone(), right, sample_rate).unwrap();

    println!("=== Interaural Time Difference ===\n");

    let config = AnalysisConfig::default();
    let itd = itd_track(&source, &config).unwrap();
    for (frame, values) in itd.values.iter().enumerate().take(5) {
        println!(
            "  frame {frame:2} ({:.3} s): {:7.1} us",
            itd.frame_to_time(frame),
            values[0]
        );
    }

    let hist = itd_hist(&source, &config).unwrap();
    let (bins, frames) = hist.shape();
    println!("\n  histogram: {bins} bins x {frames} frames");
    if let Some(bin) = hist.peak_bin(0) {
        println!("  frame 0 peak bin {bin} -> {:.1} us", hist.bin_center(bin));
    }

    println!("\n=== Interaural Level Ratio per Octave ===\n");

    let octaves = AnalysisConfig::default().with_bands(BandLayout::octaves());
    let ilr = ilr_track(&source, &octaves).unwrap();
    for (band, &(low, high)) in ilr.bands_hz.iter().enumerate() {
        println!(
            "  {low:7.0} - {high:7.0} Hz: ILR {:+.3}",
            ilr.values[5][band]
        );
    }

    println!("\n=== Interaural Phase Difference 50-620 Hz ===\n");

    let ipd = ipd_spect(&source, &IpdOptions::default(), None).unwrap();
    for (row, freq) in ipd.freqs.iter().enumerate().step_by(5) {
        println!("  {freq:6.1} Hz: {:+.3} rad", ipd.data[row][5]);
    }

    println!("\n=== Similarity to a centred source ===\n");

    let centred = AudioBuffer::stereo(left.clone(), left, sample_rate).unwrap();
    let score = ilr_sim(&centred, &source, &DiffOptions::default(), None).unwrap();
    println!("  ILR similarity: {score}");
}

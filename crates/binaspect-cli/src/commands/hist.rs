//! Cue histograms of a single file.

use super::common::{CommonArgs, describe, finish_plots, load_input, write_json};
use binaspect_analysis::{AnalysisConfig, CueHistogram, CueKind, MapView, Render, cue_hist};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct HistArgs {
    /// Input audio file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Print the peak and mean of the first N frames
    #[arg(long, default_value = "0")]
    frames: usize,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct HistReport<'a> {
    input: String,
    config: &'a AnalysisConfig,
    mean_value: Option<f32>,
    histogram: &'a CueHistogram,
}

pub fn run(kind: CueKind, args: HistArgs) -> anyhow::Result<()> {
    let config = args.common.analysis_config()?;
    let buffer = load_input(&args.input, args.common.downmix)?;

    println!("{kind} Histogram");
    println!("=============");
    describe("Input:", &args.input, &buffer);
    println!();

    let hist = cue_hist(kind, &buffer, &config)?;

    let (bins, frames) = hist.shape();
    println!("  Histogram:    {bins} bins x {frames} frames");
    println!(
        "  Range:        {} {} ({:.4} per bin)",
        hist.range,
        kind.axis_label(),
        hist.bin_width()
    );

    let means: Vec<f32> = (0..frames).filter_map(|f| hist.mean_value(f)).collect();
    let overall = (!means.is_empty()).then(|| means.iter().sum::<f32>() / means.len() as f32);
    if let Some(mean) = overall {
        println!("  Mean value:   {mean:.4}");
    }

    if args.frames > 0 {
        println!();
        println!("  {:>6}  {:>9}  {:>10}  {:>10}", "Frame", "Time (s)", "Peak", "Mean");
        println!("  {:>6}  {:>9}  {:>10}  {:>10}", "-----", "--------", "----", "----");
        let frame_secs = hist.hop_len as f32 / hist.sample_rate;
        for frame in 0..frames.min(args.frames) {
            let peak = hist
                .peak_bin(frame)
                .map_or_else(|| "-".to_string(), |b| format!("{:.3}", hist.bin_center(b)));
            let mean = hist
                .mean_value(frame)
                .map_or_else(|| "-".to_string(), |m| format!("{m:.3}"));
            println!(
                "  {:>6}  {:>9.3}  {:>10}  {:>10}",
                frame,
                frame as f32 * frame_secs,
                peak,
                mean
            );
        }
    }

    let mut renderer = args.common.renderer()?;
    if let Some(renderer) = renderer.as_mut() {
        let title = if args.common.title.is_empty() {
            format!("{kind} histogram")
        } else {
            format!("{} | {kind} histogram", args.common.title)
        };
        renderer.render_map(&title, &MapView::from(&hist));
    }

    finish_plots(renderer)?;
    write_json(
        args.common.json.as_deref(),
        &HistReport {
            input: args.input.display().to_string(),
            config: &config,
            mean_value: overall,
            histogram: &hist,
        },
    )
}

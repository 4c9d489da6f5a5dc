//! Interaural phase difference spectrogram.

use super::common::{CommonArgs, as_render, describe, finish_plots, load_input, write_json};
use binaspect_analysis::{IpdOptions, IpdSpectrogram, ipd_spect};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct IpdArgs {
    /// Input audio file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Lower frequency bound in Hz
    #[arg(long, default_value = "50")]
    start_freq: f32,

    /// Upper frequency bound in Hz
    #[arg(long, default_value = "620")]
    stop_freq: f32,

    /// Unwrap phase across frequency instead of keeping it in (-pi, pi]
    #[arg(long)]
    unwrap: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct IpdReport<'a> {
    input: String,
    options: &'a IpdOptions,
    spectrogram: &'a IpdSpectrogram,
}

pub fn run(args: IpdArgs) -> anyhow::Result<()> {
    let config = args.common.analysis_config()?;
    let buffer = load_input(&args.input, args.common.downmix)?;

    println!("IPD Spectrogram");
    println!("===============");
    describe("Input:", &args.input, &buffer);
    println!();

    let options = IpdOptions {
        start_freq: args.start_freq,
        stop_freq: args.stop_freq,
        wrapped: !args.unwrap,
        title: args.common.title.clone(),
        config,
    };
    let mut renderer = args.common.renderer()?;
    let spect = ipd_spect(&buffer, &options, as_render(&mut renderer))?;

    let (bins, frames) = spect.shape();
    println!("  Spectrogram:  {bins} bins x {frames} frames");
    if let (Some(first), Some(last)) = (spect.freqs.first(), spect.freqs.last()) {
        println!("  Bins:         {first:.1} Hz to {last:.1} Hz");
    }
    let (lo, hi) = spect.value_range();
    println!(
        "  Phase:        {lo:.3} to {hi:.3} rad ({})",
        if options.wrapped { "wrapped" } else { "unwrapped" }
    );

    finish_plots(renderer)?;
    write_json(
        args.common.json.as_deref(),
        &IpdReport {
            input: args.input.display().to_string(),
            options: &options,
            spectrogram: &spect,
        },
    )
}

//! Reference/test difference maps.

use super::common::{CommonArgs, as_render, describe, finish_plots, load_pair, write_json};
use binaspect_analysis::{AnalysisConfig, CueKind, DiffOptions, DifferenceMap, spect_diff};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct DiffArgs {
    /// Reference audio file
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Test audio file (e.g., a codec or renderer under evaluation)
    #[arg(value_name = "TEST")]
    test: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct DiffReport<'a> {
    cue: CueKind,
    reference: String,
    test: String,
    config: &'a AnalysisConfig,
    max_abs: f32,
    mean_abs: f32,
    map: &'a DifferenceMap,
}

pub fn run(kind: CueKind, args: DiffArgs) -> anyhow::Result<()> {
    let config = args.common.analysis_config()?;
    let (reference, test) = load_pair(&args.reference, &args.test, args.common.downmix)?;

    println!("{kind} Difference (test - reference)");
    println!("=============================");
    describe("Reference:", &args.reference, &reference);
    describe("Test:", &args.test, &test);
    println!();

    let options = DiffOptions {
        title: args.common.title.clone(),
        config,
    };
    let mut renderer = args.common.renderer()?;
    let diff = spect_diff(kind, &reference, &test, &options, as_render(&mut renderer))?;

    let (rows, frames) = diff.shape();
    println!("  Map:          {rows} bins x {frames} frames");
    println!("  Max |diff|:   {:.4}", diff.max_abs());
    println!("  Mean |diff|:  {:.6}", diff.mean_abs());
    println!(
        "  Identical:    {}",
        if diff.is_zero() { "yes" } else { "no" }
    );

    finish_plots(renderer)?;
    write_json(
        args.common.json.as_deref(),
        &DiffReport {
            cue: kind,
            reference: args.reference.display().to_string(),
            test: args.test.display().to_string(),
            config: &options.config,
            max_abs: diff.max_abs(),
            mean_abs: diff.mean_abs(),
            map: &diff,
        },
    )
}

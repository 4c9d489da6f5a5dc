//! Reference/test similarity scores.

use super::common::{CommonArgs, as_render, describe, finish_plots, load_pair, write_json};
use binaspect_analysis::{AnalysisConfig, CueKind, DiffOptions, SimilarityScore, similarity};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct SimArgs {
    /// Reference audio file
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Test audio file
    #[arg(value_name = "TEST")]
    test: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct SimReport<'a> {
    cue: CueKind,
    reference: String,
    test: String,
    config: &'a AnalysisConfig,
    similarity: SimilarityScore,
}

pub fn run(kind: CueKind, args: SimArgs) -> anyhow::Result<()> {
    let config = args.common.analysis_config()?;
    let (reference, test) = load_pair(&args.reference, &args.test, args.common.downmix)?;

    println!("{kind} Similarity");
    println!("==============");
    describe("Reference:", &args.reference, &reference);
    describe("Test:", &args.test, &test);
    println!();

    let options = DiffOptions {
        title: args.common.title.clone(),
        config,
    };
    let mut renderer = args.common.renderer()?;
    let score = similarity(kind, &reference, &test, &options, as_render(&mut renderer))?;

    println!("  Similarity:   {score}");

    finish_plots(renderer)?;
    write_json(
        args.common.json.as_deref(),
        &SimReport {
            cue: kind,
            reference: args.reference.display().to_string(),
            test: args.test.display().to_string(),
            config: &options.config,
            similarity: score,
        },
    )
}

//! Shared CLI helpers used across multiple commands.

use crate::config::load_config;
use crate::render::FileRenderer;
use anyhow::Context;
use binaspect_analysis::{AnalysisConfig, AudioBuffer, Render};
use binaspect_io::{DownmixRule, load_stereo};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Downmix rule as accepted on the command line.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum DownmixArg {
    /// Mono or stereo only
    #[default]
    Passthrough,
    /// First two channels
    FirstPair,
    /// ITU-R BS.775 fold of 5.1 / 7.1
    Itu,
}

impl From<DownmixArg> for DownmixRule {
    fn from(arg: DownmixArg) -> Self {
        match arg {
            DownmixArg::Passthrough => DownmixRule::Passthrough,
            DownmixArg::FirstPair => DownmixRule::FirstPair,
            DownmixArg::Itu => DownmixRule::ItuBs775,
        }
    }
}

/// Flags shared by every analysis command.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Analysis parameters (TOML, any subset of fields)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How to reduce files with more than two channels
    #[arg(long, value_enum, default_value_t = DownmixArg::Passthrough)]
    pub downmix: DownmixArg,

    /// Write PGM/CSV plots into this directory
    #[arg(long, value_name = "DIR")]
    pub plot_dir: Option<PathBuf>,

    /// Title prefix for plots
    #[arg(long, default_value = "")]
    pub title: String,

    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

impl CommonArgs {
    /// Analysis parameters from `--config`, or the defaults.
    pub fn analysis_config(&self) -> anyhow::Result<AnalysisConfig> {
        load_config(self.config.as_deref())
    }

    /// File renderer for `--plot-dir`, if given.
    pub fn renderer(&self) -> anyhow::Result<Option<FileRenderer>> {
        self.plot_dir.as_ref().map(FileRenderer::new).transpose()
    }
}

/// Load one input file as an analysis buffer.
pub fn load_input(path: &Path, downmix: DownmixArg) -> anyhow::Result<AudioBuffer> {
    anyhow::ensure!(path.exists(), "Input file not found: {}", path.display());
    load_stereo(path, downmix.into()).with_context(|| format!("Failed to load {}", path.display()))
}

/// Load a reference/test pair, refusing mismatched sample rates.
pub fn load_pair(
    reference: &Path,
    test: &Path,
    downmix: DownmixArg,
) -> anyhow::Result<(AudioBuffer, AudioBuffer)> {
    anyhow::ensure!(
        reference.exists(),
        "Reference file not found: {}",
        reference.display()
    );
    anyhow::ensure!(test.exists(), "Test file not found: {}", test.display());

    let reference_buf = load_input(reference, downmix)?;
    let test_buf = load_input(test, downmix)?;

    if reference_buf.sample_rate() != test_buf.sample_rate() {
        anyhow::bail!(
            "Sample rate mismatch: {} Hz vs {} Hz",
            reference_buf.sample_rate(),
            test_buf.sample_rate()
        );
    }

    Ok((reference_buf, test_buf))
}

/// Print a one-line summary of a loaded buffer.
pub fn describe(label: &str, path: &Path, buffer: &AudioBuffer) {
    println!(
        "  {label:10} {} ({} ch, {} Hz, {:.2}s)",
        path.display(),
        buffer.num_channels(),
        buffer.sample_rate(),
        buffer.duration_secs()
    );
}

/// Borrow an optional renderer as the engine's render argument.
pub fn as_render(renderer: &mut Option<FileRenderer>) -> Option<&mut dyn Render> {
    renderer.as_mut().map(|r| r as &mut dyn Render)
}

/// Report the files written by a renderer, if one was used.
pub fn finish_plots(renderer: Option<FileRenderer>) -> anyhow::Result<()> {
    if let Some(renderer) = renderer {
        let files = renderer.finish()?;
        println!("\nWrote {} plot files", files.len());
        for file in files {
            println!("  {}", file.display());
        }
    }
    Ok(())
}

/// Write `report` as pretty JSON when `--json` was given.
pub fn write_json<T: Serialize>(path: Option<&Path>, report: &T) -> anyhow::Result<()> {
    if let Some(path) = path {
        std::fs::write(path, serde_json::to_string_pretty(report)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nWrote report to {}", path.display());
    }
    Ok(())
}

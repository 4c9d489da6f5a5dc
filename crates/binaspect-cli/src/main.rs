//! Binaspect CLI - binaural spatial-cue analysis from the command line.

mod commands;
mod config;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "binaspect")]
#[command(author, version, about = "Binaural spatial-cue analysis", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ITD histogram difference map (test - reference)
    ItdDiff(commands::diff::DiffArgs),

    /// ILR histogram difference map (test - reference)
    IlrDiff(commands::diff::DiffArgs),

    /// ITD histogram of one file
    ItdHist(commands::hist::HistArgs),

    /// ILR histogram of one file
    IlrHist(commands::hist::HistArgs),

    /// ILR similarity between two files
    IlrSim(commands::sim::SimArgs),

    /// ITD similarity between two files
    ItdSim(commands::sim::SimArgs),

    /// Interaural phase difference spectrogram
    Ipd(commands::ipd::IpdArgs),

    /// Display WAV file metadata, optionally exporting the downmix
    Info(commands::info::InfoArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    use binaspect_analysis::CueKind;
    match cli.command {
        Commands::ItdDiff(args) => commands::diff::run(CueKind::Itd, args),
        Commands::IlrDiff(args) => commands::diff::run(CueKind::Ilr, args),
        Commands::ItdHist(args) => commands::hist::run(CueKind::Itd, args),
        Commands::IlrHist(args) => commands::hist::run(CueKind::Ilr, args),
        Commands::IlrSim(args) => commands::sim::run(CueKind::Ilr, args),
        Commands::ItdSim(args) => commands::sim::run(CueKind::Itd, args),
        Commands::Ipd(args) => commands::ipd::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}

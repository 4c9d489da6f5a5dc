//! Display WAV file metadata.

use super::common::{DownmixArg, load_input};
use binaspect_io::{WavFormat, WavSpec, read_wav_info, write_audio};
use clap::Args;
use std::path::PathBuf;

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: PathBuf,

    /// Downmix rule used by --export-downmix
    #[arg(long, value_enum, default_value_t = DownmixArg::Passthrough)]
    pub downmix: DownmixArg,

    /// Write the left/right pair the analysis would see to this WAV file
    #[arg(long, value_name = "FILE")]
    pub export_downmix: Option<PathBuf>,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.file.exists(), "Input file not found: {}", args.file.display());
    let info = read_wav_info(&args.file)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    if let Some(output) = args.export_downmix {
        let buffer = load_input(&args.file, args.downmix)?;
        let spec = WavSpec {
            channels: buffer.num_channels() as u16,
            sample_rate: info.sample_rate,
            bits_per_sample: 32,
        };
        write_audio(&output, buffer.channels(), spec)?;
        println!(
            "\nWrote {}-channel downmix to {}",
            buffer.num_channels(),
            output.display()
        );
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

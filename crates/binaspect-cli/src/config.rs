//! Analysis parameters loaded from TOML.
//!
//! Any subset of [`AnalysisConfig`] fields may be given; the rest keep their
//! defaults:
//!
//! ```toml
//! frame_len = 4096
//! hop_len = 1024
//! window = "blackman"
//!
//! [bands]
//! kind = "octave"
//! low_hz = 125.0
//! high_hz = 16000.0
//! ```

use anyhow::Context;
use binaspect_analysis::AnalysisConfig;
use std::path::Path;

/// Parse and validate a config file's contents.
pub fn parse_config(text: &str) -> anyhow::Result<AnalysisConfig> {
    let config: AnalysisConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config =
        parse_config(&text).with_context(|| format!("Invalid config {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?config, "loaded analysis config");
    Ok(config)
}

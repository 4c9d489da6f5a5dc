//! File sink for rendered maps and scores.
//!
//! Each map becomes an ASCII PGM image (time on X, low rows at the bottom)
//! plus a CSV with one line per frame. Scores are written as one-line text
//! files. File names are derived from the render title.

use binaspect_analysis::{MapView, Render, SimilarityScore};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// [`Render`] implementation writing into a directory.
///
/// Write errors are kept (first one wins) and reported by [`finish`](Self::finish).
pub struct FileRenderer {
    dir: PathBuf,
    written: Vec<PathBuf>,
    error: Option<std::io::Error>,
}

impl FileRenderer {
    /// Create the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
            error: None,
        })
    }

    /// Files written so far, or the first write error.
    pub fn finish(self) -> anyhow::Result<Vec<PathBuf>> {
        match self.error {
            Some(err) => Err(anyhow::anyhow!(err).context("Failed to write plot files")),
            None => Ok(self.written),
        }
    }

    fn record(&mut self, result: std::io::Result<PathBuf>) {
        match result {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "rendered");
                self.written.push(path);
            }
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
    }
}

impl Render for FileRenderer {
    fn render_map(&mut self, title: &str, view: &MapView<'_>) {
        if self.error.is_some() {
            return;
        }
        let stem = self.dir.join(slug(title));

        let pgm = stem.with_extension("pgm");
        let result = write_map_pgm(view, title, &pgm).map(|()| pgm);
        self.record(result);

        let csv = stem.with_extension("csv");
        let result = write_map_csv(view, &csv).map(|()| csv);
        self.record(result);
    }

    fn render_score(&mut self, title: &str, score: SimilarityScore) {
        if self.error.is_some() {
            return;
        }
        let path = self.dir.join(slug(title)).with_extension("txt");
        let result = std::fs::write(&path, format!("{title}: {score}\n")).map(|()| path);
        self.record(result);
    }
}

/// File-name-safe form of a title: lowercase ASCII alphanumerics joined by `_`.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("map");
    }
    out
}

/// Grey level for `value`: unsigned maps scale `[0, max]`, signed maps
/// scale `[-max_abs, max_abs]` with zero at mid-grey.
fn pixel(value: f32, scale: f32, signed: bool) -> u8 {
    if scale <= 0.0 || !value.is_finite() {
        return if signed { 127 } else { 0 };
    }
    let normalized = if signed {
        0.5 + 0.5 * value / scale
    } else {
        value / scale
    };
    (normalized.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Write a map as an ASCII PGM image.
pub fn write_map_pgm(view: &MapView<'_>, title: &str, path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    let width = view.frames();
    let height = view.rows();
    let (lo, hi) = view.value_range();
    let scale = if view.signed {
        lo.abs().max(hi.abs())
    } else {
        hi
    };

    writeln!(file, "P2")?;
    writeln!(file, "# {title}")?;
    writeln!(
        file,
        "# {}: {} to {}, {:.4} s per frame",
        view.row_label, view.row_span.0, view.row_span.1, view.frame_secs
    )?;
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;

    // Top to bottom = last row to row 0
    for row in view.data.iter().rev() {
        let line: Vec<String> = row
            .iter()
            .map(|&v| pixel(v, scale, view.signed).to_string())
            .collect();
        writeln!(file, "{}", line.join(" "))?;
    }

    file.flush()
}

/// Write a map as CSV: one line per frame, one column per row.
///
/// The header holds the centre of each row on the row axis.
pub fn write_map_csv(view: &MapView<'_>, path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    let rows = view.rows();
    let (lo, hi) = view.row_span;
    let row_width = if rows > 0 { (hi - lo) / rows as f32 } else { 0.0 };

    write!(file, "time_s")?;
    for row in 0..rows {
        write!(file, ",{:.4}", lo + (row as f32 + 0.5) * row_width)?;
    }
    writeln!(file)?;

    for frame in 0..view.frames() {
        write!(file, "{:.6}", frame as f32 * view.frame_secs)?;
        for row in view.data {
            write!(file, ",{}", row[frame])?;
        }
        writeln!(file)?;
    }

    file.flush()
}

//! Interaural level ratio estimation.
//!
//! For band energies `E_L` and `E_R` the ratio is
//!
//! ```text
//! ILR = (E_L - E_R) / (E_L + E_R) = tanh(ln(E_L / E_R) / 2)
//! ```
//!
//! which maps the level difference in dB onto [-1, 1]: 0 for equal energy,
//! +1 when only the left channel carries energy, -1 when only the right does.

use crate::band::{Band, BandDecomposer, BandSpectrum};
use crate::buffer::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::cue::{CueKind, CueRange, CueTrack};
use crate::error::Result;
use crate::frame::Framer;
use crate::itd::check_rate;

/// Level ratio of two energies in [-1, 1]; 0 when both are zero.
pub fn level_ratio(left_energy: f32, right_energy: f32) -> f32 {
    let total = left_energy + right_energy;
    if total > 0.0 {
        ((left_energy - right_energy) / total).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Level difference in dB corresponding to an ILR value.
pub fn ratio_to_db(ilr: f32) -> f32 {
    let ilr = ilr.clamp(-1.0 + f32::EPSILON, 1.0 - f32::EPSILON);
    10.0 * ((1.0 + ilr) / (1.0 - ilr)).log10()
}

/// Per-band ILR estimator for one sample rate.
#[derive(Debug, Clone)]
pub struct IlrEstimator {
    framer: Framer,
    decomposer: BandDecomposer,
    bands: Vec<Band>,
}

impl IlrEstimator {
    /// Build an estimator for buffers at `sample_rate`.
    pub fn new(config: &AnalysisConfig, sample_rate: f32) -> Result<Self> {
        config.validate()?;
        let framer = Framer::from_config(config)?;
        let decomposer = BandDecomposer::new(&framer, sample_rate)?;
        let bands = decomposer.bands(&config.bands)?;
        Ok(Self {
            framer,
            decomposer,
            bands,
        })
    }

    /// Bands estimated per frame.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// ILR of each band for one frame's spectra.
    pub fn estimate_frame(&self, left: &BandSpectrum, right: &BandSpectrum) -> Vec<f32> {
        self.bands
            .iter()
            .map(|band| level_ratio(left.energy(band.bins), right.energy(band.bins)))
            .collect()
    }

    /// Estimate every frame of `buffer`.
    pub fn track(&self, buffer: &AudioBuffer) -> Result<CueTrack> {
        check_rate(buffer, &self.decomposer)?;
        let values = self
            .decomposer
            .map_frames(&self.framer, buffer, |l, r| self.estimate_frame(l, r));

        #[cfg(feature = "tracing")]
        tracing::debug!(frames = values.len(), bands = self.bands.len(), "estimated ILR track");

        Ok(CueTrack {
            kind: CueKind::Ilr,
            range: CueRange::ilr(),
            values,
            bands_hz: self.bands.iter().map(|b| (b.low_hz, b.high_hz)).collect(),
            hop_len: self.framer.hop_len(),
            sample_rate: buffer.sample_rate(),
        })
    }
}

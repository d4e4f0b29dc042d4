use serde::{Deserialize, Serialize};

use crate::error::SequencerError;

/// Equal-division-of-the-octave pitch layout for the grid rows.
///
/// Offset `o` maps to `tonic_hz * 2^(o / divisions_per_octave)`, so a config
/// with 12 divisions and 2 octaves yields the familiar chromatic layout over
/// two octaves plus the closing tonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub tonic_hz: f32,
    pub divisions_per_octave: u32,
    pub octaves: u32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            tonic_hz: 220.0,
            divisions_per_octave: 12,
            octaves: 2,
        }
    }
}

impl ScaleConfig {
    fn validate(&self) -> Result<(), SequencerError> {
        if self.tonic_hz <= 0.0 || self.divisions_per_octave == 0 || self.octaves == 0 {
            return Err(SequencerError::InvalidScale);
        }
        Ok(())
    }
}

/// Ascending frequency table covering the configured octaves, one entry per
/// pitch offset, closing on the top tonic.
pub fn step_frequencies(config: &ScaleConfig) -> Result<Vec<f32>, SequencerError> {
    config.validate()?;
    let divisions = config.divisions_per_octave as f32;
    let count = config.divisions_per_octave * config.octaves + 1;
    Ok((0..count)
        .map(|offset| config.tonic_hz * 2.0_f32.powf(offset as f32 / divisions))
        .collect())
}

/// Human-readable `octave.degree` label for a grid row, both 1-based.
pub fn note_from_offset(config: &ScaleConfig, offset: usize) -> String {
    let divisions = config.divisions_per_octave.max(1) as usize;
    format!("{}.{}", offset / divisions + 1, offset % divisions + 1)
}

/// Cents above the tonic of the offset's own octave.
///
/// Keyed by pitch offset rather than by the label `note_from_offset`
/// produces: grid rows are addressed by offset everywhere else, so a
/// label-keyed lookup would just round-trip through strings.
pub fn cents_for_note(config: &ScaleConfig, offset: usize) -> f32 {
    let divisions = config.divisions_per_octave.max(1) as usize;
    (offset % divisions) as f32 * 1200.0 / divisions as f32
}

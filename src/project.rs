use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SequencerError;
use crate::grid::StepGrid;
use crate::scale::ScaleConfig;

/// Wire format for a stored composition.
///
/// `steps[t]` lists the pitch offsets active at step `t` — transposed
/// relative to the grid's own pitch-major storage. Consumers of the store
/// depend on this orientation, so the transposition is part of the format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDoc {
    pub scale_config: ScaleConfig,
    pub bpm: f32,
    pub steps: Vec<Vec<usize>>,
}

impl CompositionDoc {
    pub fn from_grid(grid: &StepGrid, scale_config: ScaleConfig, bpm: f32) -> Self {
        let steps = (0..grid.step_count())
            .map(|step| {
                (0..grid.pitch_count())
                    .filter(|&pitch| grid.is_selected(pitch, step))
                    .collect()
            })
            .collect();
        Self {
            scale_config,
            bpm,
            steps,
        }
    }

    /// Rebuilds a grid with `pitch_count` rows from the stored steps.
    pub fn to_grid(&self, pitch_count: usize) -> Result<StepGrid, SequencerError> {
        let mut grid = StepGrid::new(pitch_count, self.steps.len())?;
        for (step, offsets) in self.steps.iter().enumerate() {
            for &pitch in offsets {
                grid = grid.set(pitch, step, true)?;
            }
        }
        Ok(grid)
    }

    pub fn to_json(&self) -> Result<String, SequencerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SequencerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Startup settings for the demo binary, stored as RON next to the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub scale: ScaleConfig,
    pub bpm: f32,
    pub gain: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: ScaleConfig::default(),
            bpm: 300.0,
            gain: 0.5,
        }
    }
}

impl Settings {
    /// One grid column's worth of wall-clock time, in seconds.
    pub fn step_duration(&self) -> f32 {
        60.0 / self.bpm
    }

    pub fn save(&self, path: &Path) -> Result<(), SequencerError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, ron_string)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SequencerError> {
        let ron_string = fs::read_to_string(path)?;
        Ok(ron::from_str(&ron_string)?)
    }
}

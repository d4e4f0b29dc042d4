use thiserror::Error;

/// Everything that can go wrong inside the sequencer core.
#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("grid dimensions must be positive (got {pitches} pitches x {steps} steps)")]
    InvalidDimension { pitches: usize, steps: usize },

    #[error("cell ({pitch}, {step}) is outside a {pitches} x {steps} grid")]
    OutOfRange {
        pitch: usize,
        step: usize,
        pitches: usize,
        steps: usize,
    },

    #[error("scale config needs a positive tonic and at least one division per octave")]
    InvalidScale,

    #[error("step duration must be positive and finite (got {0})")]
    InvalidTempo(f32),

    #[error("audio engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("composition document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("could not parse settings: {0}")]
    SettingsParse(#[from] ron::error::SpannedError),

    #[error("could not encode settings: {0}")]
    SettingsEncode(#[from] ron::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

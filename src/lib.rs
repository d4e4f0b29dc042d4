//! Grid-based step sequencer core.
//!
//! A 2D boolean grid (pitch offset x step index) is compiled into an ordered
//! schedule of timed tone events; a playback controller starts, advances and
//! stops that schedule in real time and publishes cursor updates for UI
//! highlighting. Audio output goes through the narrow [`audio::AudioEngine`]
//! interface, with a cpal-backed sine engine as the default implementation.

pub mod audio;
pub mod clock;
pub mod compile;
pub mod controller;
pub mod error;
pub mod events;
pub mod grid;
pub mod project;
pub mod scale;

pub use audio::{AudioEngine, EngineConfig, EngineFactory, SynthEngine, SynthEngineFactory};
pub use clock::CursorClock;
pub use compile::compile_schedule;
pub use controller::{Command, Controller, ControllerHandle, Update, spawn_controller};
pub use error::SequencerError;
pub use events::{Schedule, ToneEvent};
pub use grid::{DEFAULT_STEP_COUNT, StepGrid};
pub use project::{CompositionDoc, Settings};
pub use scale::{ScaleConfig, cents_for_note, note_from_offset, step_frequencies};

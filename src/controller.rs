use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error, warn};

use crate::audio::{EngineConfig, EngineFactory};
use crate::clock::CursorClock;
use crate::compile::compile_schedule;
use crate::error::SequencerError;
use crate::grid::StepGrid;

#[derive(Debug, Clone)]
pub enum Command {
    Play,
    Stop,
    Clear,
    /// Replace the frequency table and start over with a cleared grid sized
    /// to the new table. Prior selections are intentionally discarded.
    Reconfigure { frequencies: Vec<f32> },
    ToggleCell { pitch: usize, step: usize },
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum Update {
    /// The step the cursor now sits on, for UI highlighting.
    CursorMoved { step: usize },
    PlaybackState { playing: bool },
    /// Snapshot of the grid after an edit, clear or reconfigure.
    GridChanged { grid: StepGrid },
    Error { message: String },
}

/// Live playback state; exists only while playing. Dropping it cancels the
/// cursor clock, and `Controller::on_stop` stops the engine before the drop.
struct PlaybackSession {
    engine: Box<dyn crate::audio::AudioEngine>,
    clock: CursorClock,
    cursor: usize,
}

/// Two-state machine (idle / playing) that compiles the grid on play, hands
/// the schedule to a freshly built audio engine and advances the cursor once
/// per step duration. All mutation happens on the thread that owns the
/// controller; the cursor clock only sends timestamps over a channel.
pub struct Controller<F: EngineFactory> {
    grid: StepGrid,
    frequencies: Vec<f32>,
    step_duration: f32,
    gain: f32,
    factory: F,
    session: Option<PlaybackSession>,
    update_tx: Sender<Update>,
}

impl<F: EngineFactory> Controller<F> {
    pub fn new(
        frequencies: Vec<f32>,
        step_count: usize,
        step_duration: f32,
        gain: f32,
        factory: F,
        update_tx: Sender<Update>,
    ) -> Result<Self, SequencerError> {
        validate_step_duration(step_duration)?;
        let grid = StepGrid::new(frequencies.len(), step_count)?;
        Ok(Self::with_grid(
            grid,
            frequencies,
            step_duration,
            gain,
            factory,
            update_tx,
        ))
    }

    fn with_grid(
        grid: StepGrid,
        frequencies: Vec<f32>,
        step_duration: f32,
        gain: f32,
        factory: F,
        update_tx: Sender<Update>,
    ) -> Self {
        Self {
            grid,
            frequencies,
            step_duration,
            gain,
            factory,
            session: None,
            update_tx,
        }
    }

    pub fn grid(&self) -> &StepGrid {
        &self.grid
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Current cursor step; always 0 while idle.
    pub fn cursor(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.cursor)
    }

    /// Stop-before-start, then compile the current grid, start an engine on
    /// the schedule and start the cursor clock. On engine failure everything
    /// already started is rolled back and the controller stays idle.
    pub fn on_play(&mut self) -> Result<(), SequencerError> {
        self.on_stop();

        let schedule = compile_schedule(&self.grid, &self.frequencies, self.step_duration);
        debug!(
            events = schedule.events.len(),
            total_duration = schedule.total_duration,
            "compiled schedule"
        );

        let mut engine = self.factory.build(EngineConfig {
            schedule,
            gain: self.gain,
        })?;
        if let Err(err) = engine.play() {
            engine.stop();
            return Err(err);
        }

        let clock = CursorClock::start(Duration::from_secs_f32(self.step_duration));
        self.session = Some(PlaybackSession {
            engine,
            clock,
            cursor: 0,
        });
        self.publish(Update::PlaybackState { playing: true });
        Ok(())
    }

    /// Idempotent: cancels the clock, stops the engine and resets the
    /// cursor. Calling it while already idle still publishes the cursor
    /// reset.
    pub fn on_stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.engine.stop();
            // session drop cancels the cursor clock
            debug!("playback stopped");
            self.publish(Update::PlaybackState { playing: false });
        }
        self.publish(Update::CursorMoved { step: 0 });
    }

    pub fn on_clear(&mut self) {
        self.on_stop();
        self.grid = self.grid.cleared();
        self.publish_grid();
    }

    pub fn on_reconfigure(&mut self, frequencies: Vec<f32>) -> Result<(), SequencerError> {
        self.on_stop();
        let grid = StepGrid::new(frequencies.len(), self.grid.step_count())?;
        self.frequencies = frequencies;
        self.grid = grid;
        self.publish_grid();
        Ok(())
    }

    /// Valid in any state; a running session keeps playing its compiled
    /// schedule and only the next play picks the change up.
    pub fn on_toggle_cell(&mut self, pitch: usize, step: usize) -> Result<(), SequencerError> {
        self.grid = self.grid.toggled(pitch, step)?;
        self.publish_grid();
        Ok(())
    }

    /// One cursor clock tick: advance and wrap, then publish.
    pub fn on_tick(&mut self) {
        let step_count = self.grid.step_count();
        if let Some(session) = &mut self.session {
            session.cursor = (session.cursor + 1) % step_count;
            let step = session.cursor;
            self.publish(Update::CursorMoved { step });
        }
    }

    /// Returns false when the loop should exit.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Play => {
                if let Err(err) = self.on_play() {
                    error!("failed to start playback: {err}");
                    self.publish(Update::Error {
                        message: err.to_string(),
                    });
                }
            }
            Command::Stop => self.on_stop(),
            Command::Clear => self.on_clear(),
            Command::Reconfigure { frequencies } => {
                if let Err(err) = self.on_reconfigure(frequencies) {
                    self.publish(Update::Error {
                        message: err.to_string(),
                    });
                }
            }
            Command::ToggleCell { pitch, step } => {
                // out-of-range toggles are rejected locally, state unchanged
                if let Err(err) = self.on_toggle_cell(pitch, step) {
                    warn!("rejected cell toggle: {err}");
                }
            }
            Command::Shutdown => {
                self.on_stop();
                return false;
            }
        }
        true
    }

    fn publish_grid(&self) {
        self.publish(Update::GridChanged {
            grid: self.grid.clone(),
        });
    }

    fn publish(&self, update: Update) {
        let _ = self.update_tx.send(update);
    }
}

pub struct ControllerHandle {
    pub command_tx: Sender<Command>,
    pub update_rx: Receiver<Update>,
}

/// The cursor clock period comes straight from this value, so it has to be
/// a usable wall-clock duration before playback ever starts.
fn validate_step_duration(step_duration: f32) -> Result<(), SequencerError> {
    if !step_duration.is_finite() || step_duration <= 0.0 {
        return Err(SequencerError::InvalidTempo(step_duration));
    }
    Ok(())
}

/// Spawns the control loop on its own thread and returns its channel ends.
/// Grid dimensions and the step duration are validated before the thread
/// starts.
pub fn spawn_controller<F>(
    frequencies: Vec<f32>,
    step_count: usize,
    step_duration: f32,
    gain: f32,
    factory: F,
) -> Result<ControllerHandle, SequencerError>
where
    F: EngineFactory + Send + 'static,
{
    validate_step_duration(step_duration)?;
    let grid = StepGrid::new(frequencies.len(), step_count)?;
    let (command_tx, command_rx) = channel::unbounded();
    let (update_tx, update_rx) = channel::unbounded();

    // the engine (and thus the session) may not be Send, so the controller
    // is built inside the thread that will own it
    std::thread::spawn(move || {
        let controller = Controller::with_grid(
            grid,
            frequencies,
            step_duration,
            gain,
            factory,
            update_tx,
        );
        control_loop(controller, command_rx);
    });

    Ok(ControllerHandle {
        command_tx,
        update_rx,
    })
}

fn control_loop<F: EngineFactory>(mut controller: Controller<F>, command_rx: Receiver<Command>) {
    loop {
        let ticks = controller
            .session
            .as_ref()
            .map(|session| session.clock.ticks().clone())
            .unwrap_or_else(channel::never);

        crossbeam::select! {
            recv(command_rx) -> msg => match msg {
                Ok(command) => {
                    if !controller.handle(command) {
                        break;
                    }
                }
                // every handle dropped; tear down playback and exit
                Err(_) => {
                    controller.on_stop();
                    break;
                }
            },
            recv(ticks) -> msg => {
                if msg.is_ok() {
                    controller.on_tick();
                }
            }
        }
    }
}

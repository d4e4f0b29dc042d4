use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use std::{env, fs};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use tonegrid::{
    Command, CompositionDoc, ControllerHandle, DEFAULT_STEP_COUNT, Settings, StepGrid,
    SynthEngineFactory, Update, scale, spawn_controller,
};

const SETTINGS_PATH: &str = "settings.ron";
const EXPORT_PATH: &str = "composition.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match Settings::load(Path::new(SETTINGS_PATH)) {
        Ok(settings) => settings,
        Err(_) => Settings::default(),
    };
    let frequencies = scale::step_frequencies(&settings.scale)?;
    let pitch_count = frequencies.len();

    let handle = spawn_controller(
        frequencies,
        DEFAULT_STEP_COUNT,
        settings.step_duration(),
        settings.gain,
        SynthEngineFactory,
    )?;

    if let Some(path) = env::args().nth(1) {
        let doc = CompositionDoc::from_json(&fs::read_to_string(&path)?)?;
        tracing::info!("loaded composition from {path}");
        for (step, offsets) in doc.steps.iter().enumerate() {
            for &pitch in offsets {
                handle.command_tx.send(Command::ToggleCell { pitch, step })?;
            }
        }
    } else {
        seed_demo_pattern(&handle, pitch_count)?;
    }

    println!("tonegrid — space: play/stop  c: clear  e: export  q: quit");
    terminal::enable_raw_mode()?;
    let result = run(&handle, &settings);
    terminal::disable_raw_mode()?;
    let _ = handle.command_tx.send(Command::Shutdown);
    result
}

/// A little ascending arpeggio so an empty start still makes sound.
fn seed_demo_pattern(
    handle: &ControllerHandle,
    pitch_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    for (pitch, step) in [(0, 0), (4, 4), (7, 8), (12, 12)] {
        if pitch < pitch_count {
            handle.command_tx.send(Command::ToggleCell { pitch, step })?;
        }
    }
    Ok(())
}

fn run(handle: &ControllerHandle, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut playing = false;
    let mut grid: Option<StepGrid> = None;

    loop {
        while let Ok(update) = handle.update_rx.try_recv() {
            match update {
                Update::CursorMoved { step } => {
                    print!("\rstep {step:>2}");
                    io::stdout().flush()?;
                }
                Update::PlaybackState { playing: now_playing } => playing = now_playing,
                Update::GridChanged { grid: snapshot } => grid = Some(snapshot),
                Update::Error { message } => tracing::error!("{message}"),
            }
        }

        if !event::poll(Duration::from_millis(25))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char(' ') => {
                let command = if playing { Command::Stop } else { Command::Play };
                handle.command_tx.send(command)?;
            }
            KeyCode::Char('c') => handle.command_tx.send(Command::Clear)?,
            KeyCode::Char('e') => {
                if let Some(grid) = &grid {
                    let doc =
                        CompositionDoc::from_grid(grid, settings.scale.clone(), settings.bpm);
                    fs::write(EXPORT_PATH, doc.to_json()?)?;
                    tracing::info!("exported {EXPORT_PATH}");
                } else {
                    tracing::info!("nothing to export yet");
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            _ => {}
        }
    }
}

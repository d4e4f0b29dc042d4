mod synth;

pub use synth::{SynthEngine, SynthEngineFactory};

use crate::error::SequencerError;
use crate::events::Schedule;

/// Everything an engine needs to play one session: the compiled schedule
/// (which carries the total duration) and an output gain in `0.0..=1.0`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub schedule: Schedule,
    pub gain: f32,
}

/// Narrow interface the controller drives. One engine instance plays one
/// compiled schedule; a new session gets a new engine.
pub trait AudioEngine {
    /// Begin output of the configured schedule.
    fn play(&mut self) -> Result<(), SequencerError>;

    /// Immediately silence and cancel output. Idempotent.
    fn stop(&mut self);
}

/// Builds engines on demand so the controller never touches the audio
/// backend directly.
pub trait EngineFactory {
    fn build(&self, config: EngineConfig) -> Result<Box<dyn AudioEngine>, SequencerError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct EngineLog {
        /// Config captured per built engine, in build order.
        pub built: Vec<EngineConfig>,
        /// `(engine_id, "play" | "stop")` in call order.
        pub calls: Vec<(usize, &'static str)>,
    }

    #[derive(Clone, Default)]
    pub struct MockFactory {
        pub log: Arc<Mutex<EngineLog>>,
        pub fail_build: bool,
        pub fail_play: bool,
    }

    impl EngineFactory for MockFactory {
        fn build(&self, config: EngineConfig) -> Result<Box<dyn AudioEngine>, SequencerError> {
            if self.fail_build {
                return Err(SequencerError::EngineUnavailable("mock build failure".into()));
            }
            let mut log = self.log.lock().unwrap();
            log.built.push(config);
            let id = log.built.len() - 1;
            Ok(Box::new(MockEngine {
                id,
                fail_play: self.fail_play,
                log: Arc::clone(&self.log),
            }))
        }
    }

    pub struct MockEngine {
        id: usize,
        fail_play: bool,
        log: Arc<Mutex<EngineLog>>,
    }

    impl AudioEngine for MockEngine {
        fn play(&mut self) -> Result<(), SequencerError> {
            self.log.lock().unwrap().calls.push((self.id, "play"));
            if self.fail_play {
                return Err(SequencerError::EngineUnavailable("mock play failure".into()));
            }
            Ok(())
        }

        fn stop(&mut self) {
            self.log.lock().unwrap().calls.push((self.id, "stop"));
        }
    }
}

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::{AudioEngine, EngineConfig, EngineFactory};
use crate::error::SequencerError;

/// Linear attack/release ramp applied to each tone to avoid clicks.
const EDGE_RAMP_SECS: f32 = 0.005;

struct Voice {
    start: f32,
    end: f32,
    frequency: f32,
    phase: f32,
}

/// cpal-backed engine that renders a compiled schedule as summed sine
/// voices. The schedule and gain are moved into the output callback at
/// `play()`; the stream owns them until `stop()` drops it.
pub struct SynthEngine {
    config: EngineConfig,
    stream: Option<cpal::Stream>,
}

impl SynthEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }
}

impl AudioEngine for SynthEngine {
    fn play(&mut self) -> Result<(), SequencerError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SequencerError::EngineUnavailable("no output device".into()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| SequencerError::EngineUnavailable(e.to_string()))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(SequencerError::EngineUnavailable(format!(
                "unsupported sample format {}",
                supported.sample_format()
            )));
        }
        let stream_config: cpal::StreamConfig = supported.into();
        let sample_rate = stream_config.sample_rate as f32;
        let channels = stream_config.channels as usize;

        let gain = self.config.gain;
        let total_duration = self.config.schedule.total_duration;
        let mut voices: Vec<Voice> = self
            .config
            .schedule
            .events
            .iter()
            .map(|event| Voice {
                start: event.start,
                end: event.start + event.duration,
                frequency: event.frequency,
                phase: 0.0,
            })
            .collect();
        let mut frame_clock: u64 = 0;

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let t = frame_clock as f32 / sample_rate;
                        let mut sample = 0.0;
                        if t < total_duration {
                            for voice in
                                voices.iter_mut().filter(|v| t >= v.start && t < v.end)
                            {
                                let envelope = edge_ramp(t, voice.start, voice.end);
                                sample += (voice.phase * std::f32::consts::TAU).sin() * envelope;
                                voice.phase += voice.frequency / sample_rate;
                                if voice.phase >= 1.0 {
                                    voice.phase -= 1.0;
                                }
                            }
                        }
                        let out = sample * gain;
                        for slot in frame.iter_mut() {
                            *slot = out;
                        }
                        frame_clock += 1;
                    }
                },
                |err| tracing::error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| SequencerError::EngineUnavailable(e.to_string()))?;

        stream
            .play()
            .map_err(|e| SequencerError::EngineUnavailable(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) {
        // dropping the stream tears down the device callback
        self.stream = None;
    }
}

fn edge_ramp(t: f32, start: f32, end: f32) -> f32 {
    let attack = (t - start) / EDGE_RAMP_SECS;
    let release = (end - t) / EDGE_RAMP_SECS;
    attack.min(release).clamp(0.0, 1.0)
}

pub struct SynthEngineFactory;

impl EngineFactory for SynthEngineFactory {
    fn build(&self, config: EngineConfig) -> Result<Box<dyn AudioEngine>, SequencerError> {
        Ok(Box::new(SynthEngine::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_ramp_fades_in_and_out() {
        assert_eq!(edge_ramp(0.0, 0.0, 0.5), 0.0);
        assert_eq!(edge_ramp(0.25, 0.0, 0.5), 1.0);
        assert_eq!(edge_ramp(0.5, 0.0, 0.5), 0.0);
        assert!(edge_ramp(0.0025, 0.0, 0.5) > 0.4);
        assert!(edge_ramp(0.0025, 0.0, 0.5) < 0.6);
    }

    #[test]
    fn stop_without_play_is_a_no_op() {
        let mut engine = SynthEngine::new(EngineConfig {
            schedule: crate::events::Schedule::default(),
            gain: 0.5,
        });
        engine.stop();
        engine.stop();
    }
}

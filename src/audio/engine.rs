use std::collections::HashMap;

use crate::audio_api::{AudioCommand, SoundId};

use super::click::synth_click;
use super::sample_buffer::{SampleBuffer, StereoFrame};
use super::voice::Voice;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("sound {0} was never loaded")]
    NotLoaded(SoundId),
    #[error("sound {0} has no audio data")]
    Empty(SoundId),
}

// one drum: its decoded sample and the single voice that plays it
struct Slot {
    buffer: SampleBuffer,
    voice: Voice,
}

pub struct Engine {
    slots: HashMap<SoundId, Slot>,
    click: Slot,
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            slots: HashMap::new(),
            click: Slot {
                buffer: synth_click(sample_rate),
                voice: Voice::default(),
            },
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { sound, buffer } => {
                self.slots.insert(
                    sound,
                    Slot {
                        buffer,
                        voice: Voice::default(),
                    },
                );
            }
            AudioCommand::Play { sound, gain } => {
                // the loader already warned about missing drums; no logging
                // on the audio thread
                let _ = self.play(&sound, gain);
            }
            AudioCommand::Click { gain } => self.click.voice.restart(gain),
        }
    }

    pub fn play(&mut self, sound: &SoundId, gain: f32) -> Result<(), PlaybackError> {
        let slot = self
            .slots
            .get_mut(sound)
            .ok_or_else(|| PlaybackError::NotLoaded(sound.clone()))?;
        if slot.buffer.is_empty() {
            return Err(PlaybackError::Empty(sound.clone()));
        }
        slot.voice.restart(gain);
        Ok(())
    }

    pub fn is_loaded(&self, sound: &SoundId) -> bool {
        self.slots.contains_key(sound)
    }

    pub fn active_voices(&self) -> usize {
        self.slots.values().filter(|s| s.voice.is_active()).count()
            + usize::from(self.click.voice.is_active())
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::default());
        for slot in self.slots.values_mut() {
            slot.voice.render_into(&slot.buffer, out);
        }
        self.click.voice.render_into(&self.click.buffer, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_snare() -> Engine {
        let mut engine = Engine::new(48000);
        engine.handle_cmd(AudioCommand::RegisterSample {
            sound: "snare".into(),
            buffer: SampleBuffer::from_mono(&[1.0; 64]),
        });
        engine
    }

    #[test]
    fn play_renders_registered_sample_at_gain() {
        let mut engine = engine_with_snare();
        engine.handle_cmd(AudioCommand::Play {
            sound: "snare".into(),
            gain: 0.5,
        });
        let mut out = vec![StereoFrame::default(); 16];
        engine.render_block(&mut out);
        assert!(out.iter().all(|f| *f == StereoFrame::mono(0.5)));
    }

    #[test]
    fn unloaded_sound_is_an_error_not_a_panic() {
        let mut engine = engine_with_snare();
        assert!(engine.is_loaded(&"snare".into()));
        assert!(!engine.is_loaded(&"crash".into()));
        let err = engine.play(&"crash".into(), 1.0).unwrap_err();
        assert_eq!(err, PlaybackError::NotLoaded("crash".into()));

        // through the command path it is just swallowed
        engine.handle_cmd(AudioCommand::Play {
            sound: "crash".into(),
            gain: 1.0,
        });
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn empty_sample_is_reported() {
        let mut engine = Engine::new(48000);
        engine.handle_cmd(AudioCommand::RegisterSample {
            sound: "tom-1".into(),
            buffer: SampleBuffer::default(),
        });
        assert_eq!(
            engine.play(&"tom-1".into(), 1.0),
            Err(PlaybackError::Empty("tom-1".into()))
        );
    }

    #[test]
    fn retrigger_restarts_from_the_top() {
        let mut engine = Engine::new(48000);
        engine.handle_cmd(AudioCommand::RegisterSample {
            sound: "kick-bass".into(),
            buffer: SampleBuffer::from_mono(&[0.1, 0.2, 0.3, 0.4]),
        });
        engine.play(&"kick-bass".into(), 1.0).unwrap();
        let mut out = vec![StereoFrame::default(); 2];
        engine.render_block(&mut out);

        engine.play(&"kick-bass".into(), 1.0).unwrap();
        engine.render_block(&mut out);
        assert_eq!(out[0], StereoFrame::mono(0.1));
        assert_eq!(engine.active_voices(), 1);
    }

    #[test]
    fn click_plays_without_any_registered_sample() {
        let mut engine = Engine::new(48000);
        engine.handle_cmd(AudioCommand::Click { gain: 0.3 });
        assert_eq!(engine.active_voices(), 1);
        let mut out = vec![StereoFrame::default(); 64];
        engine.render_block(&mut out);
        assert!(out.iter().any(|f| f.left != 0.0));
    }
}

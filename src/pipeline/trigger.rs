// key press -> which drum, how loud
use crate::audio_api::AudioCommand;
use crate::pipeline::mapping::{KeyMapping, PadKey, SoundId};

/// A resolved trigger: the pad that was hit and what the engine should play.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub key: PadKey,
    pub sound: SoundId,
    pub gain: f32,
}

impl Hit {
    pub fn command(&self) -> AudioCommand {
        AudioCommand::Play {
            sound: self.sound.clone(),
            gain: self.gain,
        }
    }
}

/// Unbound keys are not an error, just nothing to play.
pub fn resolve(mapping: &KeyMapping, volume: f32, key: PadKey) -> Option<Hit> {
    let sound = mapping.sound_for(key)?;
    Some(Hit {
        key,
        sound: sound.clone(),
        gain: volume,
    })
}

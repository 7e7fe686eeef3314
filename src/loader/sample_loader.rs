use std::path::{Path, PathBuf};

use crate::audio::SampleBuffer;
use crate::audio_api::{AudioCommand, SoundId};
use crate::pipeline::mapping::DRUM_KIT;

const SAMPLE_EXT: &str = "wav";

// <sounds_dir>/<sound-id>.wav
pub fn sound_path(sounds_dir: &Path, sound: &SoundId) -> PathBuf {
    sounds_dir.join(format!("{}.{SAMPLE_EXT}", sound.as_str()))
}

// Load a drum from disk, prepared for registration with the engine
pub fn load(sounds_dir: &Path, sound: &SoundId, target_rate: u32) -> anyhow::Result<AudioCommand> {
    let buffer = SampleBuffer::load_wav(&sound_path(sounds_dir, sound), target_rate)?;
    Ok(AudioCommand::RegisterSample {
        sound: sound.clone(),
        buffer,
    })
}

/// Decode every drum in the kit. Drums that fail to load are logged and
/// left out; playing them later just fails quietly in the engine.
pub fn load_kit(sounds_dir: &Path, target_rate: u32) -> Vec<AudioCommand> {
    let mut cmds = Vec::with_capacity(DRUM_KIT.len());
    for drum in DRUM_KIT {
        let sound = SoundId::new(drum.sound);
        match load(sounds_dir, &sound, target_rate) {
            Ok(cmd) => cmds.push(cmd),
            Err(e) => log::warn!("skipping {sound}: {e:#}"),
        }
    }
    log::info!(
        "loaded {}/{} drums from {}",
        cmds.len(),
        DRUM_KIT.len(),
        sounds_dir.display()
    );
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..32 {
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn path_follows_sound_id() {
        let path = sound_path(Path::new("sounds"), &"kick-bass".into());
        assert_eq!(path, Path::new("sounds").join("kick-bass.wav"));
    }

    #[test]
    fn missing_drums_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&sound_path(dir.path(), &"snare".into()));
        write_wav(&sound_path(dir.path(), &"tom-1".into()));

        let cmds = load_kit(dir.path(), 44100);
        let loaded: Vec<String> = cmds
            .iter()
            .filter_map(|c| match c {
                AudioCommand::RegisterSample { sound, buffer } => {
                    assert_eq!(buffer.len(), 32);
                    Some(sound.to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(loaded, vec!["tom-1", "snare"]);
    }
}

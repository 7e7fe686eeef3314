pub use crate::audio::SampleBuffer;
pub use crate::pipeline::mapping::SoundId;

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (would stall the audio thread), so every
    // drum is decoded up front (see sample_loader.rs) and handed over here
    RegisterSample { sound: SoundId, buffer: SampleBuffer },

    // Restart the drum's sample from the top at `gain`
    Play { sound: SoundId, gain: f32 },

    // One metronome click; the click sound lives inside the engine
    Click { gain: f32 },
}

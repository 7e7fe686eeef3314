// the drum kit's state and the components that change it; no audio device or
// terminal code lives down here
pub mod mapping;
pub mod metronome;
pub mod persistence;
pub mod player;
pub mod recorder;
pub mod settings;
pub mod trigger;

// The current input plan:
//
// Pads:
//   any character key   //  KeyPress(c), case-insensitive, unbound keys do nothing
//   mouse click on pad  //  PadClick(key bound to that pad)
//
// Transport / tools:
//   Tab                 //  StartRecording / StopRecording (toggled by the tui)
//   Enter               //  PlayRecording
//   Backspace           //  ClearRecording
//   Esc                 //  StopPlayback while playing, otherwise Quit
//   F1                  //  StartMetronome / StopMetronome
//   Up / Down           //  SetBpm(bpm +/- 1), PageUp / PageDown +/- 10
//   Left / Right        //  SetVolume(volume -/+ 5%)
//   F2                  //  open the key editor (tui only, ends in ApplyMapping / ResetMapping)
//
// The rendering process:
//   - Only the middle layer (DrumKit) owns recorder/player/metronome/mapping state;
//     the tui reads a DisplayState every frame and draws it.
//   - Everything the core wants the outside world to do comes back as Effects:
//     audio commands for the engine and KitEvents for the tui (pad flashes etc).

use crate::audio_api::AudioCommand;
use crate::pipeline::mapping::{KeyMapping, PadKey, SoundId};
use crate::pipeline::metronome::MetronomeState;
use crate::pipeline::player::PlaybackState;
use crate::pipeline::recorder::RecorderState;

pub const DEFAULT_VOLUME: f32 = 1.0;
pub const VOLUME_STEP: f32 = 0.05;

pub const DEFAULT_BPM: u16 = 120;
pub const MIN_BPM: u16 = 60;
pub const MAX_BPM: u16 = 200;

pub const SETTLE_DELAY_MS: u64 = 500; // quiet tail after the last replayed hit
pub const CLICK_GAIN_RATIO: f32 = 0.3; // metronome gain relative to the pads
pub const PAD_FLASH_MS: u64 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KitTask {
    PlaybackStep,
    PlaybackSettle,
    MetronomeTick,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // pads
    KeyPress(char),
    PadClick(PadKey),

    // recorder / player
    StartRecording,
    StopRecording,
    PlayRecording,
    StopPlayback,
    ClearRecording,

    // metronome
    StartMetronome,
    StopMetronome,

    // settings
    SetVolume(f32),
    SetBpm(u16),

    // key editor: raw (key, sound) rows, invalid keys get filtered
    ApplyMapping(Vec<(String, SoundId)>),
    ResetMapping,

    Quit,
}

/// Notifications for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum KitEvent {
    PadHit { key: PadKey, sound: SoundId },
    RecordingStateChanged(RecorderState),
    RecordingCleared,
    PlaybackStateChanged(PlaybackState),
    MetronomeStateChanged(MetronomeState),
    MappingChanged(KeyMapping),
    VolumeChanged(f32),
    BpmChanged(u16),
}

/// What a single call into the kit wants done.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    pub audio: Vec<AudioCommand>,
    pub events: Vec<KitEvent>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.events.is_empty()
    }

    pub fn extend(&mut self, other: Effects) {
        self.audio.extend(other.audio);
        self.events.extend(other.events);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PadView {
    pub sound: SoundId,
    pub name: &'static str,
    pub key: Option<PadKey>, // None = unreachable from the keyboard until remapped
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub pads: Vec<PadView>,
    pub volume: f32,
    pub bpm: u16,
    pub recorder: RecorderState,
    pub playback: PlaybackState,
    pub metronome: MetronomeState,
    pub recorded_hits: usize,
    pub can_play: bool,
    pub can_clear: bool,
    pub status: String, // "Recording...", "Playback complete", ...
}

impl DisplayState {
    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }
}

// the middle layer: owns every piece of kit state and routes input, timers
// and settings between the components. The tui only sends InputEvents in and
// gets Effects + a DisplayState back.
use std::time::Duration;

use crate::pipeline::mapping::{DRUM_KIT, KeyMapping, MappingEditor, PadKey};
use crate::pipeline::metronome::Metronome;
use crate::pipeline::persistence::KeyValueStore;
use crate::pipeline::player::{PlaybackState, PlayerEvent, SequencePlayer};
use crate::pipeline::recorder::{RecordedSequence, RecorderState, SequenceRecorder};
use crate::pipeline::settings::SettingsStore;
use crate::pipeline::trigger;
use crate::shared::{DisplayState, Effects, InputEvent, KitEvent, KitTask, PadView};
use crate::timing::{Clock, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    User,     // keyboard or pointer
    Playback, // re-issued by the player, never recorded
}

pub struct DrumKit {
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    settings: SettingsStore,
    editor: MappingEditor,
    recorder: SequenceRecorder,
    player: SequencePlayer,
    metronome: Metronome,
    timers: Timers<KitTask>,
    status: String,
}

impl DrumKit {
    /// Restores volume, BPM and key mapping from `store`.
    pub fn new(clock: Box<dyn Clock>, store: Box<dyn KeyValueStore>) -> Self {
        let settings = SettingsStore::load(store.as_ref());
        let editor = MappingEditor::load(store.as_ref());
        let metronome = Metronome::new(settings.bpm(), settings.volume());
        log::info!(
            "drum kit ready: volume {:.2}, {} bpm, {} keys bound",
            settings.volume(),
            settings.bpm(),
            editor.mapping().len()
        );
        Self {
            clock,
            store,
            settings,
            editor,
            recorder: SequenceRecorder::new(),
            player: SequencePlayer::new(),
            metronome,
            timers: Timers::new(),
            status: String::new(),
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Effects {
        match event {
            InputEvent::KeyPress(c) => self.trigger(PadKey::from_char(c)),
            InputEvent::PadClick(key) => self.trigger(key),
            InputEvent::StartRecording => self.arm_recording(),
            InputEvent::StopRecording => self.disarm_recording(),
            InputEvent::PlayRecording => self.play(),
            InputEvent::StopPlayback => self.stop_playback(),
            InputEvent::ClearRecording => self.clear_recording(),
            InputEvent::StartMetronome => self.start_metronome(),
            InputEvent::StopMetronome => self.stop_metronome(),
            InputEvent::SetVolume(v) => self.set_volume(v),
            InputEvent::SetBpm(b) => self.set_bpm(b),
            InputEvent::ApplyMapping(entries) => {
                self.apply_mapping(KeyMapping::from_entries(entries))
            }
            InputEvent::ResetMapping => self.reset_mapping(),
            InputEvent::Quit => self.shutdown(),
        }
    }

    /// Fire every timer that is due. Call once per frame.
    pub fn tick(&mut self) -> Effects {
        let now = self.clock.now();
        let mut fx = Effects::default();
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.task {
                KitTask::MetronomeTick => {
                    if let Some(cmd) = self.metronome.on_tick(fired.id) {
                        fx.audio.push(cmd);
                    }
                }
                KitTask::PlaybackStep | KitTask::PlaybackSettle => {
                    match self
                        .player
                        .on_timer(fired.id, fired.task, fired.due, &mut self.timers)
                    {
                        Some(PlayerEvent::Hit(key)) => {
                            fx.extend(self.trigger_from(key, Origin::Playback))
                        }
                        Some(PlayerEvent::Finished) => {
                            self.status = "Playback complete".to_string();
                            fx.events
                                .push(KitEvent::PlaybackStateChanged(PlaybackState::Idle));
                        }
                        None => {}
                    }
                }
            }
        }
        fx
    }

    /// Time until the next scheduled task, for shells that sleep between frames.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .next_due()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    // -- sound trigger --

    pub fn trigger(&mut self, key: PadKey) -> Effects {
        self.trigger_from(key, Origin::User)
    }

    fn trigger_from(&mut self, key: PadKey, origin: Origin) -> Effects {
        let mut fx = Effects::default();
        let Some(hit) = trigger::resolve(self.editor.mapping(), self.settings.volume(), key)
        else {
            return fx;
        };
        // same turn as the hit itself, so the take's order is the real order
        if origin == Origin::User {
            self.recorder.on_trigger(hit.key, self.clock.now());
        }
        fx.audio.push(hit.command());
        fx.events.push(KitEvent::PadHit {
            key: hit.key,
            sound: hit.sound,
        });
        fx
    }

    // -- recorder --

    pub fn arm_recording(&mut self) -> Effects {
        self.recorder.arm(self.clock.now());
        self.status = "Recording...".to_string();
        Effects {
            events: vec![KitEvent::RecordingStateChanged(RecorderState::Recording)],
            ..Effects::default()
        }
    }

    pub fn disarm_recording(&mut self) -> Effects {
        if !self.recorder.disarm() {
            return Effects::default();
        }
        self.status = "Recording stopped".to_string();
        Effects {
            events: vec![KitEvent::RecordingStateChanged(RecorderState::Idle)],
            ..Effects::default()
        }
    }

    pub fn clear_recording(&mut self) -> Effects {
        if !self.recorder.clear() {
            return Effects::default();
        }
        self.status = "Recording cleared".to_string();
        Effects {
            events: vec![KitEvent::RecordingCleared],
            ..Effects::default()
        }
    }

    pub fn recording(&self) -> &RecordedSequence {
        self.recorder.sequence()
    }

    // -- player --

    pub fn play(&mut self) -> Effects {
        let now = self.clock.now();
        let Some(first) = self
            .player
            .play(self.recorder.sequence(), now, &mut self.timers)
        else {
            return Effects::default();
        };
        self.status = "Playing...".to_string();
        let mut fx = Effects {
            events: vec![KitEvent::PlaybackStateChanged(PlaybackState::Playing)],
            ..Effects::default()
        };
        fx.extend(self.trigger_from(first, Origin::Playback));
        fx
    }

    pub fn stop_playback(&mut self) -> Effects {
        if !self.player.stop(&mut self.timers) {
            return Effects::default();
        }
        self.status = "Playback stopped".to_string();
        Effects {
            events: vec![KitEvent::PlaybackStateChanged(PlaybackState::Idle)],
            ..Effects::default()
        }
    }

    // -- metronome --

    pub fn start_metronome(&mut self) -> Effects {
        let now = self.clock.now();
        if !self.metronome.start(now, &mut self.timers) {
            return Effects::default();
        }
        Effects {
            events: vec![KitEvent::MetronomeStateChanged(self.metronome.state())],
            ..Effects::default()
        }
    }

    pub fn stop_metronome(&mut self) -> Effects {
        if !self.metronome.stop(&mut self.timers) {
            return Effects::default();
        }
        Effects {
            events: vec![KitEvent::MetronomeStateChanged(self.metronome.state())],
            ..Effects::default()
        }
    }

    // -- settings --

    pub fn set_volume(&mut self, volume: f32) -> Effects {
        let volume = self.settings.set_volume(volume, self.store.as_mut());
        self.metronome.set_volume(volume);
        Effects {
            events: vec![KitEvent::VolumeChanged(volume)],
            ..Effects::default()
        }
    }

    pub fn set_bpm(&mut self, bpm: u16) -> Effects {
        let bpm = self.settings.set_bpm(bpm, self.store.as_mut());
        let now = self.clock.now();
        self.metronome.set_bpm(bpm, now, &mut self.timers);
        Effects {
            events: vec![KitEvent::BpmChanged(bpm)],
            ..Effects::default()
        }
    }

    // -- key mapping --

    pub fn mapping(&self) -> &KeyMapping {
        self.editor.mapping()
    }

    pub fn apply_mapping(&mut self, candidate: KeyMapping) -> Effects {
        let mapping = self.editor.apply(candidate, self.store.as_mut()).clone();
        log::info!("key mapping applied: {} keys bound", mapping.len());
        Effects {
            events: vec![KitEvent::MappingChanged(mapping)],
            ..Effects::default()
        }
    }

    pub fn reset_mapping(&mut self) -> Effects {
        let mapping = self.editor.reset(self.store.as_mut()).clone();
        log::info!("key mapping reset to defaults");
        Effects {
            events: vec![KitEvent::MappingChanged(mapping)],
            ..Effects::default()
        }
    }

    /// Leave nothing scheduled behind.
    pub fn shutdown(&mut self) -> Effects {
        let mut fx = self.stop_playback();
        fx.extend(self.stop_metronome());
        fx.extend(self.disarm_recording());
        fx
    }

    pub fn display_state(&self) -> DisplayState {
        let mapping = self.editor.mapping();
        let pads = DRUM_KIT
            .iter()
            .map(|drum| PadView {
                sound: drum.sound.into(),
                name: drum.name,
                key: mapping.key_for(drum.sound),
            })
            .collect();
        let recorded = self.recorder.sequence().len();
        DisplayState {
            pads,
            volume: self.settings.volume(),
            bpm: self.settings.bpm(),
            recorder: self.recorder.state(),
            playback: self.player.state(),
            metronome: self.metronome.state(),
            recorded_hits: recorded,
            can_play: recorded > 0 && !self.player.is_playing(),
            can_clear: recorded > 0,
            status: self.status.clone(),
        }
    }
}

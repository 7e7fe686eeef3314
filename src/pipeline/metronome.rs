// steady click at the chosen tempo, independent of the pads and key mapping
use std::time::Duration;

use crate::audio_api::AudioCommand;
use crate::pipeline::settings::clamp_bpm;
use crate::shared::{CLICK_GAIN_RATIO, KitTask};
use crate::timing::{TimerId, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetronomeState {
    Stopped,
    Running,
}

/// ms between clicks: 60000 / bpm
pub fn beat_period(bpm: u16) -> Duration {
    Duration::from_micros(60_000_000 / u64::from(bpm.max(1)))
}

#[derive(Debug)]
pub struct Metronome {
    bpm: u16,
    click_gain: f32,
    ticker: Option<TimerId>, // Some while running
}

impl Metronome {
    pub fn new(bpm: u16, volume: f32) -> Self {
        Self {
            bpm: clamp_bpm(bpm),
            click_gain: volume * CLICK_GAIN_RATIO,
            ticker: None,
        }
    }

    pub fn state(&self) -> MetronomeState {
        match self.ticker {
            Some(_) => MetronomeState::Running,
            None => MetronomeState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    pub fn period(&self) -> Duration {
        beat_period(self.bpm)
    }

    pub fn click_gain(&self) -> f32 {
        self.click_gain
    }

    /// First click comes one period from now. Returns false if already running.
    pub fn start(&mut self, now: Duration, timers: &mut Timers<KitTask>) -> bool {
        if self.is_running() {
            return false;
        }
        self.ticker = Some(timers.every(now, self.period(), KitTask::MetronomeTick));
        log::debug!("metronome started at {} bpm", self.bpm);
        true
    }

    /// Cancels the pending click. Returns false if already stopped.
    pub fn stop(&mut self, timers: &mut Timers<KitTask>) -> bool {
        match self.ticker.take() {
            Some(id) => {
                timers.cancel(id);
                log::debug!("metronome stopped");
                true
            }
            None => false,
        }
    }

    /// While running the old schedule is swapped for a new one whose first
    /// click is one new period after `now`; the metronome stays Running.
    /// A tempo that clamps to the current one leaves the schedule alone.
    pub fn set_bpm(&mut self, bpm: u16, now: Duration, timers: &mut Timers<KitTask>) {
        let bpm = clamp_bpm(bpm);
        if bpm == self.bpm {
            return;
        }
        self.bpm = bpm;
        if let Some(old) = self.ticker.take() {
            timers.cancel(old);
            self.ticker = Some(timers.every(now, self.period(), KitTask::MetronomeTick));
            log::debug!("metronome retimed to {} bpm", self.bpm);
        }
    }

    /// Clicks always sit well under the pads.
    pub fn set_volume(&mut self, volume: f32) {
        self.click_gain = volume * CLICK_GAIN_RATIO;
    }

    pub fn on_tick(&self, id: TimerId) -> Option<AudioCommand> {
        if self.ticker != Some(id) {
            return None;
        }
        Some(AudioCommand::Click {
            gain: self.click_gain,
        })
    }
}

// replays a take with the gaps it was recorded with
//
// Hits aren't evenly spaced, so instead of a fixed-rate timer every step
// schedules the next one `next.timestamp - this.timestamp` after its own due
// time. After the last hit a settle delay runs out before playback counts
// as finished.
use std::time::Duration;

use crate::pipeline::mapping::PadKey;
use crate::pipeline::recorder::{RecordedEvent, RecordedSequence};
use crate::shared::{KitTask, SETTLE_DELAY_MS};
use crate::timing::{TimerId, Timers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Hit(PadKey),
    Finished,
}

#[derive(Debug)]
pub struct SequencePlayer {
    state: PlaybackState,
    // snapshot, so re-recording during playback doesn't pull the rug
    events: Vec<RecordedEvent>,
    cursor: usize,
    pending: Option<TimerId>,
}

impl SequencePlayer {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            events: Vec::new(),
            cursor: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Starts playback and returns the first hit, which plays immediately.
    /// `None` (and no state change) for an empty take or while already playing.
    pub fn play(
        &mut self,
        sequence: &RecordedSequence,
        now: Duration,
        timers: &mut Timers<KitTask>,
    ) -> Option<PadKey> {
        if sequence.is_empty() || self.is_playing() {
            return None;
        }
        self.events = sequence.events().to_vec();
        self.cursor = 0;
        self.state = PlaybackState::Playing;
        log::debug!("playback started: {} hits", self.events.len());
        Some(self.step(now, timers))
    }

    /// Feed a fired playback task back in. Tasks that don't belong to the
    /// current run are ignored.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        task: KitTask,
        due: Duration,
        timers: &mut Timers<KitTask>,
    ) -> Option<PlayerEvent> {
        if self.pending != Some(id) {
            return None;
        }
        self.pending = None;
        match task {
            KitTask::PlaybackStep => Some(PlayerEvent::Hit(self.step(due, timers))),
            KitTask::PlaybackSettle => {
                self.finish();
                log::debug!("playback complete");
                Some(PlayerEvent::Finished)
            }
            KitTask::MetronomeTick => None,
        }
    }

    /// Cancels whatever is scheduled. Returns false if nothing was playing.
    pub fn stop(&mut self, timers: &mut Timers<KitTask>) -> bool {
        if !self.is_playing() {
            return false;
        }
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        self.finish();
        log::debug!("playback stopped");
        true
    }

    fn step(&mut self, at: Duration, timers: &mut Timers<KitTask>) -> PadKey {
        let hit = self.events[self.cursor];
        self.cursor += 1;
        let id = match self.events.get(self.cursor) {
            Some(next) => {
                let gap = next.timestamp_ms.saturating_sub(hit.timestamp_ms);
                timers.once(at, Duration::from_millis(gap), KitTask::PlaybackStep)
            }
            None => timers.once(
                at,
                Duration::from_millis(SETTLE_DELAY_MS),
                KitTask::PlaybackSettle,
            ),
        };
        self.pending = Some(id);
        hit.key
    }

    fn finish(&mut self) {
        self.state = PlaybackState::Idle;
        self.events.clear();
        self.cursor = 0;
    }
}

impl Default for SequencePlayer {
    fn default() -> Self {
        Self::new()
    }
}

// captures pad hits with their offset from the moment recording was armed
use std::time::Duration;

use crate::pipeline::mapping::PadKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedEvent {
    pub key: PadKey,
    pub timestamp_ms: u64, // since the take started
}

/// Events in the order they were hit; timestamps never decrease.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordedSequence {
    events: Vec<RecordedEvent>,
}

impl RecordedSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(mut events: Vec<RecordedEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp_ms); // stable, keeps hit order on ties
        Self { events }
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        self.events.last().map_or(0, |e| e.timestamp_ms)
    }

    fn push(&mut self, event: RecordedEvent) {
        self.events.push(event);
    }

    fn clear(&mut self) {
        self.events.clear();
    }
}

#[derive(Debug)]
pub struct SequenceRecorder {
    state: RecorderState,
    started_at: Duration,
    sequence: RecordedSequence,
}

impl SequenceRecorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            started_at: Duration::ZERO,
            sequence: RecordedSequence::new(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn sequence(&self) -> &RecordedSequence {
        &self.sequence
    }

    /// Starts a fresh take; whatever was recorded before is discarded.
    pub fn arm(&mut self, now: Duration) {
        self.state = RecorderState::Recording;
        self.sequence.clear();
        self.started_at = now;
        log::debug!("recorder armed at {now:?}");
    }

    /// Returns false if the recorder was already idle.
    pub fn disarm(&mut self) -> bool {
        if self.state == RecorderState::Idle {
            return false;
        }
        self.state = RecorderState::Idle;
        log::debug!("recorder disarmed with {} hits", self.sequence.len());
        true
    }

    /// Appends the hit if armed. Returns whether it was recorded.
    pub fn on_trigger(&mut self, key: PadKey, now: Duration) -> bool {
        if self.state != RecorderState::Recording {
            return false;
        }
        let elapsed = now.saturating_sub(self.started_at);
        // a clock that stalls mid-take must not produce out-of-order stamps
        let floor = self.sequence.duration_ms();
        let timestamp_ms = (elapsed.as_millis() as u64).max(floor);
        self.sequence.push(RecordedEvent { key, timestamp_ms });
        true
    }

    /// Returns false if there was nothing to clear.
    pub fn clear(&mut self) -> bool {
        if self.sequence.is_empty() {
            return false;
        }
        self.sequence.clear();
        true
    }
}

impl Default for SequenceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

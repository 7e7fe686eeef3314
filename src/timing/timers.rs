use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>, // Some = repeating
    task: T,
}

/// A task that came due, with the time it was scheduled for (not the time
/// it was polled), so chained schedules can be computed without drift.
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub due: Duration,
    pub task: T,
}

/// Cancellable delayed and repeating tasks, driven by polling.
///
/// Nothing here blocks or spawns: the owner calls [`Timers::pop_due`] with
/// the current time (once per frame in the shell) and reacts to each task.
#[derive(Debug)]
pub struct Timers<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Timers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Run `task` once, `delay` after `now`.
    pub fn once(&mut self, now: Duration, delay: Duration, task: T) -> TimerId {
        self.once_at(now + delay, task)
    }

    /// Run `task` once at the absolute time `due`.
    pub fn once_at(&mut self, due: Duration, task: T) -> TimerId {
        self.push(due, None, task)
    }

    /// Run `task` every `period`, first one period after `now`.
    pub fn every(&mut self, now: Duration, period: Duration, task: T) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(now + period, Some(period), task)
    }

    /// Returns false if the task already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() < before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Take the earliest task due at or before `now`. Ties go to the task
    /// scheduled first. Repeating tasks are re-armed one period after their
    /// due time; whole periods already in the past are skipped.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<T>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.id.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        let fired = Fired {
            id: entry.id,
            due: entry.due,
            task: entry.task.clone(),
        };

        match entry.period {
            Some(period) => {
                let mut next = entry.due + period;
                while next <= now {
                    next += period;
                }
                entry.due = next;
            }
            None => {
                self.entries.remove(idx);
            }
        }

        Some(fired)
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            period,
            task,
        });
        id
    }
}

impl<T: Clone> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

// time sources and the cancellable task queue everything time-based runs on
mod clock;
mod timers;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use timers::{Fired, TimerId, Timers};

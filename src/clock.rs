//! Time sources and the timer queue behind the simulated run.
//!
//! Nothing in the lifecycle reads the system time directly. The driver asks
//! a [`Clock`] for the current moment and a [`TimerQueue`] for what is due,
//! which lets tests step time by hand with [`ManualClock`].

use std::cell::Cell;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Wall-clock milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> i64;
}

/// The real clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn epoch_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
    epoch_base: i64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the wall clock at the given epoch milliseconds.
    pub fn starting_at(epoch_millis: i64) -> Self {
        Self {
            elapsed: Cell::new(Duration::ZERO),
            epoch_base: epoch_millis,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    fn epoch_millis(&self) -> i64 {
        self.epoch_base + self.elapsed.get().as_millis() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer produces when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ProgressTick,
    ShowHistory,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    event: TimerEvent,
    deadline: Duration,
    interval: Option<Duration>,
}

/// Pending one-shot and repeating timers, ordered by deadline when fired.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, event: TimerEvent, now: Duration, delay: Duration) -> TimerId {
        self.push(event, now + delay, None)
    }

    /// Schedule a timer that fires every `interval`, first at `now + interval`.
    ///
    /// A zero interval is clamped to one millisecond so a repeating timer
    /// can never fire unboundedly within a single instant.
    pub fn schedule_repeating(
        &mut self,
        event: TimerEvent,
        now: Duration,
        interval: Duration,
    ) -> TimerId {
        let interval = interval.max(Duration::from_millis(1));
        self.push(event, now + interval, Some(interval))
    }

    fn push(&mut self, event: TimerEvent, deadline: Duration, interval: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            event,
            deadline,
            interval,
        });
        id
    }

    /// Remove a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Pop the earliest timer due at `now`.
    ///
    /// One-shot timers are removed; repeating timers are re-armed one
    /// interval after their previous deadline, so a caller that falls behind
    /// catches up one firing per call.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, TimerEvent)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id.0))
            .map(|(i, _)| i)?;

        let timer = &self.timers[idx];
        let fired = (timer.id, timer.event);
        let interval = timer.interval;
        match interval {
            Some(interval) => self.timers[idx].deadline += interval,
            None => {
                self.timers.remove(idx);
            }
        }
        Some(fired)
    }
}

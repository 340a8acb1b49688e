//! Executes dashboard effects against a clock and a timer queue.

use crate::clock::{Clock, TimerEvent, TimerId, TimerQueue};
use crate::lifecycle::{Action, Dashboard, Effect, Moment};
use crate::ticker::Timing;
use std::time::Duration;

/// Owns the [`Dashboard`] and the timers its effects ask for.
///
/// Hosts call [`Driver::dispatch`] for user intents and [`Driver::advance`]
/// whenever time may have passed; due timers are turned back into actions.
pub struct Driver<C: Clock> {
    dashboard: Dashboard,
    clock: C,
    timing: Timing,
    timers: TimerQueue,
    ticker: Option<TimerId>,
    pending_history: Option<TimerId>,
}

impl<C: Clock> Driver<C> {
    pub fn new(dashboard: Dashboard, clock: C, timing: Timing) -> Self {
        Self {
            dashboard,
            clock,
            timing,
            timers: TimerQueue::new(),
            ticker: None,
            pending_history: None,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn now(&self) -> Moment {
        Moment::new(self.clock.elapsed(), self.clock.epoch_millis())
    }

    pub fn has_active_ticker(&self) -> bool {
        self.ticker.is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn has_pending_history(&self) -> bool {
        self.pending_history
            .is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn dispatch(&mut self, action: Action) {
        let now = self.now();
        let effects = self.dashboard.dispatch(action, now);
        for effect in effects {
            self.apply(effect, now.elapsed);
        }
    }

    /// Fire every timer due at the current clock reading.
    ///
    /// Returns the number of timer events delivered.
    pub fn advance(&mut self) -> usize {
        let mut fired = 0;
        loop {
            let now = self.now();
            let Some((id, event)) = self.timers.pop_due(now.elapsed) else {
                break;
            };
            fired += 1;

            let action = match event {
                TimerEvent::ProgressTick => Action::Tick,
                TimerEvent::ShowHistory => {
                    if self.pending_history == Some(id) {
                        self.pending_history = None;
                    }
                    Action::ShowHistory
                }
            };

            let effects = self.dashboard.dispatch(action, now);
            for effect in effects {
                self.apply(effect, now.elapsed);
            }
        }
        fired
    }

    /// Time left until the next timer is due, if any is pending.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.clock.elapsed()))
    }

    /// Cancel every outstanding timer.
    pub fn shutdown(&mut self) {
        if !self.timers.is_empty() {
            tracing::debug!(pending = self.timers.len(), "Cancelling timers");
        }
        self.timers.clear();
        self.ticker = None;
        self.pending_history = None;
    }

    fn apply(&mut self, effect: Effect, now: Duration) {
        match effect {
            Effect::StartTicker => {
                if let Some(previous) = self.ticker.take() {
                    self.timers.cancel(previous);
                }
                let id = self.timers.schedule_repeating(
                    TimerEvent::ProgressTick,
                    now,
                    self.timing.tick_interval,
                );
                self.ticker = Some(id);
            }
            Effect::CancelTicker => {
                if let Some(id) = self.ticker.take() {
                    self.timers.cancel(id);
                    tracing::debug!("Ticker stopped");
                }
            }
            Effect::ScheduleHistory => {
                if let Some(previous) = self.pending_history.take() {
                    self.timers.cancel(previous);
                }
                let id = self.timers.schedule_once(
                    TimerEvent::ShowHistory,
                    now,
                    self.timing.history_delay,
                );
                self.pending_history = Some(id);
            }
            Effect::CancelHistory => {
                if let Some(id) = self.pending_history.take() {
                    self.timers.cancel(id);
                }
            }
        }
    }
}

//! Simulated progress for a triggered run.

use crate::model::{RunRecord, RunStatus};
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_TICK_STEP: u8 = 10;
/// Delay between closing the run form and mounting the history view.
pub const DEFAULT_HISTORY_DELAY: Duration = Duration::from_millis(150);

/// Timing knobs for the simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub tick_interval: Duration,
    pub tick_step: u8,
    pub history_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            tick_step: DEFAULT_TICK_STEP,
            history_delay: DEFAULT_HISTORY_DELAY,
        }
    }
}

impl Timing {
    /// Number of ticks a run needs to go from 0 to 100.
    pub fn ticks_to_complete(&self) -> u32 {
        let step = u32::from(self.tick_step.max(1));
        100u32.div_ceil(step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Progress moved to the contained percentage.
    Advanced(u8),
    /// This tick took the run to 100.
    Completed,
    /// The run had already completed; nothing changed.
    Idle,
}

impl TickOutcome {
    /// Whether the ticker driving this run should stop.
    pub fn is_final(&self) -> bool {
        !matches!(self, TickOutcome::Advanced(_))
    }
}

/// Apply one tick to a run.
///
/// Progress never exceeds 100 and never decreases; once the run is
/// completed further ticks are no-ops.
pub fn tick(run: &mut RunRecord, step: u8, now: Duration) -> TickOutcome {
    if run.is_completed() {
        return TickOutcome::Idle;
    }

    let next = run.progress.saturating_add(step.max(1)).min(100);
    run.progress = next;

    if next == 100 {
        run.status = RunStatus::Completed;
        run.finished_at = Some(now);
        TickOutcome::Completed
    } else {
        TickOutcome::Advanced(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Environment, RunRequest};
    use chrono::NaiveDateTime;

    fn new_run() -> RunRecord {
        RunRecord::from_request(
            RunRequest {
                reference_id: String::new(),
                environment: Environment::Dev,
                execution_date: None,
                project_id: "QA-2023-045".to_string(),
            },
            "RUN-1".to_string(),
            NaiveDateTime::default(),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_ten_ticks_complete_the_run() {
        let mut run = new_run();
        for i in 1..=9u8 {
            assert_eq!(tick(&mut run, 10, Duration::ZERO), TickOutcome::Advanced(i * 10));
        }
        assert_eq!(tick(&mut run, 10, Duration::from_secs(5)), TickOutcome::Completed);
        assert_eq!(run.progress, 100);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.finished_at, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_eleventh_tick_is_a_noop() {
        let mut run = new_run();
        for _ in 0..10 {
            tick(&mut run, 10, Duration::from_secs(5));
        }
        let before = run.clone();
        assert_eq!(tick(&mut run, 10, Duration::from_secs(6)), TickOutcome::Idle);
        assert_eq!(run, before);
    }

    #[test]
    fn test_uneven_step_clamps_at_one_hundred() {
        let mut run = new_run();
        let mut outcomes = Vec::new();
        while run.status == RunStatus::Running {
            outcomes.push(tick(&mut run, 30, Duration::ZERO));
        }
        assert_eq!(
            outcomes,
            [
                TickOutcome::Advanced(30),
                TickOutcome::Advanced(60),
                TickOutcome::Advanced(90),
                TickOutcome::Completed
            ]
        );
        assert_eq!(run.progress, 100);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut run = new_run();
        let mut last = run.progress;
        for _ in 0..20 {
            tick(&mut run, 7, Duration::ZERO);
            assert!(run.progress >= last);
            assert!(run.progress <= 100);
            last = run.progress;
        }
    }

    #[test]
    fn test_zero_step_still_makes_progress() {
        let mut run = new_run();
        assert_eq!(tick(&mut run, 0, Duration::ZERO), TickOutcome::Advanced(1));
    }

    #[test]
    fn test_ticks_to_complete() {
        assert_eq!(Timing::default().ticks_to_complete(), 10);
        let timing = Timing {
            tick_step: 30,
            ..Timing::default()
        };
        assert_eq!(timing.ticks_to_complete(), 4);
    }

    #[test]
    fn test_outcome_is_final() {
        assert!(!TickOutcome::Advanced(10).is_final());
        assert!(TickOutcome::Completed.is_final());
        assert!(TickOutcome::Idle.is_final());
    }
}

//! Run command handler.
//!
//! Triggers a simulated run without the dashboard. The same reducer and
//! timers drive it; progress goes to an indicatif bar and Ctrl+C cancels
//! the ticker through the `Dismiss` path.

use std::thread;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::driver::Driver;
use crate::error::{QaRunError, Result};
use crate::fixtures::DataProvider;
use crate::lifecycle::{Action, RunForm};
use crate::model::{Environment, RunRecord};
use crate::output::{print_cancelled, print_history, print_run_summary, print_warning};
use crate::progress::RunProgressBar;
use crate::signal::SignalHandler;

use super::build_dashboard;

/// Longest single sleep between checks of the cancel flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What `qarun run` submits through the run form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub project_id: String,
    pub reference_id: String,
    /// Falls back to the configured default environment.
    pub environment: Option<Environment>,
    /// Raw `YYYY-MM-DD` text; malformed dates are dropped with a warning.
    pub date: Option<String>,
    /// Hide the progress bar.
    pub quiet: bool,
}

/// How a driven run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunRecord),
    Cancelled(RunRecord),
}

impl RunOutcome {
    pub fn record(&self) -> &RunRecord {
        match self {
            RunOutcome::Completed(run) | RunOutcome::Cancelled(run) => run,
        }
    }
}

/// Trigger a run for one project and follow it to completion.
pub fn run_command(
    provider: &dyn DataProvider,
    config: &Config,
    options: &RunOptions,
) -> Result<()> {
    let dashboard = build_dashboard(provider, config);
    if dashboard.catalog().get(&options.project_id).is_none() {
        return Err(QaRunError::UnknownProject(options.project_id.clone()));
    }

    let form = RunForm {
        reference_id: options.reference_id.clone(),
        environment: options.environment.unwrap_or(config.default_environment),
        execution_date: options.date.clone().unwrap_or_default(),
        ..RunForm::default()
    };
    if options.date.is_some() && form.parsed_date().is_none() {
        print_warning(&format!(
            "ignoring execution date '{}' (expected YYYY-MM-DD)",
            form.execution_date
        ));
    }

    let mut driver = Driver::new(dashboard, SystemClock::new(), config.timing());
    driver.dispatch(Action::OpenRun(options.project_id.clone()));
    driver.dispatch(Action::FillRunForm(form));
    driver.dispatch(Action::SubmitRun);

    let run = latest_run(&driver)?;

    let signal = SignalHandler::new()?;
    let bar = if options.quiet {
        RunProgressBar::hidden(&run.run_id, &run.project_id)
    } else {
        RunProgressBar::new(&run.run_id, &run.project_id)
    };

    let outcome = drive_run(
        &mut driver,
        &bar,
        || signal.is_cancel_requested(),
        |_, pause| thread::sleep(pause),
    )?;
    driver.shutdown();

    match outcome {
        RunOutcome::Completed(run) => {
            bar.finish_success(run.elapsed().unwrap_or_default());
            println!();
            print_run_summary(&run);
            println!();
            print_history(&run.project_id, &driver.dashboard().history_rows_for(&run.project_id));
        }
        RunOutcome::Cancelled(run) => {
            bar.finish_cancelled(run.progress);
            print_cancelled(&run.run_id);
        }
    }

    Ok(())
}

/// Pump the driver's timers until the latest run completes or is cancelled.
///
/// `wait` is handed the driver's clock and the pause until the next timer;
/// real runs sleep, tests advance a [`crate::clock::ManualClock`].
pub fn drive_run<C: Clock>(
    driver: &mut Driver<C>,
    bar: &RunProgressBar,
    is_cancelled: impl Fn() -> bool,
    mut wait: impl FnMut(&C, Duration),
) -> Result<RunOutcome> {
    loop {
        let fired = driver.advance();
        let run = latest_run(driver)?;
        bar.set_progress(run.progress);
        if fired > 0 {
            tracing::trace!(run = %run.run_id, progress = run.progress, "Timers fired");
        }

        if run.is_completed() {
            return Ok(RunOutcome::Completed(run));
        }

        if is_cancelled() || !driver.has_active_ticker() {
            tracing::info!(run = %run.run_id, progress = run.progress, "Run cancelled");
            driver.dispatch(Action::Dismiss);
            return Ok(RunOutcome::Cancelled(latest_run(driver)?));
        }

        let pause = driver
            .time_until_next_timer()
            .unwrap_or(POLL_INTERVAL)
            .min(POLL_INTERVAL);
        wait(driver.clock(), pause);
    }
}

fn latest_run<C: Clock>(driver: &Driver<C>) -> Result<RunRecord> {
    driver
        .dashboard()
        .latest_run()
        .cloned()
        .ok_or(QaRunError::NoActiveRun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::fixtures::SeedData;
    use crate::lifecycle::Phase;
    use crate::model::RunStatus;
    use crate::ticker::Timing;
    use std::cell::Cell;

    fn submitted_driver() -> Driver<ManualClock> {
        let config = Config::default();
        let dashboard = build_dashboard(&SeedData, &config);
        let mut driver = Driver::new(dashboard, ManualClock::starting_at(1_765_000_000_000), Timing::default());
        driver.dispatch(Action::OpenRun("QA-2024-099".to_string()));
        driver.dispatch(Action::SubmitRun);
        driver
    }

    #[test]
    fn test_drive_run_completes_after_five_seconds() {
        let mut driver = submitted_driver();
        let bar = RunProgressBar::hidden("RUN-1", "QA-2024-099");

        let outcome = drive_run(&mut driver, &bar, || false, |clock, pause| clock.advance(pause)).unwrap();

        let RunOutcome::Completed(run) = outcome else {
            panic!("expected completion, got {:?}", outcome);
        };
        assert_eq!(run.progress, 100);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.elapsed(), Some(Duration::from_secs(5)));
        assert_eq!(bar.position(), 100);
        assert_eq!(driver.dashboard().phase(), Phase::Viewing);
    }

    #[test]
    fn test_drive_run_cancel_stops_ticker() {
        let mut driver = submitted_driver();
        let bar = RunProgressBar::hidden("RUN-1", "QA-2024-099");
        let checks = Cell::new(0u32);

        let outcome = drive_run(
            &mut driver,
            &bar,
            || {
                checks.set(checks.get() + 1);
                checks.get() > 12
            },
            |clock, pause| clock.advance(pause),
        )
        .unwrap();

        let RunOutcome::Cancelled(run) = outcome else {
            panic!("expected cancellation, got {:?}", outcome);
        };
        assert!(run.progress < 100);
        assert_eq!(run.status, RunStatus::Running);
        assert!(!driver.has_active_ticker());
        assert_eq!(driver.dashboard().phase(), Phase::Idle);

        // A frozen run does not move once cancelled.
        driver.clock().advance(Duration::from_secs(10));
        driver.advance();
        assert_eq!(driver.dashboard().latest_run().map(|r| r.progress), Some(run.progress));
    }

    #[test]
    fn test_drive_run_without_trigger_is_error() {
        let config = Config::default();
        let dashboard = build_dashboard(&SeedData, &config);
        let mut driver = Driver::new(dashboard, ManualClock::new(), Timing::default());
        let bar = RunProgressBar::hidden("RUN-1", "QA-2024-099");

        let err = drive_run(&mut driver, &bar, || false, |clock, pause| clock.advance(pause)).unwrap_err();
        assert!(matches!(err, QaRunError::NoActiveRun));
    }

    #[test]
    fn test_run_command_unknown_project() {
        let options = RunOptions {
            project_id: "QA-0000-000".to_string(),
            quiet: true,
            ..RunOptions::default()
        };
        let err = run_command(&SeedData, &Config::default(), &options).unwrap_err();
        assert!(matches!(err, QaRunError::UnknownProject(_)));
    }

    #[test]
    fn test_outcome_record() {
        let driver = submitted_driver();
        let run = driver.dashboard().latest_run().cloned().unwrap();
        assert_eq!(RunOutcome::Cancelled(run.clone()).record(), &run);
    }
}

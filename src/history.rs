//! Execution history and result detail.

use crate::model::{Checkpoint, ResultRecord, ResultStatus, RunRecord};
use std::time::Duration;

/// Result id given to the row synthesized from the latest triggered run.
pub const PLACEHOLDER_RESULT_ID: &str = "RES-NEW";

/// Shown as duration while a run has not finished.
pub const NO_DURATION: &str = "—";

/// Format a duration as a human-readable string (e.g., "5m 32s", "1h 5m").
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// History row for a triggered run.
///
/// The row reads `NR` with no duration while the run is in progress and
/// `Pass` with its elapsed time once the ticker has finished.
pub fn synthetic_row(run: &RunRecord) -> ResultRecord {
    let executed_at = run
        .execution_date
        .map(|date| date.and_time(run.triggered_at.time()))
        .unwrap_or(run.triggered_at);

    let (status, duration) = match run.elapsed() {
        Some(elapsed) => (ResultStatus::Pass, format_duration(elapsed)),
        None => (ResultStatus::NotRated, NO_DURATION.to_string()),
    };

    ResultRecord {
        result_id: PLACEHOLDER_RESULT_ID.to_string(),
        executed_at,
        project_id: run.project_id.clone(),
        status,
        duration,
    }
}

/// Expanded view of one history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDetail {
    pub record: ResultRecord,
    pub checkpoints: Vec<Checkpoint>,
}

/// Seed history rows and the checkpoint constants shown in every detail.
#[derive(Debug, Clone, Default)]
pub struct History {
    seed: Vec<ResultRecord>,
    checkpoints: Vec<Checkpoint>,
}

impl History {
    pub fn new(seed: Vec<ResultRecord>, checkpoints: Vec<Checkpoint>) -> Self {
        Self { seed, checkpoints }
    }

    /// Rows for a project's history view, newest first.
    ///
    /// Seed rows are stamped with `project_id`. The latest run is prepended
    /// only when it was triggered for the same project.
    pub fn rows(&self, project_id: &str, latest: Option<&RunRecord>) -> Vec<ResultRecord> {
        let synthetic = latest
            .filter(|run| run.project_id == project_id)
            .map(synthetic_row);

        synthetic
            .into_iter()
            .chain(self.seed.iter().map(|row| ResultRecord {
                project_id: project_id.to_string(),
                ..row.clone()
            }))
            .collect()
    }

    pub fn detail(&self, record: ResultRecord) -> ResultDetail {
        ResultDetail {
            record,
            checkpoints: self.checkpoints.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DataProvider, SeedData};
    use crate::model::{Environment, RunRequest, RunStatus};
    use chrono::NaiveDate;

    fn seed_history() -> History {
        History::new(SeedData.history(), SeedData.checkpoints())
    }

    fn run_for(project_id: &str) -> RunRecord {
        let triggered_at = NaiveDate::from_ymd_opt(2025, 12, 20)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        RunRecord::from_request(
            RunRequest {
                reference_id: "REF-7".to_string(),
                environment: Environment::Qa,
                execution_date: None,
                project_id: project_id.to_string(),
            },
            "RUN-1766222100000".to_string(),
            triggered_at,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(332)), "5m 32s");
        assert_eq!(format_duration(Duration::from_secs(3900)), "1h 5m");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn test_rows_without_run_are_the_four_seed_rows() {
        let rows = seed_history().rows("QA-2023-045", None);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.project_id == "QA-2023-045"));
        assert_eq!(rows[0].result_id, "RES-1025-A");
    }

    #[test]
    fn test_rows_with_run_prepend_synthetic_row() {
        let run = run_for("QA-2023-045");
        let rows = seed_history().rows("QA-2023-045", Some(&run));
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].result_id, PLACEHOLDER_RESULT_ID);
        assert_eq!(rows[0].project_id, "QA-2023-045");
        assert_eq!(rows[1].result_id, "RES-1025-A");
    }

    #[test]
    fn test_run_for_other_project_is_not_prepended() {
        let run = run_for("QA-2024-012");
        let rows = seed_history().rows("QA-2023-045", Some(&run));
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_synthetic_row_in_progress() {
        let run = run_for("QA-2023-045");
        let row = synthetic_row(&run);
        assert_eq!(row.status, ResultStatus::NotRated);
        assert_eq!(row.duration, NO_DURATION);
        assert_eq!(row.display_date(), "2025-12-20 09:15 AM");
    }

    #[test]
    fn test_synthetic_row_completed() {
        let mut run = run_for("QA-2023-045");
        run.status = RunStatus::Completed;
        run.progress = 100;
        run.finished_at = Some(Duration::from_secs(6));
        let row = synthetic_row(&run);
        assert_eq!(row.status, ResultStatus::Pass);
        assert_eq!(row.duration, "5s");
    }

    #[test]
    fn test_synthetic_row_uses_execution_date_when_given() {
        let mut run = run_for("QA-2023-045");
        run.execution_date = NaiveDate::from_ymd_opt(2026, 1, 5);
        let row = synthetic_row(&run);
        assert_eq!(row.display_date(), "2026-01-05 09:15 AM");
    }

    #[test]
    fn test_detail_carries_four_checkpoints() {
        let history = seed_history();
        let row = history.rows("QA-2023-045", None).remove(1);
        let detail = history.detail(row.clone());
        assert_eq!(detail.record, row);
        assert_eq!(detail.checkpoints.len(), 4);
        assert!(detail.checkpoints.iter().all(|cp| cp.score <= 100));
    }

    #[test]
    fn test_rows_do_not_mutate_seed() {
        let history = seed_history();
        let _ = history.rows("QA-2023-045", None);
        let rows = history.rows("QA-2024-099", None);
        assert!(rows.iter().all(|r| r.project_id == "QA-2024-099"));
    }
}

//! Domain records shared by the catalog, the run lifecycle and the history view.
//!
//! Projects, seed history rows and checkpoints are read-only once loaded.
//! The only mutable record is the [`RunRecord`] produced by a triggered run,
//! and it is only ever advanced by the progress ticker.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    Draft,
    Archived,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Draft => "Draft",
            ProjectStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A catalog entry representing a compliance/QA initiative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub status: ProjectStatus,
    pub department: String,
    pub domain: String,
    pub description: String,
    pub last_run: NaiveDate,
}

/// Target environment for a triggered run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    #[default]
    Dev,
    Qa,
    Uat,
    Prod,
}

impl Environment {
    pub fn all() -> &'static [Environment] {
        &[
            Environment::Dev,
            Environment::Qa,
            Environment::Uat,
            Environment::Prod,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Qa => "QA",
            Environment::Uat => "UAT",
            Environment::Prod => "PROD",
        }
    }

    /// Next environment in selector order, wrapping around.
    pub fn next(&self) -> Environment {
        let all = Environment::all();
        let idx = all.iter().position(|e| e == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Previous environment in selector order, wrapping around.
    pub fn prev(&self) -> Environment {
        let all = Environment::all();
        let idx = all.iter().position(|e| e == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::all()
            .iter()
            .copied()
            .find(|e| e.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown environment '{}' (expected DEV, QA, UAT or PROD)", s))
    }
}

/// What the user submitted from the run form. Every field may be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub reference_id: String,
    pub environment: Environment,
    pub execution_date: Option<NaiveDate>,
    pub project_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Running => "Running",
            RunStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Synthetic result of a triggered run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub run_id: String,
    pub project_id: String,
    pub reference_id: String,
    pub environment: Environment,
    pub execution_date: Option<NaiveDate>,
    pub status: RunStatus,
    /// Percentage complete, always within 0..=100.
    pub progress: u8,
    /// Wall-clock time the run was triggered.
    pub triggered_at: NaiveDateTime,
    /// Monotonic clock reading at trigger time.
    pub started_at: Duration,
    pub finished_at: Option<Duration>,
}

impl RunRecord {
    pub fn from_request(
        request: RunRequest,
        run_id: String,
        triggered_at: NaiveDateTime,
        started_at: Duration,
    ) -> Self {
        Self {
            run_id,
            project_id: request.project_id,
            reference_id: request.reference_id,
            environment: request.environment,
            execution_date: request.execution_date,
            status: RunStatus::Running,
            progress: 0,
            triggered_at,
            started_at,
            finished_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Time between trigger and completion, if the run has completed.
    pub fn elapsed(&self) -> Option<Duration> {
        self.finished_at
            .map(|finished| finished.saturating_sub(self.started_at))
    }
}

/// Outcome of a historical run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Pass,
    Fail,
    Partial,
    /// Not rated: the run produced no verdict (yet).
    #[serde(rename = "NR")]
    NotRated,
}

impl ResultStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ResultStatus::Pass => "Pass",
            ResultStatus::Fail => "Fail",
            ResultStatus::Partial => "Partial",
            ResultStatus::NotRated => "NR",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A row in the execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub result_id: String,
    pub executed_at: NaiveDateTime,
    pub project_id: String,
    pub status: ResultStatus,
    pub duration: String,
}

impl ResultRecord {
    /// Execution date in the history table format, e.g. `2025-12-12 10:32 AM`.
    pub fn display_date(&self) -> String {
        self.executed_at.format("%Y-%m-%d %I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckpointOutcome {
    Pass,
    Fail,
}

impl CheckpointOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CheckpointOutcome::Pass => "PASS",
            CheckpointOutcome::Fail => "FAIL",
        }
    }
}

/// One illustrative validation category in the result detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    pub outcome: CheckpointOutcome,
    /// Confidence score, 0..=100.
    pub score: u8,
}

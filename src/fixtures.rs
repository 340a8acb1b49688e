//! Seed data for the dashboard.
//!
//! Everything the dashboard shows comes through [`DataProvider`], so the
//! built-in seed can be swapped for a JSON fixture file (or a real backend)
//! without touching the filter or lifecycle logic.

use crate::error::{QaRunError, Result};
use crate::model::{
    Checkpoint, CheckpointOutcome, Project, ProjectStatus, ResultRecord, ResultStatus,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Source of the projects, history rows and checkpoints the dashboard displays.
pub trait DataProvider {
    fn projects(&self) -> Vec<Project>;
    fn history(&self) -> Vec<ResultRecord>;
    fn checkpoints(&self) -> Vec<Checkpoint>;
}

/// The built-in seed data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedData;

impl DataProvider for SeedData {
    fn projects(&self) -> Vec<Project> {
        vec![
            project(
                "QA-2023-045",
                ProjectStatus::Active,
                "Risk",
                "Regulatory Compliance",
                "Review of trade reporting controls for Q3. Check whether all trades filed meet thresholds and reporting timelines.",
                (2025, 11, 20),
            ),
            project(
                "QA-2024-012",
                ProjectStatus::Draft,
                "Finance",
                "Financial Reporting",
                "Validation of month-end P&L reconciliations and mapping to GL accounts. Draft checklist awaiting SME feedback.",
                (2025, 10, 2),
            ),
            project(
                "QA-2022-100",
                ProjectStatus::Archived,
                "Operations",
                "Trade Processing",
                "Legacy - automation checks for failed settlements. Archived after migration to new platform.",
                (2023, 3, 12),
            ),
            project(
                "QA-2025-001",
                ProjectStatus::Active,
                "Compliance",
                "Customer Due Diligence",
                "KYC checklist verification across high-risk onboarding flows, verifying ID documents against risk matrix.",
                (2025, 12, 1),
            ),
            project(
                "QA-2024-099",
                ProjectStatus::Active,
                "Risk",
                "Market Risk",
                "Backtest calculations for VaR models and sensitivity checks compared to P&L attribution.",
                (2025, 9, 15),
            ),
        ]
    }

    fn history(&self) -> Vec<ResultRecord> {
        vec![
            result("RES-1025-A", (2025, 12, 12, 10, 32), ResultStatus::Pass, "3m 12s"),
            result("RES-1023-B", (2025, 12, 5, 16, 6), ResultStatus::Fail, "2m 40s"),
            result("RES-1008-C", (2025, 11, 28, 13, 54), ResultStatus::Partial, "4m 01s"),
            result("RES-1002-D", (2025, 11, 20, 11, 15), ResultStatus::NotRated, "—"),
        ]
    }

    fn checkpoints(&self) -> Vec<Checkpoint> {
        vec![
            checkpoint("Schema Validation", CheckpointOutcome::Pass, 98),
            checkpoint("Data Consistency", CheckpointOutcome::Pass, 94),
            checkpoint("Regulatory Rules", CheckpointOutcome::Fail, 61),
            checkpoint("Critical Field Checks", CheckpointOutcome::Fail, 55),
        ]
    }
}

fn project(
    id: &str,
    status: ProjectStatus,
    department: &str,
    domain: &str,
    description: &str,
    (y, m, d): (i32, u32, u32),
) -> Project {
    Project {
        id: id.to_string(),
        status,
        department: department.to_string(),
        domain: domain.to_string(),
        description: description.to_string(),
        last_run: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    }
}

/// Seed rows carry no project id; history re-stamps them with the viewed project.
fn result(
    id: &str,
    (y, mo, d, h, mi): (i32, u32, u32, u32, u32),
    status: ResultStatus,
    duration: &str,
) -> ResultRecord {
    let executed_at = NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, 0))
        .unwrap_or_default();
    ResultRecord {
        result_id: id.to_string(),
        executed_at,
        project_id: String::new(),
        status,
        duration: duration.to_string(),
    }
}

fn checkpoint(name: &str, outcome: CheckpointOutcome, score: u8) -> Checkpoint {
    Checkpoint {
        name: name.to_string(),
        outcome,
        score,
    }
}

/// Fixture data loaded from a JSON file.
///
/// Sections left out of the file fall back to the built-in seed, so a file
/// containing only `projects` is enough to browse a different catalog.
///
/// ```json
/// {
///   "projects": [
///     {
///       "id": "QA-1",
///       "status": "Active",
///       "department": "Risk",
///       "domain": "Market Risk",
///       "description": "VaR backtests",
///       "lastRun": "2025-09-15"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFixtures {
    #[serde(default = "seed_projects")]
    pub projects: Vec<Project>,
    #[serde(default = "seed_history")]
    pub history: Vec<ResultRecord>,
    #[serde(default = "seed_checkpoints")]
    pub checkpoints: Vec<Checkpoint>,
}

fn seed_projects() -> Vec<Project> {
    SeedData.projects()
}

fn seed_history() -> Vec<ResultRecord> {
    SeedData.history()
}

fn seed_checkpoints() -> Vec<Checkpoint> {
    SeedData.checkpoints()
}

impl JsonFixtures {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(QaRunError::FixtureNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let fixtures: JsonFixtures = serde_json::from_str(content)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(QaRunError::InvalidFixture(
                    "project id must not be empty".to_string(),
                ));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(QaRunError::InvalidFixture(format!(
                    "duplicate project id '{}'",
                    project.id
                )));
            }
        }

        if let Some(cp) = self.checkpoints.iter().find(|cp| cp.score > 100) {
            return Err(QaRunError::InvalidFixture(format!(
                "checkpoint '{}' has score {} (must be 0-100)",
                cp.name, cp.score
            )));
        }

        Ok(())
    }
}

impl DataProvider for JsonFixtures {
    fn projects(&self) -> Vec<Project> {
        self.projects.clone()
    }

    fn history(&self) -> Vec<ResultRecord> {
        self.history.clone()
    }

    fn checkpoints(&self) -> Vec<Checkpoint> {
        self.checkpoints.clone()
    }
}

//! CLI command handlers for qarun.
//!
//! Each command has its own module with handler functions.
//!
//! # Commands
//!
//! - [`dashboard`] - Interactive terminal dashboard
//! - [`projects`] - Print the filtered catalog
//! - [`history`] - Print a project's history or one result
//! - [`run`] - Run the mock lifecycle headless
//! - [`config`] - Show the effective configuration

mod config;
mod dashboard;
mod history;
mod projects;
mod run;

pub use config::config_command;
pub use dashboard::dashboard_command;
pub use history::history_command;
pub use projects::{projects_command, ProjectsOptions};
pub use run::{drive_run, run_command, RunOptions, RunOutcome};

use crate::config::Config;
use crate::error::Result;
use crate::fixtures::{DataProvider, JsonFixtures, SeedData};
use crate::lifecycle::Dashboard;
use std::path::Path;

/// Load project data from a fixtures file, or the built-in seed when none
/// is given.
pub fn load_provider(fixtures: Option<&Path>) -> Result<Box<dyn DataProvider>> {
    match fixtures {
        Some(path) => {
            let loaded = JsonFixtures::load(path)?;
            tracing::info!(
                path = %path.display(),
                projects = loaded.projects.len(),
                "Loaded fixtures"
            );
            Ok(Box::new(loaded))
        }
        None => Ok(Box::new(SeedData)),
    }
}

/// Build the dashboard state for a provider under the given config.
pub fn build_dashboard(provider: &dyn DataProvider, config: &Config) -> Dashboard {
    Dashboard::new(provider, &config.timing())
        .with_view_mode(config.view_mode)
        .with_default_environment(config.default_environment)
}

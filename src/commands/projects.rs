//! Projects command handler.
//!
//! Prints the catalog narrowed by the same filters the dashboard uses.

use crate::catalog::{Catalog, Filters, ViewMode, ALL};
use crate::error::Result;
use crate::fixtures::DataProvider;
use crate::output::{print_projects, print_warning};

/// Filters and layout for `qarun projects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectsOptions {
    pub query: String,
    pub status: String,
    pub department: String,
    pub view_mode: ViewMode,
}

impl Default for ProjectsOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: ALL.to_string(),
            department: ALL.to_string(),
            view_mode: ViewMode::default(),
        }
    }
}

/// List projects matching the filters.
///
/// A status or department that no project has is not an error; it simply
/// matches nothing, and a warning lists the known values.
pub fn projects_command(provider: &dyn DataProvider, options: &ProjectsOptions) -> Result<()> {
    let catalog = Catalog::new(provider.projects());

    warn_unknown("status", &options.status, &catalog.status_options());
    warn_unknown(
        "department",
        &options.department,
        &catalog.department_options(),
    );

    let filters = Filters::new(
        options.query.clone(),
        options.status.clone(),
        options.department.clone(),
    );
    let projects = catalog.filter(&filters);
    tracing::debug!(?filters, matched = projects.len(), "Filtered catalog");

    print_projects(&projects, &filters, catalog.len(), options.view_mode);
    Ok(())
}

fn warn_unknown(kind: &str, value: &str, options: &[String]) {
    if !options.iter().any(|o| o == value) {
        print_warning(&format!(
            "unknown {} '{}' (known: {})",
            kind,
            value,
            options.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{JsonFixtures, SeedData};

    #[test]
    fn test_projects_command_default_options() {
        assert!(projects_command(&SeedData, &ProjectsOptions::default()).is_ok());
    }

    #[test]
    fn test_projects_command_with_unknown_status_still_succeeds() {
        let options = ProjectsOptions {
            status: "Paused".to_string(),
            ..ProjectsOptions::default()
        };
        assert!(projects_command(&SeedData, &options).is_ok());
    }

    #[test]
    fn test_projects_command_table_with_multibyte_id() {
        let fixtures = JsonFixtures::parse(
            r#"{"projects": [{"id": "QA-ÄÄÄÄÄÄ", "status": "Active", "department": "Risk",
                "domain": "Market Risk", "description": "Umlaut ids", "lastRun": "2025-09-15"}]}"#,
        )
        .unwrap();
        let options = ProjectsOptions {
            view_mode: ViewMode::Table,
            ..ProjectsOptions::default()
        };
        assert!(projects_command(&fixtures, &options).is_ok());
    }
}

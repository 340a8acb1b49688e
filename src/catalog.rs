//! Project catalog and its filter model.
//!
//! The catalog is fixed at startup. Everything the list or grid shows is
//! derived from it through [`Filters`], a pure `(query, status, department)`
//! tuple, so recomputing the view is deterministic and side-effect free.

use crate::model::Project;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector value that disables a status or department filter.
pub const ALL: &str = "All";

/// Message shown in place of the grid/table when nothing matches.
pub const NO_MATCHES: &str = "No projects match your filters.";

/// How the catalog is laid out. Only affects presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Cards => "Cards",
            ViewMode::Table => "Table",
        }
    }

    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Cards, ViewMode::Table]
    }

    pub fn toggle(&self) -> ViewMode {
        match self {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The current filter inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub query: String,
    pub status: String,
    pub department: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: ALL.to_string(),
            department: ALL.to_string(),
        }
    }
}

impl Filters {
    pub fn new(query: impl Into<String>, status: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: status.into(),
            department: department.into(),
        }
    }

    /// Whether a project passes all three predicates.
    pub fn matches(&self, project: &Project) -> bool {
        self.matches_query(project) && self.matches_status(project) && self.matches_department(project)
    }

    fn matches_query(&self, project: &Project) -> bool {
        if self.query.trim().is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        project.id.to_lowercase().contains(&needle)
            || project.description.to_lowercase().contains(&needle)
    }

    fn matches_status(&self, project: &Project) -> bool {
        self.status == ALL || self.status == project.status.label()
    }

    fn matches_department(&self, project: &Project) -> bool {
        self.department == ALL || self.department == project.department
    }

    /// Whether any filter narrows the catalog.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.status != ALL || self.department != ALL
    }

    /// Advance the status selector to the next option, wrapping back to `All`.
    pub fn cycle_status(&mut self, options: &[String]) {
        self.status = next_option(options, &self.status);
    }

    /// Advance the department selector to the next option, wrapping back to `All`.
    pub fn cycle_department(&mut self, options: &[String]) {
        self.department = next_option(options, &self.department);
    }
}

fn next_option(options: &[String], current: &str) -> String {
    if options.is_empty() {
        return ALL.to_string();
    }
    let idx = options.iter().position(|o| o == current);
    match idx {
        Some(i) => options[(i + 1) % options.len()].clone(),
        None => options[0].clone(),
    }
}

/// `All` followed by the distinct values in first-seen order.
fn options_from<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    for value in values {
        if !options.iter().any(|o| o == value) {
            options.push(value.to_string());
        }
    }
    options
}

/// The immutable project list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Projects satisfying the filters, in catalog order.
    pub fn filter(&self, filters: &Filters) -> Vec<&Project> {
        self.projects.iter().filter(|p| filters.matches(p)).collect()
    }

    pub fn status_options(&self) -> Vec<String> {
        options_from(self.projects.iter().map(|p| p.status.label()))
    }

    pub fn department_options(&self) -> Vec<String> {
        options_from(self.projects.iter().map(|p| p.department.as_str()))
    }
}

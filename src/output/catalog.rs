//! Project listings for `qarun projects`.

use crate::catalog::{Filters, ViewMode, ALL, NO_MATCHES};
use crate::model::{Project, ProjectStatus};

use super::colors::*;

const ID_WIDTH: usize = 12;
const STATUS_WIDTH: usize = 9;
const DEPARTMENT_WIDTH: usize = 12;
const DOMAIN_WIDTH: usize = 20;

/// Color used for a project status badge.
pub fn status_color(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Active => GREEN,
        ProjectStatus::Draft => YELLOW,
        ProjectStatus::Archived => GRAY,
    }
}

/// One uncolored table row.
pub fn format_table_row(project: &Project) -> String {
    format!("{} {}", format_id_cell(project), format_table_columns(project))
}

/// The padded id column.
fn format_id_cell(project: &Project) -> String {
    format!("{:<ID_WIDTH$}", project.id)
}

/// Every column after the id.
fn format_table_columns(project: &Project) -> String {
    format!(
        "{:<STATUS_WIDTH$} {:<DEPARTMENT_WIDTH$} {:<DOMAIN_WIDTH$} {}",
        project.status.label(),
        project.department,
        truncate(&project.domain, DOMAIN_WIDTH),
        project.last_run.format("%Y-%m-%d"),
    )
}

/// Describe the active filters, e.g. `query "risk", status Active`.
pub fn describe_filters(filters: &Filters) -> String {
    let mut parts = Vec::new();
    if !filters.query.trim().is_empty() {
        parts.push(format!("query \"{}\"", filters.query.trim()));
    }
    if filters.status != ALL {
        parts.push(format!("status {}", filters.status));
    }
    if filters.department != ALL {
        parts.push(format!("department {}", filters.department));
    }
    parts.join(", ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Print the empty-state placeholder.
pub fn print_no_matches() {
    println!("{GRAY}{}{RESET}", NO_MATCHES);
}

/// Print the filtered catalog in the requested layout.
pub fn print_projects(projects: &[&Project], filters: &Filters, total: usize, mode: ViewMode) {
    if projects.is_empty() {
        print_no_matches();
        return;
    }

    match mode {
        ViewMode::Table => {
            println!(
                "{BOLD}{:<ID_WIDTH$} {:<STATUS_WIDTH$} {:<DEPARTMENT_WIDTH$} {:<DOMAIN_WIDTH$} {}{RESET}",
                "ID", "Status", "Department", "Domain", "Last Run"
            );
            for project in projects {
                println!(
                    "{CYAN}{}{RESET} {}",
                    format_id_cell(project),
                    format_table_columns(project)
                );
            }
        }
        ViewMode::Cards => {
            for project in projects {
                let color = status_color(project.status);
                println!(
                    "{BOLD}{CYAN}{}{RESET} {color}[{}]{RESET} {GRAY}{} · {}{RESET}",
                    project.id,
                    project.status.label(),
                    project.department,
                    project.domain
                );
                println!("  {}", project.description);
                println!(
                    "  {DIM}Last run: {}{RESET}",
                    project.last_run.format("%Y-%m-%d")
                );
                println!();
            }
        }
    }

    let filter_note = describe_filters(filters);
    if filter_note.is_empty() {
        println!("{GRAY}({} of {} projects){RESET}", projects.len(), total);
    } else {
        println!(
            "{GRAY}({} of {} projects, {}){RESET}",
            projects.len(),
            total,
            filter_note
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DataProvider, SeedData};

    #[test]
    fn test_format_table_row_pads_columns() {
        let project = &SeedData.projects()[0];
        let row = format_table_row(project);
        assert!(row.starts_with("QA-2023-045  Active    Risk"));
        assert!(row.ends_with(&project.last_run.format("%Y-%m-%d").to_string()));
    }

    #[test]
    fn test_table_row_keeps_multibyte_and_long_ids_whole() {
        let mut project = SeedData.projects()[0].clone();
        project.id = "QA-ÄÄÄÄÄÄ".to_string();
        assert_eq!(format_id_cell(&project), "QA-ÄÄÄÄÄÄ   ");
        assert!(format_table_row(&project).starts_with("QA-ÄÄÄÄÄÄ    Active"));

        project.id = "QA-2025-LONG-IDENTIFIER".to_string();
        assert_eq!(format_id_cell(&project), "QA-2025-LONG-IDENTIFIER");

        let refs = [&project];
        print_projects(&refs, &Filters::default(), 1, ViewMode::Table);
    }

    #[test]
    fn test_truncate_long_domain() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }

    #[test]
    fn test_describe_filters() {
        assert_eq!(describe_filters(&Filters::default()), "");
        let filters = Filters::new(" risk ", "Active", ALL);
        assert_eq!(describe_filters(&filters), "query \"risk\", status Active");
    }

    #[test]
    fn test_status_colors_are_distinct() {
        assert_ne!(status_color(ProjectStatus::Active), status_color(ProjectStatus::Draft));
        assert_ne!(status_color(ProjectStatus::Draft), status_color(ProjectStatus::Archived));
    }

    #[test]
    fn test_print_projects_handles_empty_and_full() {
        let projects = SeedData.projects();
        let refs: Vec<&Project> = projects.iter().collect();
        print_projects(&refs, &Filters::default(), refs.len(), ViewMode::Table);
        print_projects(&refs, &Filters::default(), refs.len(), ViewMode::Cards);
        print_projects(&[], &Filters::new("zzz", ALL, ALL), refs.len(), ViewMode::Cards);
    }
}

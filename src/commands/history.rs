//! History command handler.

use crate::catalog::Catalog;
use crate::error::{QaRunError, Result};
use crate::fixtures::DataProvider;
use crate::history::History;
use crate::output::{print_history, print_result_detail};

/// Print a project's history table, or one result's detail when
/// `result_id` is given.
pub fn history_command(
    provider: &dyn DataProvider,
    project_id: &str,
    result_id: Option<&str>,
) -> Result<()> {
    let catalog = Catalog::new(provider.projects());
    if catalog.get(project_id).is_none() {
        return Err(QaRunError::UnknownProject(project_id.to_string()));
    }

    let history = History::new(provider.history(), provider.checkpoints());
    let rows = history.rows(project_id, None);

    match result_id {
        None => print_history(project_id, &rows),
        Some(id) => {
            let row = rows
                .into_iter()
                .find(|r| r.result_id == id)
                .ok_or_else(|| QaRunError::UnknownResult {
                    project: project_id.to_string(),
                    result: id.to_string(),
                })?;
            print_result_detail(&history.detail(row));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SeedData;

    #[test]
    fn test_history_for_known_project() {
        assert!(history_command(&SeedData, "QA-2023-045", None).is_ok());
        assert!(history_command(&SeedData, "QA-2023-045", Some("RES-1008-C")).is_ok());
    }

    #[test]
    fn test_history_for_unknown_project() {
        let err = history_command(&SeedData, "QA-0000-000", None).unwrap_err();
        assert!(matches!(err, QaRunError::UnknownProject(id) if id == "QA-0000-000"));
    }

    #[test]
    fn test_history_for_unknown_result() {
        let err = history_command(&SeedData, "QA-2023-045", Some("RES-NOPE")).unwrap_err();
        assert!(matches!(
            &err,
            QaRunError::UnknownResult { project, result }
                if project == "QA-2023-045" && result == "RES-NOPE"
        ));
        assert_eq!(err.to_string(), "No result 'RES-NOPE' in the history of QA-2023-045");
    }
}

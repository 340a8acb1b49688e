//! History tables, result detail and run summaries.

use crate::history::{format_duration, ResultDetail};
use crate::model::{CheckpointOutcome, ResultRecord, ResultStatus, RunRecord};

use super::colors::*;

/// Color used for a result status.
pub fn result_color(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Pass => GREEN,
        ResultStatus::Fail => RED,
        ResultStatus::Partial => YELLOW,
        ResultStatus::NotRated => GRAY,
    }
}

/// One uncolored history row.
pub fn format_history_row(row: &ResultRecord) -> String {
    format!(
        "{:<11} {:<20} {:<8} {}",
        row.result_id,
        row.display_date(),
        row.status.label(),
        row.duration
    )
}

/// Print the history table for a project.
pub fn print_history(project_id: &str, rows: &[ResultRecord]) {
    println!("{BOLD}Execution history for {CYAN}{}{RESET}", project_id);
    println!();
    println!(
        "{BOLD}{:<11} {:<20} {:<8} {}{RESET}",
        "Result", "Executed", "Status", "Duration"
    );
    for row in rows {
        let color = result_color(row.status);
        println!("{color}{}{RESET}", format_history_row(row));
    }
    println!();
    println!(
        "{GRAY}({} result{}){RESET}",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    );
}

/// Print one result with its checkpoints.
pub fn print_result_detail(detail: &ResultDetail) {
    let record = &detail.record;
    let color = result_color(record.status);
    println!("{BOLD}Result {}{RESET}", record.result_id);
    println!("{BLUE}Project:{RESET}  {}", record.project_id);
    println!("{BLUE}Executed:{RESET} {}", record.display_date());
    println!("{BLUE}Status:{RESET}   {color}{}{RESET}", record.status.label());
    println!();
    for checkpoint in &detail.checkpoints {
        let outcome_color = match checkpoint.outcome {
            CheckpointOutcome::Pass => GREEN,
            CheckpointOutcome::Fail => RED,
        };
        println!(
            "  {:<24} {outcome_color}{:<4}{RESET} {:>3}",
            checkpoint.name,
            checkpoint.outcome.label(),
            checkpoint.score
        );
    }
}

/// Print the summary of a triggered run.
pub fn print_run_summary(run: &RunRecord) {
    let status_color = if run.is_completed() { GREEN } else { YELLOW };
    println!("{BLUE}Run ID:{RESET}      {}", run.run_id);
    println!("{BLUE}Project:{RESET}     {}", run.project_id);
    if !run.reference_id.is_empty() {
        println!("{BLUE}Reference:{RESET}   {}", run.reference_id);
    }
    println!("{BLUE}Environment:{RESET} {}", run.environment);
    if let Some(date) = run.execution_date {
        println!("{BLUE}Date:{RESET}        {}", date.format("%Y-%m-%d"));
    }
    println!(
        "{BLUE}Status:{RESET}      {status_color}{}{RESET} ({}%)",
        run.status, run.progress
    );
    if let Some(elapsed) = run.elapsed() {
        println!("{BLUE}Duration:{RESET}    {}", format_duration(elapsed));
    }
}

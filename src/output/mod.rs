//! Terminal output formatting for qarun.
//!
//! Plain colored output for the non-interactive commands. Functions are
//! organized by domain:
//!
//! - [`messages`] - Error, warning, and info messages
//! - [`catalog`] - Project listings
//! - [`history`] - History tables, result detail and run summaries

pub mod catalog;
pub mod history;
pub mod messages;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use catalog::{print_no_matches, print_projects};
pub use history::{print_history, print_result_detail, print_run_summary};
pub use messages::{print_cancelled, print_error, print_warning};

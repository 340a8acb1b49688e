//! Basic message output functions.

use super::colors::*;

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print the message shown when Ctrl+C stops a headless run.
pub fn print_cancelled(run_id: &str) {
    println!();
    println!("{YELLOW}Cancelled.{RESET} The ticker for {BOLD}{}{RESET} was stopped.", run_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_do_not_panic() {
        print_error("boom");
        print_warning("careful");
        print_cancelled("RUN-1");
    }
}

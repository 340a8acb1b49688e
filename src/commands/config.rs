//! Config command handler.
//!
//! Displays the effective qarun configuration.

use crate::config::{generate_config_with_comments, global_config_path, Config};
use crate::error::Result;
use crate::history::format_duration;
use crate::output::{BOLD, GRAY, RESET, YELLOW};

/// Print the config file location, or the effective configuration as TOML.
pub fn config_command(config: &Config, path_only: bool) -> Result<()> {
    let config_path = global_config_path()?;

    if path_only {
        println!("{}", config_path.display());
        return Ok(());
    }

    println!("{BOLD}# Global config{RESET}");
    println!("{GRAY}# {}{RESET}", config_path.display());
    if *config == Config::default() {
        println!("{YELLOW}# (all values are defaults){RESET}");
    }
    println!("{GRAY}# {}{RESET}", describe_run_timing(config));
    println!();
    print!("{}", generate_config_with_comments(config));
    Ok(())
}

/// How long a run takes under this config, e.g. `a run completes in 10 ticks (5s)`.
fn describe_run_timing(config: &Config) -> String {
    let timing = config.timing();
    let ticks = timing.ticks_to_complete();
    format!(
        "a run completes in {} ticks ({})",
        ticks,
        format_duration(timing.tick_interval * ticks)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_run_timing_defaults() {
        assert_eq!(
            describe_run_timing(&Config::default()),
            "a run completes in 10 ticks (5s)"
        );
    }

    #[test]
    fn test_describe_run_timing_uneven_step() {
        let config = Config {
            tick_step: 30,
            tick_interval_ms: 250,
            ..Config::default()
        };
        assert_eq!(describe_run_timing(&config), "a run completes in 4 ticks (1s)");
    }
}

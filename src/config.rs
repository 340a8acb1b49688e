use crate::catalog::ViewMode;
use crate::error::{QaRunError, Result};
use crate::model::Environment;
use crate::ticker::{Timing, DEFAULT_HISTORY_DELAY, DEFAULT_TICK_INTERVAL, DEFAULT_TICK_STEP};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "qarun";

// ============================================================================
// Dashboard Configuration
// ============================================================================

/// User preferences for the dashboard and the simulated run.
///
/// Every field has a serde default, so a partial (or empty) config file
/// loads correctly and only overrides what it names.
///
/// # Example
///
/// ```toml
/// tick_interval_ms = 500
/// tick_step = 10
/// history_delay_ms = 150
/// default_environment = "DEV"
/// view_mode = "cards"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Milliseconds between progress ticks of a triggered run.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Percentage points added per tick. Must be within 1..=100.
    #[serde(default = "default_tick_step")]
    pub tick_step: u8,

    /// Milliseconds between submitting a run and showing its history.
    #[serde(default = "default_history_delay_ms")]
    pub history_delay_ms: u64,

    /// Environment preselected in the run form.
    #[serde(default)]
    pub default_environment: Environment,

    /// Initial catalog layout.
    #[serde(default)]
    pub view_mode: ViewMode,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL.as_millis() as u64
}

fn default_tick_step() -> u8 {
    DEFAULT_TICK_STEP
}

fn default_history_delay_ms() -> u64 {
    DEFAULT_HISTORY_DELAY.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            tick_step: default_tick_step(),
            history_delay_ms: default_history_delay_ms(),
            default_environment: Environment::default(),
            view_mode: ViewMode::default(),
        }
    }
}

impl Config {
    /// Ticker and transition timing derived from this config.
    pub fn timing(&self) -> Timing {
        Timing {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            tick_step: self.tick_step,
            history_delay: Duration::from_millis(self.history_delay_ms),
        }
    }
}

// ============================================================================
// Config Validation
// ============================================================================

use std::error::Error;
use std::fmt;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `tick_step` is zero or above 100.
    TickStepOutOfRange(u8),

    /// `tick_interval_ms` is zero, which would make the ticker spin.
    ZeroTickInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TickStepOutOfRange(step) => {
                write!(
                    f,
                    "Invalid tick_step {}. \
                    It must be between 1 and 100 percentage points",
                    step
                )
            }
            ConfigError::ZeroTickInterval => {
                write!(f, "tick_interval_ms must be greater than zero")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validate a configuration.
///
/// # Validation Rules
///
/// - `tick_step` must be within `1..=100`
/// - `tick_interval_ms` must be non-zero
///
/// A zero `history_delay_ms` is allowed and shows history on the next
/// event-loop pass.
///
/// # Example
///
/// ```
/// use qarun::config::{Config, validate_config};
///
/// assert!(validate_config(&Config::default()).is_ok());
///
/// let invalid = Config {
///     tick_step: 0,
///     ..Default::default()
/// };
/// assert!(validate_config(&invalid).is_err());
/// ```
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    if config.tick_step == 0 || config.tick_step > 100 {
        return Err(ConfigError::TickStepOutOfRange(config.tick_step));
    }

    if config.tick_interval_ms == 0 {
        return Err(ConfigError::ZeroTickInterval);
    }

    Ok(())
}

// ============================================================================
// Global Config File Management
// ============================================================================

/// The filename for the global configuration file.
const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// The filename the dashboard writes its log to.
const LOG_FILENAME: &str = "qarun.log";

/// Get the qarun config directory path (~/.config/qarun/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QaRunError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Ensure the qarun config directory exists.
///
/// Returns whether the directory was newly created.
pub fn ensure_config_dir() -> Result<(PathBuf, bool)> {
    let dir = config_dir()?;
    let created = !dir.exists();
    fs::create_dir_all(&dir)?;
    Ok((dir, created))
}

/// Get the path to the global config file (`~/.config/qarun/config.toml`).
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(GLOBAL_CONFIG_FILENAME))
}

/// Get the path of the dashboard log file (`~/.config/qarun/qarun.log`).
pub fn log_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(LOG_FILENAME))
}

/// Load the global configuration from `~/.config/qarun/config.toml`.
///
/// If the config file doesn't exist, one is created with default values
/// and comments explaining each option.
///
/// # Errors
///
/// Returns an error if:
/// - The home directory cannot be determined
/// - The config directory cannot be created
/// - The config file cannot be read (other than not existing)
/// - The config file contains invalid TOML or fails validation
pub fn load_global_config() -> Result<Config> {
    ensure_config_dir()?;
    load_config_at(&global_config_path()?)
}

/// Load a config file at an arbitrary path, creating it with commented
/// defaults when it does not exist yet.
pub fn load_config_at(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        fs::write(config_path, generate_config_with_comments(&Config::default()))?;
        tracing::info!(path = %config_path.display(), "Created default config");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config = parse_config(&content).map_err(|e| match e {
        QaRunError::Config(msg) => QaRunError::Config(format!(
            "Failed to load config file at {:?}: {}",
            config_path, msg
        )),
        other => other,
    })?;

    tracing::debug!(path = %config_path.display(), ?config, "Loaded config");
    Ok(config)
}

/// Parse and validate config file content.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(content).map_err(|e| QaRunError::Config(e.to_string()))?;
    validate_config(&config).map_err(|e| QaRunError::Config(e.to_string()))?;
    Ok(config)
}

/// Generate config file content with explanatory comments, using the
/// values of the provided config.
pub fn generate_config_with_comments(config: &Config) -> String {
    format!(
        r#"# qarun Configuration
# Controls the simulated run and the dashboard defaults.

# Milliseconds between progress ticks of a triggered run
tick_interval_ms = {}

# Percentage points added per tick (1-100)
tick_step = {}

# Milliseconds between submitting a run and opening its history
history_delay_ms = {}

# Environment preselected in the run form: DEV, QA, UAT or PROD
default_environment = "{}"

# Initial catalog layout: "cards" or "table"
view_mode = "{}"
"#,
        config.tick_interval_ms,
        config.tick_step,
        config.history_delay_ms,
        config.default_environment.label(),
        config.view_mode.name().to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_dir_returns_path_ending_with_qarun() {
        let dir = config_dir().unwrap();
        assert!(dir.ends_with(".config/qarun"));
    }

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.tick_step, 10);
        assert_eq!(config.history_delay_ms, 150);
        assert_eq!(config.default_environment, Environment::Dev);
        assert_eq!(config.view_mode, ViewMode::Cards);
    }

    #[test]
    fn test_default_config_timing_matches_ticker_defaults() {
        assert_eq!(Config::default().timing(), Timing::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse_config("tick_step = 25\nview_mode = \"table\"\n").unwrap();
        assert_eq!(config.tick_step, 25);
        assert_eq!(config.view_mode, ViewMode::Table);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.default_environment, Environment::Dev);
    }

    #[test]
    fn test_environment_parses_uppercase() {
        let config = parse_config("default_environment = \"UAT\"").unwrap();
        assert_eq!(config.default_environment, Environment::Uat);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_config("tick_step = \"fast\"").unwrap_err();
        assert!(matches!(err, QaRunError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_step_out_of_range() {
        for step in [0u8, 101, 255] {
            let config = Config {
                tick_step: step,
                ..Default::default()
            };
            assert_eq!(
                validate_config(&config),
                Err(ConfigError::TickStepOutOfRange(step))
            );
        }

        let config = Config {
            tick_step: 100,
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(validate_config(&config), Err(ConfigError::ZeroTickInterval));
        assert!(parse_config("tick_interval_ms = 0").is_err());
    }

    #[test]
    fn test_zero_history_delay_is_allowed() {
        assert!(parse_config("history_delay_ms = 0").is_ok());
    }

    #[test]
    fn test_config_error_messages_are_actionable() {
        let msg = ConfigError::TickStepOutOfRange(0).to_string();
        assert!(msg.contains("tick_step"));
        assert!(msg.contains("between 1 and 100"));
    }

    #[test]
    fn test_load_config_at_creates_commented_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = load_config_at(&path).unwrap();
        assert_eq!(config, Config::default());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# qarun Configuration"));
        assert_eq!(written, generate_config_with_comments(&Config::default()));
        assert_eq!(parse_config(&written).unwrap(), Config::default());
    }

    #[test]
    fn test_load_config_at_reads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "tick_interval_ms = 100\n").unwrap();

        let config = load_config_at(&path).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.timing().tick_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_load_config_at_reports_path_on_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "tick_step = 0\n").unwrap();

        let err = load_config_at(&path).unwrap_err().to_string();
        assert!(err.contains("config.toml"));
        assert!(err.contains("tick_step"));
    }

    #[test]
    fn test_generated_config_round_trips() {
        let config = Config {
            tick_interval_ms: 250,
            tick_step: 20,
            history_delay_ms: 0,
            default_environment: Environment::Prod,
            view_mode: ViewMode::Table,
        };
        let content = generate_config_with_comments(&config);
        assert!(content.contains("# Percentage points added per tick"));
        assert_eq!(parse_config(&content).unwrap(), config);
    }
}

//! Shell completion scripts for qarun.

use crate::error::{QaRunError, Result};
use clap::Command;
use clap_complete::{generate, Shell};

/// Names accepted by `qarun completions <SHELL>`.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish"];

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Parse a shell name or path such as `zsh` or `/usr/bin/fish`.
    pub fn from_name(name: &str) -> Result<Self> {
        let shell_name = std::path::Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        match shell_name {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(QaRunError::ShellCompletion(format!(
                "Unsupported shell: '{}'",
                shell_name
            ))),
        }
    }

    /// Convert to the `clap_complete::Shell` type.
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generate a completion script for the given command tree.
pub fn generate_completion_script(shell: ShellType, cmd: &mut Command) -> String {
    let bin_name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), cmd, bin_name, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print a completion script to stdout.
pub fn print_completion_script(shell: ShellType, cmd: &mut Command) {
    print!("{}", generate_completion_script(shell, cmd));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cli() -> Command {
        Command::new("qarun")
            .subcommand(Command::new("projects").arg(clap::Arg::new("query").long("query")))
            .subcommand(Command::new("history"))
    }

    #[test]
    fn test_from_name_accepts_names_and_paths() {
        assert_eq!(ShellType::from_name("bash").unwrap(), ShellType::Bash);
        assert_eq!(ShellType::from_name("/bin/zsh").unwrap(), ShellType::Zsh);
        assert_eq!(
            ShellType::from_name("/usr/local/bin/fish").unwrap(),
            ShellType::Fish
        );
    }

    #[test]
    fn test_from_name_rejects_unknown_shell() {
        let err = ShellType::from_name("powershell").unwrap_err();
        assert!(err.to_string().contains("powershell"));
    }

    #[test]
    fn test_supported_shells_all_parse() {
        for name in SUPPORTED_SHELLS {
            assert_eq!(ShellType::from_name(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_generate_bash_script_mentions_subcommands() {
        let script = generate_completion_script(ShellType::Bash, &mut sample_cli());
        assert!(script.contains("qarun"));
        assert!(script.contains("projects"));
        assert!(script.contains("history"));
        assert!(script.contains("--query"));
    }

    #[test]
    fn test_generate_fish_script_is_non_empty() {
        let script = generate_completion_script(ShellType::Fish, &mut sample_cli());
        assert!(script.contains("complete -c qarun"));
    }
}

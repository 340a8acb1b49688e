//! qarun CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::{CommandFactory, Parser, Subcommand};
use qarun::catalog::{ViewMode, ALL};
use qarun::commands::{
    config_command, dashboard_command, history_command, load_provider, projects_command,
    run_command, ProjectsOptions, RunOptions,
};
use qarun::completion::{print_completion_script, ShellType, SUPPORTED_SHELLS};
use qarun::config::{load_global_config, log_file_path};
use qarun::dashboard::KEY_HELP;
use qarun::logging::{self, LogTarget};
use qarun::model::Environment;
use qarun::output::{print_error, print_warning};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qarun")]
#[command(
    version,
    about = "Dashboard for browsing QA projects and triggering mock test runs",
    after_help = "EXAMPLES:
    # Open the interactive dashboard
    qarun
    qarun dashboard

    # List active Risk projects as a table
    qarun projects --status Active --department Risk --table

    # Trigger a run and follow its progress
    qarun run QA-2023-045 --reference REF-7 --env QA

    # Browse a different catalog
    qarun --fixtures ./projects.json projects

LOGGING:
    Set QARUN_LOG to a tracing filter (e.g. QARUN_LOG=debug).
    The dashboard logs to ~/.config/qarun/qarun.log, other commands to stderr."
)]
struct Cli {
    /// Load projects, history and checkpoints from a JSON file.
    /// Sections missing from the file fall back to the built-in seed.
    #[arg(short, long, global = true, value_name = "FILE")]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    #[command(after_help = KEY_HELP)]
    Dashboard,

    /// List projects matching the given filters
    #[command(after_help = "EXAMPLES:
    qarun projects                          # Every project, as cards
    qarun projects --query kyc              # Search id and description
    qarun projects -s Draft -d Finance      # Exact status and department
    qarun projects --table                  # Compact table layout

Filters combine with AND. Search is case-insensitive.")]
    Projects {
        /// Case-insensitive text matched against id and description.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Exact status to keep, or All.
        #[arg(short, long, default_value = ALL)]
        status: String,

        /// Exact department to keep, or All.
        #[arg(short, long, default_value = ALL)]
        department: String,

        /// Show a table instead of cards (overrides config).
        #[arg(short, long)]
        table: bool,
    },

    /// Show a project's execution history
    #[command(after_help = "EXAMPLES:
    qarun history QA-2023-045                        # History table
    qarun history QA-2023-045 --result RES-1008-C    # One result with checkpoints")]
    History {
        /// Project id.
        project: String,

        /// Show the checkpoint detail of one result.
        #[arg(short, long, value_name = "RESULT_ID")]
        result: Option<String>,
    },

    /// Trigger a simulated run and follow it to completion
    #[command(after_help = "EXAMPLES:
    qarun run QA-2023-045
    qarun run QA-2023-045 --reference REF-7 --env UAT --date 2025-12-24

Progress advances every tick until 100%. Press Ctrl+C to cancel; the run
stays at the progress it had reached.")]
    Run {
        /// Project id.
        project: String,

        /// Free-form reference id.
        #[arg(short, long, default_value = "")]
        reference: String,

        /// Target environment: DEV, QA, UAT or PROD (default from config).
        #[arg(short, long)]
        env: Option<Environment>,

        /// Execution date as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,

        /// Hide the progress bar.
        #[arg(long)]
        quiet: bool,
    },

    /// Show the effective configuration
    #[command(after_help = "CONFIG FILE:
    ~/.config/qarun/config.toml

    Created with commented defaults the first time qarun runs.")]
    Config {
        /// Print only the config file path.
        #[arg(long)]
        path: bool,
    },

    #[command(hide = true)]
    Completions { shell: String },
}

fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        match ShellType::from_name(shell) {
            Ok(shell_type) => {
                print_completion_script(shell_type, &mut Cli::command());
                return;
            }
            Err(e) => {
                print_error(&format!(
                    "{}\nSupported shells: {}",
                    e,
                    SUPPORTED_SHELLS.join(", ")
                ));
                std::process::exit(1);
            }
        }
    }

    init_logging(&cli.command);

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging(command: &Option<Commands>) {
    let target = match command {
        None | Some(Commands::Dashboard) => match log_file_path() {
            Ok(path) => LogTarget::File(path),
            Err(_) => return,
        },
        Some(_) => LogTarget::Stderr,
    };

    if let Err(e) = logging::init(target) {
        print_warning(&format!("logging disabled: {}", e));
    }
}

fn run(cli: Cli) -> qarun::Result<()> {
    let config = load_global_config()?;
    let provider = load_provider(cli.fixtures.as_deref())?;

    match cli.command {
        None | Some(Commands::Dashboard) => dashboard_command(provider.as_ref(), &config),

        Some(Commands::Projects {
            query,
            status,
            department,
            table,
        }) => projects_command(
            provider.as_ref(),
            &ProjectsOptions {
                query,
                status,
                department,
                view_mode: if table {
                    ViewMode::Table
                } else {
                    config.view_mode
                },
            },
        ),

        Some(Commands::History { project, result }) => {
            history_command(provider.as_ref(), &project, result.as_deref())
        }

        Some(Commands::Run {
            project,
            reference,
            env,
            date,
            quiet,
        }) => run_command(
            provider.as_ref(),
            &config,
            &RunOptions {
                project_id: project,
                reference_id: reference,
                environment: env,
                date,
                quiet,
            },
        ),

        Some(Commands::Config { path }) => config_command(&config, path),

        // Handled before logging starts
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

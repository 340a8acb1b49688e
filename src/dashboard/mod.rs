//! Dashboard TUI - the interactive terminal front end.
//!
//! Shows the project catalog as cards or a table, with modals for
//! triggering a run, configuring a project and browsing its history.
//!
//! Keyboard:
//! - `/`: Search by id or description
//! - `s` / `d`: Cycle the status / department filter
//! - `v`: Toggle cards and table
//! - `r` / `c` / `h`: Run, configure or view history of the selected project
//! - Esc: Close the open modal
//! - Q: Quit

pub mod app;
mod render;

pub use app::{run_dashboard, DashboardApp, InputMode, KEY_HELP};

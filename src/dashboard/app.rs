//! Dashboard TUI Application
//!
//! Key handling and the event loop for the interactive dashboard.

use super::render;
use crate::clock::{Clock, SystemClock};
use crate::driver::Driver;
use crate::error::{QaRunError, Result};
use crate::lifecycle::{Action, FormInput, Modal};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

/// Key reference shown in `qarun dashboard --help`.
pub const KEY_HELP: &str = "KEYS:
    /           Search projects (Enter or Esc to finish)
    s / d       Cycle status / department filter
    x           Reset filters
    v or Tab    Toggle cards and table
    j k ↑ ↓     Move the selection
    r           Run the selected project
    c           Configure the selected project
    h or Enter  Open the selected project's history
    Esc         Close the open dialog
    q           Quit";

/// Upper bound on how long the loop waits for a key before redrawing.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Whether keystrokes edit the search query or drive commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Which key map applies, derived from the open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyScope {
    Catalog,
    RunForm,
    Settings,
    Triggered,
    History,
    Detail,
}

impl KeyScope {
    fn of(modal: &Modal) -> Self {
        match modal {
            Modal::None => KeyScope::Catalog,
            Modal::RunForm { .. } => KeyScope::RunForm,
            Modal::Settings { .. } => KeyScope::Settings,
            Modal::Triggered { .. } => KeyScope::Triggered,
            Modal::History { selected: None, .. } => KeyScope::History,
            Modal::History { selected: Some(_), .. } => KeyScope::Detail,
        }
    }
}

/// Terminal-side state layered over the [`Driver`].
///
/// Everything about projects, runs and history lives in the driver's
/// dashboard; this struct only tracks cursor positions and input mode.
pub struct DashboardApp<C: Clock> {
    driver: Driver<C>,
    input_mode: InputMode,
    /// Cursor into the filtered project list
    selected_project: usize,
    /// Cursor into the history rows of the open history modal
    selected_row: usize,
    should_quit: bool,
}

impl<C: Clock> DashboardApp<C> {
    pub fn new(driver: Driver<C>) -> Self {
        Self {
            driver,
            input_mode: InputMode::Normal,
            selected_project: 0,
            selected_row: 0,
            should_quit: false,
        }
    }

    pub fn driver(&self) -> &Driver<C> {
        &self.driver
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn selected_project(&self) -> usize {
        self.selected_project
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Deliver due timers.
    pub fn tick(&mut self) {
        self.driver.advance();
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self) -> Duration {
        self.driver
            .time_until_next_timer()
            .map_or(MAX_POLL_INTERVAL, |t| t.min(MAX_POLL_INTERVAL))
    }

    /// Handle a key event, including Ctrl+C.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.handle_key(key.code);
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyCode) {
        let scope = KeyScope::of(self.driver.dashboard().modal());
        let action = match scope {
            KeyScope::Catalog => match self.input_mode {
                InputMode::Search => self.search_key(key),
                InputMode::Normal => self.catalog_key(key),
            },
            KeyScope::RunForm => form_key(key, Action::SubmitRun),
            KeyScope::Settings => form_key(key, Action::SaveSettings),
            KeyScope::Triggered => match key {
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::Dismiss),
                _ => None,
            },
            KeyScope::Detail => match key {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseResult),
                _ => None,
            },
            KeyScope::History => self.history_key(key),
        };

        if let Some(action) = action {
            let opens_history = matches!(action, Action::OpenHistory(_));
            self.driver.dispatch(action);
            if opens_history {
                self.selected_row = 0;
            }
        }
        self.clamp_selection();
    }

    fn search_key(&mut self, key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Backspace => Some(Action::PopQueryChar),
            KeyCode::Char(c) => Some(Action::PushQueryChar(c)),
            _ => None,
        }
    }

    fn catalog_key(&mut self, key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                None
            }
            KeyCode::Char('s') => Some(Action::CycleStatusFilter),
            KeyCode::Char('d') => Some(Action::CycleDepartmentFilter),
            KeyCode::Char('x') => Some(Action::ResetFilters),
            KeyCode::Char('v') | KeyCode::Tab => Some(Action::ToggleViewMode),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_project = self.selected_project.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_project += 1;
                None
            }
            KeyCode::Char('r') => self.selected_id().map(Action::OpenRun),
            KeyCode::Char('c') => self.selected_id().map(Action::OpenSettings),
            KeyCode::Char('h') | KeyCode::Enter => self.selected_id().map(Action::OpenHistory),
            _ => None,
        }
    }

    fn history_key(&mut self, key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Dismiss),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_row += 1;
                None
            }
            KeyCode::Enter => Some(Action::ViewResult(self.selected_row)),
            _ => None,
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.driver
            .dashboard()
            .visible_projects()
            .get(self.selected_project)
            .map(|p| p.id.clone())
    }

    fn clamp_selection(&mut self) {
        let dashboard = self.driver.dashboard();
        let visible = dashboard.visible_projects().len();
        self.selected_project = self.selected_project.min(visible.saturating_sub(1));
        let rows = dashboard.history_rows().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    /// Render the UI to the terminal.
    pub fn render(&self, frame: &mut Frame) {
        render::render(self, frame);
    }
}

/// Keys shared by the run form and the settings form.
fn form_key(key: KeyCode, submit: Action) -> Option<Action> {
    match key {
        KeyCode::Esc => Some(Action::Dismiss),
        KeyCode::Enter => Some(submit),
        KeyCode::Tab | KeyCode::Down => Some(Action::Form(FormInput::FocusNext)),
        KeyCode::BackTab | KeyCode::Up => Some(Action::Form(FormInput::FocusPrev)),
        KeyCode::Right => Some(Action::Form(FormInput::OptionNext)),
        KeyCode::Left => Some(Action::Form(FormInput::OptionPrev)),
        KeyCode::Backspace => Some(Action::Form(FormInput::Backspace)),
        KeyCode::Char(c) => Some(Action::Form(FormInput::Char(c))),
        _ => None,
    }
}

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard until the user quits.
pub fn run_dashboard(driver: Driver<SystemClock>) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal =
        init_terminal().map_err(|e| QaRunError::Terminal(format!("failed to start: {}", e)))?;

    let mut app = DashboardApp::new(driver);
    tracing::info!("Dashboard started");

    let result = event_loop(&mut terminal, &mut app);

    app.driver.shutdown();
    restore_terminal(&mut terminal)
        .map_err(|e| QaRunError::Terminal(format!("failed to restore: {}", e)))?;
    tracing::info!("Dashboard closed");

    result
}

fn event_loop<C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut DashboardApp<C>,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::lifecycle::Phase;
    use crate::test_utils::seeded_driver;

    fn app() -> DashboardApp<ManualClock> {
        DashboardApp::new(seeded_driver())
    }

    fn phase(app: &DashboardApp<ManualClock>) -> Phase {
        app.driver().dashboard().phase()
    }

    fn type_str(app: &mut DashboardApp<ManualClock>, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        a.handle_key(KeyCode::Char('q'));
        assert!(a.should_quit());

        let mut a = app();
        a.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(a.should_quit());
    }

    #[test]
    fn test_search_mode_edits_query() {
        let mut a = app();
        a.handle_key(KeyCode::Char('/'));
        assert_eq!(a.input_mode(), InputMode::Search);

        type_str(&mut a, "QA-2023q");
        a.handle_key(KeyCode::Backspace);
        assert!(!a.should_quit());
        assert_eq!(a.driver().dashboard().filters().query, "QA-2023");
        assert_eq!(a.driver().dashboard().visible_projects().len(), 1);

        a.handle_key(KeyCode::Esc);
        assert_eq!(a.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_navigation_is_clamped_to_visible_projects() {
        let mut a = app();
        for _ in 0..10 {
            a.handle_key(KeyCode::Down);
        }
        assert_eq!(a.selected_project(), 4);

        a.handle_key(KeyCode::Char('s'));
        assert_eq!(a.selected_project(), 2);

        a.handle_key(KeyCode::Up);
        assert_eq!(a.selected_project(), 1);
    }

    #[test]
    fn test_run_keys_trigger_and_show_history() {
        let mut a = app();
        a.handle_key(KeyCode::Char('r'));
        assert_eq!(phase(&a), Phase::ConfiguringRun);

        type_str(&mut a, "REF-1");
        a.handle_key(KeyCode::Tab);
        a.handle_key(KeyCode::Right);
        a.handle_key(KeyCode::Enter);
        assert_eq!(phase(&a), Phase::Triggered);

        let run = a.driver().dashboard().latest_run().unwrap();
        assert_eq!(run.project_id, "QA-2023-045");
        assert_eq!(run.reference_id, "REF-1");

        a.driver().clock().advance(Duration::from_millis(150));
        a.tick();
        assert_eq!(phase(&a), Phase::Viewing);
    }

    #[test]
    fn test_q_types_into_run_form_instead_of_quitting() {
        let mut a = app();
        a.handle_key(KeyCode::Char('r'));
        a.handle_key(KeyCode::Char('q'));
        assert!(!a.should_quit());
        a.handle_key(KeyCode::Esc);
        assert_eq!(phase(&a), Phase::Idle);
        assert!(a.driver().dashboard().latest_run().is_none());
    }

    #[test]
    fn test_history_navigation_and_detail() {
        let mut a = app();
        a.handle_key(KeyCode::Char('j'));
        a.handle_key(KeyCode::Char('h'));
        assert_eq!(phase(&a), Phase::Viewing);

        for _ in 0..10 {
            a.handle_key(KeyCode::Down);
        }
        assert_eq!(a.selected_row(), 3);

        a.handle_key(KeyCode::Enter);
        let detail = a.driver().dashboard().selected_result().unwrap();
        assert_eq!(detail.record.result_id, "RES-1002-D");
        assert_eq!(detail.record.project_id, "QA-2024-012");

        a.handle_key(KeyCode::Esc);
        assert!(a.driver().dashboard().selected_result().is_none());
        assert_eq!(phase(&a), Phase::Viewing);

        a.handle_key(KeyCode::Esc);
        assert_eq!(phase(&a), Phase::Idle);
    }

    #[test]
    fn test_enter_on_catalog_opens_history_as_documented() {
        let mut a = app();
        a.handle_key(KeyCode::Enter);
        assert_eq!(phase(&a), Phase::Viewing);
        assert!(a.driver().dashboard().latest_run().is_none());

        assert!(KEY_HELP.contains("h or Enter  Open the selected project's history"));
        assert!(KEY_HELP.contains("r           Run the selected project"));
    }

    #[test]
    fn test_settings_form_saves_back_to_idle() {
        let mut a = app();
        a.handle_key(KeyCode::Char('c'));
        assert_eq!(phase(&a), Phase::EditingSettings);
        a.handle_key(KeyCode::Right);
        a.handle_key(KeyCode::Enter);
        assert_eq!(phase(&a), Phase::Idle);
    }

    #[test]
    fn test_open_keys_ignored_when_nothing_matches() {
        let mut a = app();
        a.handle_key(KeyCode::Char('/'));
        type_str(&mut a, "zzz");
        a.handle_key(KeyCode::Enter);
        a.handle_key(KeyCode::Char('r'));
        assert_eq!(phase(&a), Phase::Idle);
    }

    #[test]
    fn test_poll_timeout_follows_next_timer() {
        let mut a = app();
        assert_eq!(a.poll_timeout(), MAX_POLL_INTERVAL);
        a.handle_key(KeyCode::Char('r'));
        a.handle_key(KeyCode::Enter);
        assert_eq!(a.poll_timeout(), MAX_POLL_INTERVAL);

        a.driver().clock().advance(Duration::from_millis(90));
        assert_eq!(a.poll_timeout(), Duration::from_millis(60));
    }
}

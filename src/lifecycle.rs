//! Dashboard state and the run lifecycle.
//!
//! All UI state lives in [`Dashboard`] and only changes through
//! [`Dashboard::dispatch`]. A dispatch returns the [`Effect`]s the host must
//! carry out (starting or cancelling timers); it never touches a clock or a
//! timer itself, so every transition can be tested without waiting.
//!
//! The run lifecycle moves through [`Phase::Idle`] →
//! [`Phase::ConfiguringRun`] → [`Phase::Triggered`] → [`Phase::Viewing`].
//! Dismissing any modal returns to `Idle`.

use crate::catalog::{Catalog, Filters, ViewMode};
use crate::fixtures::DataProvider;
use crate::history::{History, ResultDetail};
use crate::model::{Environment, Project, ResultRecord, RunRecord, RunRequest};
use crate::ticker::{self, TickOutcome, Timing};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::time::Duration;

/// Coarse lifecycle state derived from the open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No project selected.
    Idle,
    /// The run form is open.
    ConfiguringRun,
    /// The run was submitted; history opens after a short delay.
    Triggered,
    /// The history view is open.
    Viewing,
    /// The project settings form is open.
    EditingSettings,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::ConfiguringRun => "Configuring Run",
            Phase::Triggered => "Triggered",
            Phase::Viewing => "Viewing",
            Phase::EditingSettings => "Editing Settings",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunField {
    #[default]
    ReferenceId,
    Environment,
    ExecutionDate,
}

impl RunField {
    fn next(self) -> Self {
        match self {
            RunField::ReferenceId => RunField::Environment,
            RunField::Environment => RunField::ExecutionDate,
            RunField::ExecutionDate => RunField::ReferenceId,
        }
    }

    fn prev(self) -> Self {
        match self {
            RunField::ReferenceId => RunField::ExecutionDate,
            RunField::Environment => RunField::ReferenceId,
            RunField::ExecutionDate => RunField::Environment,
        }
    }
}

/// Input captured by the run form. No field is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunForm {
    pub reference_id: String,
    pub environment: Environment,
    /// Raw date text as typed, expected as `YYYY-MM-DD`.
    pub execution_date: String,
    pub focus: RunField,
}

impl RunForm {
    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// The parsed execution date; blank or malformed text yields `None`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.execution_date.trim(), "%Y-%m-%d").ok()
    }

    pub fn to_request(&self, project_id: &str) -> RunRequest {
        RunRequest {
            reference_id: self.reference_id.trim().to_string(),
            environment: self.environment,
            execution_date: self.parsed_date(),
            project_id: project_id.to_string(),
        }
    }

    fn apply(&mut self, input: FormInput) {
        match (input, self.focus) {
            (FormInput::FocusNext, _) => self.focus = self.focus.next(),
            (FormInput::FocusPrev, _) => self.focus = self.focus.prev(),
            (FormInput::Char(c), RunField::ReferenceId) => self.reference_id.push(c),
            (FormInput::Char(c), RunField::ExecutionDate) => self.execution_date.push(c),
            (FormInput::Backspace, RunField::ReferenceId) => {
                self.reference_id.pop();
            }
            (FormInput::Backspace, RunField::ExecutionDate) => {
                self.execution_date.pop();
            }
            (FormInput::OptionNext, RunField::Environment) => {
                self.environment = self.environment.next()
            }
            (FormInput::OptionPrev, RunField::Environment) => {
                self.environment = self.environment.prev()
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunFrequency {
    #[default]
    OnDemand,
    Daily,
    Weekly,
}

impl RunFrequency {
    pub fn label(&self) -> &'static str {
        match self {
            RunFrequency::OnDemand => "On demand",
            RunFrequency::Daily => "Daily",
            RunFrequency::Weekly => "Weekly",
        }
    }

    fn next(self) -> Self {
        match self {
            RunFrequency::OnDemand => RunFrequency::Daily,
            RunFrequency::Daily => RunFrequency::Weekly,
            RunFrequency::Weekly => RunFrequency::OnDemand,
        }
    }

    fn prev(self) -> Self {
        match self {
            RunFrequency::OnDemand => RunFrequency::Weekly,
            RunFrequency::Daily => RunFrequency::OnDemand,
            RunFrequency::Weekly => RunFrequency::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Frequency,
    Recipients,
}

pub const DEFAULT_RECIPIENTS: &str = "qa-team@example.com";

/// The per-project settings form. Saving it does not change the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub frequency: RunFrequency,
    pub recipients: String,
    pub focus: SettingsField,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            frequency: RunFrequency::default(),
            recipients: DEFAULT_RECIPIENTS.to_string(),
            focus: SettingsField::default(),
        }
    }
}

impl SettingsForm {
    fn apply(&mut self, input: FormInput) {
        match (input, self.focus) {
            (FormInput::FocusNext | FormInput::FocusPrev, SettingsField::Frequency) => {
                self.focus = SettingsField::Recipients
            }
            (FormInput::FocusNext | FormInput::FocusPrev, SettingsField::Recipients) => {
                self.focus = SettingsField::Frequency
            }
            (FormInput::OptionNext, SettingsField::Frequency) => {
                self.frequency = self.frequency.next()
            }
            (FormInput::OptionPrev, SettingsField::Frequency) => {
                self.frequency = self.frequency.prev()
            }
            (FormInput::Char(c), SettingsField::Recipients) => self.recipients.push(c),
            (FormInput::Backspace, SettingsField::Recipients) => {
                self.recipients.pop();
            }
            _ => {}
        }
    }
}

/// Keyboard-level edits to whichever form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    FocusNext,
    FocusPrev,
    Char(char),
    Backspace,
    OptionNext,
    OptionPrev,
}

/// The modal currently shown over the catalog. Holding a project here is
/// what makes it the active project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    RunForm {
        project: Project,
        form: RunForm,
    },
    Settings {
        project: Project,
        form: SettingsForm,
    },
    Triggered {
        project: Project,
    },
    History {
        project: Project,
        selected: Option<usize>,
    },
}

/// Everything a user (or a timer) can ask the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetQuery(String),
    PushQueryChar(char),
    PopQueryChar,
    CycleStatusFilter,
    CycleDepartmentFilter,
    SetStatusFilter(String),
    SetDepartmentFilter(String),
    ResetFilters,
    ToggleViewMode,
    OpenRun(String),
    OpenSettings(String),
    OpenHistory(String),
    Form(FormInput),
    /// Replace the run form wholesale (used by non-interactive callers).
    FillRunForm(RunForm),
    SubmitRun,
    SaveSettings,
    /// Close whatever modal is open and release the active project.
    Dismiss,
    ViewResult(usize),
    CloseResult,
    /// Timer: the post-trigger delay elapsed.
    ShowHistory,
    /// Timer: one progress step.
    Tick,
}

/// Timer work the host must perform after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartTicker,
    CancelTicker,
    ScheduleHistory,
    CancelHistory,
}

/// A reading of the clock, passed into every dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub elapsed: Duration,
    pub epoch_millis: i64,
}

impl Moment {
    pub fn new(elapsed: Duration, epoch_millis: i64) -> Self {
        Self {
            elapsed,
            epoch_millis,
        }
    }

    fn wall_time(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.epoch_millis)
            .unwrap_or_default()
            .naive_utc()
    }
}

/// Issues `RUN-<epoch millis>` ids that never repeat within a session,
/// even when two runs are triggered in the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct RunIdGenerator {
    last: Option<i64>,
}

impl RunIdGenerator {
    pub fn next(&mut self, epoch_millis: i64) -> String {
        let millis = match self.last {
            Some(last) if epoch_millis <= last => last + 1,
            _ => epoch_millis,
        };
        self.last = Some(millis);
        format!("RUN-{}", millis)
    }
}

/// Top-level dashboard state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    catalog: Catalog,
    history: History,
    status_options: Vec<String>,
    department_options: Vec<String>,
    filters: Filters,
    view_mode: ViewMode,
    default_environment: Environment,
    tick_step: u8,
    modal: Modal,
    latest_run: Option<RunRecord>,
    run_ids: RunIdGenerator,
}

impl Dashboard {
    pub fn new(provider: &dyn DataProvider, timing: &Timing) -> Self {
        let catalog = Catalog::new(provider.projects());
        let status_options = catalog.status_options();
        let department_options = catalog.department_options();
        Self {
            catalog,
            history: History::new(provider.history(), provider.checkpoints()),
            status_options,
            department_options,
            filters: Filters::default(),
            view_mode: ViewMode::default(),
            default_environment: Environment::default(),
            tick_step: timing.tick_step,
            modal: Modal::None,
            latest_run: None,
            run_ids: RunIdGenerator::default(),
        }
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_default_environment(mut self, environment: Environment) -> Self {
        self.default_environment = environment;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn status_options(&self) -> &[String] {
        &self.status_options
    }

    pub fn department_options(&self) -> &[String] {
        &self.department_options
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn latest_run(&self) -> Option<&RunRecord> {
        self.latest_run.as_ref()
    }

    /// Projects passing the current filters.
    pub fn visible_projects(&self) -> Vec<&Project> {
        self.catalog.filter(&self.filters)
    }

    pub fn phase(&self) -> Phase {
        match self.modal {
            Modal::None => Phase::Idle,
            Modal::RunForm { .. } => Phase::ConfiguringRun,
            Modal::Settings { .. } => Phase::EditingSettings,
            Modal::Triggered { .. } => Phase::Triggered,
            Modal::History { .. } => Phase::Viewing,
        }
    }

    pub fn active_project(&self) -> Option<&Project> {
        match &self.modal {
            Modal::None => None,
            Modal::RunForm { project, .. }
            | Modal::Settings { project, .. }
            | Modal::Triggered { project }
            | Modal::History { project, .. } => Some(project),
        }
    }

    /// History rows for the project whose history is open.
    pub fn history_rows(&self) -> Vec<ResultRecord> {
        match &self.modal {
            Modal::History { project, .. } => {
                self.history.rows(&project.id, self.latest_run.as_ref())
            }
            _ => Vec::new(),
        }
    }

    /// History rows for any project, whether or not its history is open.
    pub fn history_rows_for(&self, project_id: &str) -> Vec<ResultRecord> {
        self.history.rows(project_id, self.latest_run.as_ref())
    }

    /// Detail for the selected history row, if one is selected.
    pub fn selected_result(&self) -> Option<ResultDetail> {
        match &self.modal {
            Modal::History {
                selected: Some(idx),
                ..
            } => self
                .history_rows()
                .into_iter()
                .nth(*idx)
                .map(|row| self.history.detail(row)),
            _ => None,
        }
    }

    /// Whether the latest run still has ticks to go.
    pub fn run_in_progress(&self) -> bool {
        self.latest_run
            .as_ref()
            .is_some_and(|run| !run.is_completed())
    }

    /// Apply an action and return the timer work it requires.
    pub fn dispatch(&mut self, action: Action, now: Moment) -> Vec<Effect> {
        match action {
            Action::SetQuery(query) => {
                self.filters.query = query;
                Vec::new()
            }
            Action::PushQueryChar(c) => {
                self.filters.query.push(c);
                Vec::new()
            }
            Action::PopQueryChar => {
                self.filters.query.pop();
                Vec::new()
            }
            Action::CycleStatusFilter => {
                self.filters.cycle_status(&self.status_options);
                Vec::new()
            }
            Action::CycleDepartmentFilter => {
                self.filters.cycle_department(&self.department_options);
                Vec::new()
            }
            Action::SetStatusFilter(status) => {
                self.filters.status = status;
                Vec::new()
            }
            Action::SetDepartmentFilter(department) => {
                self.filters.department = department;
                Vec::new()
            }
            Action::ResetFilters => {
                self.filters = Filters::default();
                Vec::new()
            }
            Action::ToggleViewMode => {
                self.view_mode = self.view_mode.toggle();
                Vec::new()
            }
            Action::OpenRun(id) => {
                self.open(&id, |project, env| Modal::RunForm {
                    project,
                    form: RunForm::with_environment(env),
                });
                Vec::new()
            }
            Action::OpenSettings(id) => {
                self.open(&id, |project, _| Modal::Settings {
                    project,
                    form: SettingsForm::default(),
                });
                Vec::new()
            }
            Action::OpenHistory(id) => {
                self.open(&id, |project, _| Modal::History {
                    project,
                    selected: None,
                });
                Vec::new()
            }
            Action::Form(input) => {
                match &mut self.modal {
                    Modal::RunForm { form, .. } => form.apply(input),
                    Modal::Settings { form, .. } => form.apply(input),
                    _ => {}
                }
                Vec::new()
            }
            Action::FillRunForm(filled) => {
                if let Modal::RunForm { form, .. } = &mut self.modal {
                    *form = filled;
                }
                Vec::new()
            }
            Action::SubmitRun => self.submit_run(now),
            Action::SaveSettings => {
                if let Modal::Settings { project, form } = &self.modal {
                    tracing::info!(
                        project = %project.id,
                        frequency = form.frequency.label(),
                        recipients = %form.recipients,
                        "Settings saved"
                    );
                    self.modal = Modal::None;
                }
                Vec::new()
            }
            Action::Dismiss => self.dismiss(),
            Action::ViewResult(idx) => {
                let row_count = self.history_rows().len();
                if let Modal::History { selected, .. } = &mut self.modal {
                    if idx < row_count {
                        *selected = Some(idx);
                    }
                }
                Vec::new()
            }
            Action::CloseResult => {
                if let Modal::History { selected, .. } = &mut self.modal {
                    *selected = None;
                }
                Vec::new()
            }
            Action::ShowHistory => {
                if let Modal::Triggered { project } = &self.modal {
                    self.modal = Modal::History {
                        project: project.clone(),
                        selected: None,
                    };
                }
                Vec::new()
            }
            Action::Tick => self.tick(now),
        }
    }

    /// Open a modal for a project. Only one modal is open at a time, and
    /// unknown project ids are ignored.
    fn open(&mut self, id: &str, make: impl FnOnce(Project, Environment) -> Modal) {
        if self.modal != Modal::None {
            return;
        }
        if let Some(project) = self.catalog.get(id) {
            self.modal = make(project.clone(), self.default_environment);
        }
    }

    fn submit_run(&mut self, now: Moment) -> Vec<Effect> {
        let Modal::RunForm { project, form } = &self.modal else {
            return Vec::new();
        };

        let request = form.to_request(&project.id);
        let run_id = self.run_ids.next(now.epoch_millis);
        let run = RunRecord::from_request(request, run_id, now.wall_time(), now.elapsed);

        tracing::info!(
            run_id = %run.run_id,
            project = %run.project_id,
            environment = %run.environment,
            "Run triggered"
        );

        self.modal = Modal::Triggered {
            project: project.clone(),
        };
        self.latest_run = Some(run);

        vec![Effect::StartTicker, Effect::ScheduleHistory]
    }

    fn dismiss(&mut self) -> Vec<Effect> {
        let effects = match self.modal {
            Modal::None => return Vec::new(),
            Modal::RunForm { .. } | Modal::Settings { .. } => Vec::new(),
            Modal::Triggered { .. } => {
                let mut effects = vec![Effect::CancelHistory];
                if self.run_in_progress() {
                    effects.push(Effect::CancelTicker);
                }
                effects
            }
            Modal::History { .. } => {
                if self.run_in_progress() {
                    vec![Effect::CancelTicker]
                } else {
                    Vec::new()
                }
            }
        };

        tracing::debug!(phase = %self.phase(), "Modal dismissed");
        self.modal = Modal::None;
        effects
    }

    fn tick(&mut self, now: Moment) -> Vec<Effect> {
        let Some(run) = self.latest_run.as_mut() else {
            return vec![Effect::CancelTicker];
        };

        let outcome = ticker::tick(run, self.tick_step, now.elapsed);
        match outcome {
            TickOutcome::Advanced(progress) => {
                tracing::trace!(run_id = %run.run_id, progress, "Run progress");
            }
            TickOutcome::Completed => tracing::info!(run_id = %run.run_id, "Run completed"),
            TickOutcome::Idle => {}
        }

        if outcome.is_final() {
            vec![Effect::CancelTicker]
        } else {
            Vec::new()
        }
    }
}

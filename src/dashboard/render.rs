//! Rendering for the dashboard. Every function here reads state and draws;
//! none of them change anything.

use super::app::{DashboardApp, InputMode};
use crate::catalog::{ViewMode, NO_MATCHES};
use crate::clock::Clock;
use crate::history::ResultDetail;
use crate::lifecycle::{
    Dashboard, Modal, Phase, RunField, RunForm, SettingsField, SettingsForm,
};
use crate::model::{CheckpointOutcome, Project, ProjectStatus, ResultStatus, RunRecord};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub(super) fn render<C: Clock>(app: &DashboardApp<C>, frame: &mut Frame) {
    let dashboard = app.driver().dashboard();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with view tabs
            Constraint::Length(3), // Filter bar
            Constraint::Min(0),    // Catalog
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(dashboard, frame, chunks[0]);
    render_filter_bar(app, frame, chunks[1]);
    render_catalog(dashboard, app.selected_project(), frame, chunks[2]);
    render_footer(app, frame, chunks[3]);

    match dashboard.modal() {
        Modal::None => {}
        Modal::RunForm { project, form } => render_run_form(project, form, frame),
        Modal::Settings { project, form } => render_settings(project, form, frame),
        Modal::Triggered { project } => render_triggered(dashboard, project, frame),
        Modal::History { project, .. } => {
            render_history(dashboard, project, app.selected_row(), frame);
            if let Some(detail) = dashboard.selected_result() {
                render_result_detail(&detail, frame);
            }
        }
    }
}

fn render_header(dashboard: &Dashboard, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = ViewMode::all().iter().map(|m| Line::from(m.name())).collect();
    let selected = ViewMode::all()
        .iter()
        .position(|m| *m == dashboard.view_mode())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" qarun "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_filter_bar<C: Clock>(app: &DashboardApp<C>, frame: &mut Frame, area: Rect) {
    let filters = app.driver().dashboard().filters();
    let searching = app.input_mode() == InputMode::Search;

    let query_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if searching { "▏" } else { "" };

    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{}", filters.query, cursor), query_style),
        Span::styled("  Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(filters.status.clone(), Style::default().fg(Color::Cyan)),
        Span::styled("  Department: ", Style::default().fg(Color::DarkGray)),
        Span::styled(filters.department.clone(), Style::default().fg(Color::Cyan)),
    ]);

    let border_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Filters "),
    );
    frame.render_widget(bar, area);
}

fn render_catalog(dashboard: &Dashboard, selected: usize, frame: &mut Frame, area: Rect) {
    let projects = dashboard.visible_projects();
    let title = format!(
        " Projects ({}/{}) ",
        projects.len(),
        dashboard.catalog().len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if projects.is_empty() {
        let message = Paragraph::new(NO_MATCHES)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    match dashboard.view_mode() {
        ViewMode::Cards => render_cards(&projects, selected, block, frame, area),
        ViewMode::Table => render_table(&projects, selected, block, frame, area),
    }
}

fn render_cards(
    projects: &[&Project],
    selected: usize,
    block: Block,
    frame: &mut Frame,
    area: Rect,
) {
    let items: Vec<ListItem> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let is_selected = i == selected;
            let id_style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            };

            let text = Text::from(vec![
                Line::from(vec![
                    Span::styled(
                        if is_selected { "▶ " } else { "  " },
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(p.id.clone(), id_style),
                    Span::styled(
                        format!("  [{}]", p.status.label()),
                        Style::default().fg(project_status_color(p.status)),
                    ),
                    Span::styled(
                        format!("  {} · {}", p.department, p.domain),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::raw(format!("    {}", p.description))),
                Line::from(Span::styled(
                    format!("    Last run: {}", p.last_run.format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ]);
            ListItem::new(text)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_table(
    projects: &[&Project],
    selected: usize,
    block: Block,
    frame: &mut Frame,
    area: Rect,
) {
    let header = Row::new(["ID", "Status", "Department", "Domain", "Last Run"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let row = Row::new(vec![
                Cell::from(p.id.clone()),
                Cell::from(p.status.label())
                    .style(Style::default().fg(project_status_color(p.status))),
                Cell::from(p.department.clone()),
                Cell::from(p.domain.clone()),
                Cell::from(p.last_run.format("%Y-%m-%d").to_string()),
            ]);
            if i == selected {
                row.style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Length(13),
        Constraint::Min(20),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_footer<C: Clock>(app: &DashboardApp<C>, frame: &mut Frame, area: Rect) {
    let dashboard = app.driver().dashboard();
    let help_text = match dashboard.modal() {
        Modal::None if app.input_mode() == InputMode::Search => {
            " Type to search | Backspace: delete | Enter/Esc: done "
        }
        Modal::None => {
            " /: search | s: status | d: department | x: clear | v: view | ↑↓: navigate | r: run | c: configure | h: history | q: quit "
        }
        Modal::RunForm { .. } => " Tab: next field | ←→: environment | Enter: trigger | Esc: cancel ",
        Modal::Settings { .. } => " Tab: next field | ←→: frequency | Enter: save | Esc: cancel ",
        Modal::Triggered { .. } => " Opening history... | Esc: close ",
        Modal::History { selected: Some(_), .. } => " Enter/Esc: close detail ",
        Modal::History { .. } => " ↑↓: navigate | Enter: details | Esc: close ",
    };
    let footer = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

fn modal_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan))
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:<16}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}

fn render_run_form(project: &Project, form: &RunForm, frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let date_hint = if form.execution_date.trim().is_empty() {
        "YYYY-MM-DD".to_string()
    } else {
        form.execution_date.clone()
    };

    let lines = vec![
        Line::from(Span::styled(
            project.description.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field_line(
            "Reference ID",
            form.reference_id.clone(),
            form.focus == RunField::ReferenceId,
        ),
        field_line(
            "Environment",
            format!("◀ {} ▶", form.environment),
            form.focus == RunField::Environment,
        ),
        field_line(
            "Execution date",
            date_hint,
            form.focus == RunField::ExecutionDate,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: trigger run   Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(modal_block(format!(" Run {} ", project.id)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_settings(project: &Project, form: &SettingsForm, frame: &mut Frame) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        field_line(
            "Run frequency",
            format!("◀ {} ▶", form.frequency.label()),
            form.focus == SettingsField::Frequency,
        ),
        field_line(
            "Notify",
            form.recipients.clone(),
            form.focus == SettingsField::Recipients,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: save   Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph =
        Paragraph::new(lines).block(modal_block(format!(" Configure {} ", project.id)));
    frame.render_widget(paragraph, area);
}

fn run_gauge(run: &RunRecord) -> Gauge<'static> {
    let color = if run.is_completed() {
        Color::Green
    } else {
        Color::Yellow
    };
    Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Active Run {} ", run.run_id)),
        )
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(run.progress))
        .label(format!("{}% {}", run.progress, run.status))
}

fn render_triggered(dashboard: &Dashboard, project: &Project, frame: &mut Frame) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = modal_block(format!(" {} ", Phase::Triggered));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let message = Paragraph::new(format!("Run triggered for {}", project.id))
        .style(Style::default().fg(Color::Green));
    frame.render_widget(message, chunks[0]);

    if let Some(run) = dashboard.latest_run() {
        frame.render_widget(run_gauge(run), chunks[1]);
    }
}

fn render_history(dashboard: &Dashboard, project: &Project, selected: usize, frame: &mut Frame) {
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let rows = dashboard.history_rows();
    let block = modal_block(format!(" History: {} ({}) ", project.id, rows.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active_run = dashboard
        .latest_run()
        .filter(|run| run.project_id == project.id);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if active_run.is_some() { 3 } else { 0 }),
            Constraint::Min(0),
        ])
        .split(inner);

    if let Some(run) = active_run {
        frame.render_widget(run_gauge(run), chunks[0]);
    }

    let header = Row::new(["Result", "Executed", "Status", "Duration"]).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let marker = if i == selected { "▶ " } else { "  " };
            let row = Row::new(vec![
                Cell::from(format!("{}{}", marker, r.result_id)),
                Cell::from(r.display_date()),
                Cell::from(r.status.label())
                    .style(Style::default().fg(result_status_color(r.status))),
                Cell::from(r.duration.clone()),
            ]);
            if i == selected {
                row.style(Style::default().add_modifier(Modifier::BOLD))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(21),
        Constraint::Length(9),
        Constraint::Min(8),
    ];
    frame.render_widget(Table::new(table_rows, widths).header(header), chunks[1]);
}

fn render_result_detail(detail: &ResultDetail, frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let record = &detail.record;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Project:    ", Style::default().fg(Color::DarkGray)),
            Span::styled(record.project_id.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Executed:   ", Style::default().fg(Color::DarkGray)),
            Span::raw(record.display_date()),
        ]),
        Line::from(vec![
            Span::styled("Status:     ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("● {}", record.status.label()),
                Style::default().fg(result_status_color(record.status)),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Checkpoints:",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    for checkpoint in &detail.checkpoints {
        let (symbol, color) = match checkpoint.outcome {
            CheckpointOutcome::Pass => ("✓", Color::Green),
            CheckpointOutcome::Fail => ("✗", Color::Red),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", symbol), Style::default().fg(color)),
            Span::styled(format!("{:<24}", checkpoint.name), Style::default().fg(Color::White)),
            Span::styled(
                format!("{:<5}", checkpoint.outcome.label()),
                Style::default().fg(color),
            ),
            Span::raw(format!("{:>3}", checkpoint.score)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter or Esc to close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(modal_block(format!(" Result {} ", record.result_id)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn project_status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::Active => Color::Green,
        ProjectStatus::Draft => Color::Yellow,
        ProjectStatus::Archived => Color::DarkGray,
    }
}

fn result_status_color(status: ResultStatus) -> Color {
    match status {
        ResultStatus::Pass => Color::Green,
        ResultStatus::Fail => Color::Red,
        ResultStatus::Partial => Color::Yellow,
        ResultStatus::NotRated => Color::DarkGray,
    }
}

/// Create a centered rectangle of given percentage width/height
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::test_utils::seeded_driver;
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn app() -> DashboardApp<ManualClock> {
        DashboardApp::new(seeded_driver())
    }

    fn draw(app: &DashboardApp<ManualClock>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 50)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_cards_by_default() {
        let screen = draw(&app());
        assert!(screen.contains("Projects (5/5)"));
        assert!(screen.contains("QA-2023-045"));
        assert!(screen.contains("Last run:"));
    }

    #[test]
    fn test_renders_table_view() {
        let mut a = app();
        a.handle_key(KeyCode::Char('v'));
        let screen = draw(&a);
        assert!(screen.contains("Department"));
        assert!(screen.contains("QA-2024-099"));
        assert!(!screen.contains("Last run:"));
    }

    #[test]
    fn test_renders_placeholder_when_nothing_matches() {
        let mut a = app();
        a.handle_key(KeyCode::Char('/'));
        for c in "zzz".chars() {
            a.handle_key(KeyCode::Char(c));
        }
        let screen = draw(&a);
        assert!(screen.contains(NO_MATCHES));
        assert!(screen.contains("Projects (0/5)"));
    }

    #[test]
    fn test_renders_run_form() {
        let mut a = app();
        a.handle_key(KeyCode::Char('r'));
        let screen = draw(&a);
        assert!(screen.contains("Run QA-2023-045"));
        assert!(screen.contains("Reference ID"));
        assert!(screen.contains("DEV"));
        assert!(screen.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_renders_history_with_active_run_and_detail() {
        let mut a = app();
        a.handle_key(KeyCode::Char('r'));
        a.handle_key(KeyCode::Enter);
        a.driver().clock().advance(Duration::from_millis(1000));
        a.tick();

        let screen = draw(&a);
        assert!(screen.contains("History: QA-2023-045 (5)"));
        assert!(screen.contains("RES-NEW"));
        assert!(screen.contains("20% Running"));

        a.handle_key(KeyCode::Down);
        a.handle_key(KeyCode::Enter);
        let screen = draw(&a);
        assert!(screen.contains("Result RES-1025-A"));
        assert!(screen.contains("Schema Validation"));
        assert!(screen.contains("Critical Field Checks"));
    }

    #[test]
    fn test_renders_settings_modal() {
        let mut a = app();
        a.handle_key(KeyCode::Char('c'));
        let screen = draw(&a);
        assert!(screen.contains("Configure QA-2023-045"));
        assert!(screen.contains("On demand"));
        assert!(screen.contains("qa-team@example.com"));
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 60);
    }
}

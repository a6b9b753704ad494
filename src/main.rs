//! Student Admin TUI - Actor-based CRUD console for student records
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls to the student API

use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use student_admin_tui::app::{AppActor, AppState, EditDialog};
use student_admin_tui::config::Config;
use student_admin_tui::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use student_admin_tui::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use student_admin_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use student_admin_tui::models::{StudentDraft, StudentField};
use student_admin_tui::network::{NetworkActor, StudentClient};
use student_admin_tui::ui;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Fail before touching the terminal so errors stay readable
    let config = Config::load().context("Failed to load configuration")?;
    let client = StudentClient::new(&config.api_base_url, config.timeout())?;
    tracing::info!(base_url = %client.base_url(), version = APP_VERSION, "Starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    let network_handle = tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let state = AppState::new(
        config.programs.clone(),
        config.notification_ttl(),
        config.api_base_url.clone(),
    );
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    // Let in-flight requests be aborted cleanly
    let _ = tokio::time::timeout(Duration::from_secs(1), network_handle).await;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.dialog.is_open(),
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(42), Constraint::Min(0)])
        .split(main_chunks[1]);

    draw_form(f, state, content[0]);
    draw_table(f, state, content[1]);
    draw_status_bar(f, state, main_chunks[2]);

    if let EditDialog::Open { draft, field, saving, .. } = &state.dialog {
        draw_edit_dialog(f, state, draft, *field, saving.is_some(), area);
    }

    draw_notifications(f, state, main_chunks[1]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let loading = if state.is_loading { " [...]" } else { "" };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::styled(format!(" {}", state.api_base_url), Style::default().fg(Color::Gray)),
        Span::styled(loading, Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Text shown for a field; the program shows its label
fn field_display(state: &RenderState, field: StudentField, value: &str) -> String {
    if field.is_text() {
        return value.to_string();
    }
    match state.program_label(value) {
        Some(label) => format!("◀ {} ▶", label),
        None if value.is_empty() => "◀ select a program ▶".to_string(),
        None => format!("◀ {} ▶", value),
    }
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Form && !state.dialog.is_open();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
        .title(" New Student (s:create c:clear) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    for (i, field) in StudentField::ALL.iter().enumerate() {
        let selected = is_focused && state.form_field == *field;
        let editing = selected && state.input_mode == InputMode::Editing;
        let text = field_display(state, *field, state.form.get(*field));
        let title = format!(" {} ", field.label());
        f.render_widget(ui::render_input(&text, &title, selected, editing), rows[i]);

        if editing {
            set_cursor(f, rows[i], state.form.get(*field), state.cursor_position);
        }
    }
}

fn draw_table(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Table && !state.dialog.is_open();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
        .title(format!(" Students ({}) ", state.students.len()));

    if state.students.is_empty() {
        let message = if state.has_loaded {
            "No students yet. Create one with the form on the left."
        } else {
            "Loading students..."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = state
        .students
        .iter()
        .enumerate()
        .map(|(i, s)| ui::student_row(s, is_focused && i == state.selected_row))
        .collect();

    let highlight = if is_focused {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let table = Table::new(rows, ui::column_widths())
        .header(ui::header_row())
        .block(block)
        .row_highlight_style(highlight);

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected_row));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_edit_dialog(
    f: &mut Frame,
    state: &RenderState,
    draft: &StudentDraft,
    active_field: StudentField,
    saving: bool,
    area: Rect,
) {
    let popup_area = centered_rect(50, 70, area);
    let title = if saving {
        " Edit Student - saving... "
    } else {
        " Edit Student (s:save Esc:close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);

    f.render_widget(Clear, popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    for (i, field) in StudentField::ALL.iter().enumerate() {
        let selected = active_field == *field;
        let editing = selected && state.input_mode == InputMode::Editing;
        let text = field_display(state, *field, draft.get(*field));
        let title = format!(" {} ", field.label());
        f.render_widget(ui::render_input(&text, &title, selected, editing), rows[i]);

        if editing {
            set_cursor(f, rows[i], draft.get(*field), state.cursor_position);
        }
    }
}

fn set_cursor(f: &mut Frame, area: Rect, text: &str, cursor_position: usize) {
    // cursor_position is a byte offset; the terminal wants columns
    let column = text
        .get(..cursor_position)
        .map(|s| s.chars().count())
        .unwrap_or(0) as u16;
    let max_x = area.x + area.width.saturating_sub(2);
    let cursor_x = (area.x + column + 1).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, area.y + 1));
}

fn draw_notifications(f: &mut Frame, state: &RenderState, area: Rect) {
    if state.notifications.is_empty() {
        return;
    }

    let width = area.width.min(60);
    let height = (state.notifications.len() as u16).min(area.height);
    let toast_area = Rect::new(area.x, area.y + area.height - height, width, height);

    let lines: Vec<Line> = state
        .notifications
        .iter()
        .map(|n| {
            Line::from(Span::styled(
                format!(" {} ", n.message),
                Style::default()
                    .fg(Color::Black)
                    .bg(ui::notification_color(n.kind)),
            ))
        })
        .collect();

    f.render_widget(Clear, toast_area);
    f.render_widget(Paragraph::new(lines), toast_area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " Esc/Enter:stop editing | ←/→:move | Tab:next field "
    } else if state.dialog.is_open() {
        " ↑/↓:field | e:edit | ←/→:program | s:save | Esc:close "
    } else if state.active_panel == Panel::Table {
        " Tab:panel | ↑/↓:row | e:edit | d:delete | r:refresh | ?:help | q:quit "
    } else {
        " Tab:panel | ↑/↓:field | e:edit | ←/→:program | s:create | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 STUDENT ADMIN - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch between form and table
   ↑ / ↓              Move between fields or rows
   r                  Reload the student list

 NEW STUDENT FORM
   e / Enter          Edit the selected field
   ← / →              Choose a program
   s / Ctrl+S         Create the student
   c                  Clear the form

 STUDENT TABLE
   e / Enter          Edit the selected student
   d / Delete         Delete the selected student

 EDIT DIALOG
   e / Enter          Edit the selected field
   s / Ctrl+S         Save changes
   Esc                Close without saving

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

use crate::application::{App, AppMode, Phase};
use crate::domain::FieldKind;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    match app.phase() {
        Phase::Editing | Phase::Submitting => render_wizard(f, app),
        Phase::Succeeded | Phase::Failed => render_result(f, app),
    }

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_wizard(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_progress(f, app, chunks[1]);
    render_field(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "{} | Step {} of {}",
        app.template.title,
        app.current_step() + 1,
        app.step_count()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, app: &App, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(app.progress_percent());
    f.render_widget(gauge, area);
}

fn render_field(f: &mut Frame, app: &App, area: Rect) {
    let field = app.active_field();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(field.label.clone());

    let lines = match &field.kind {
        FieldKind::Text { placeholder } => text_field_lines(app, placeholder),
        FieldKind::Select { options } => {
            let chosen = app.record().scalar(&field.id);
            options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let marker = if chosen == Some(option.as_str()) {
                        "(x)"
                    } else {
                        "( )"
                    };
                    option_line(index == app.option_cursor, marker, option)
                })
                .collect()
        }
        FieldKind::MultiSelect { options } => {
            let selected = app.record().selection(&field.id);
            options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let marker = if selected.contains(option) { "[x]" } else { "[ ]" };
                    option_line(index == app.option_cursor, marker, option)
                })
                .collect()
        }
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn text_field_lines(app: &App, placeholder: &str) -> Vec<Line<'static>> {
    if app.input.is_empty() {
        return vec![Line::from(Span::styled(
            placeholder.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))];
    }

    // Inverted span marks the cursor; a trailing block stands in for a
    // cursor at the end of the buffer.
    let cursor = app.cursor_position.min(app.input.len());
    let before: String = app.input.chars().take(cursor).collect();
    let at: String = app.input.chars().skip(cursor).take(1).collect();
    let after: String = app.input.chars().skip(cursor + 1).collect();

    let mut spans = vec![Span::raw(before)];
    if at.is_empty() {
        spans.push(Span::styled(
            " ".to_string(),
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    } else {
        spans.push(Span::styled(
            at,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(after));
    }
    vec![Line::from(spans)]
}

fn option_line(highlighted: bool, marker: &str, option: &str) -> Line<'static> {
    let style = if highlighted {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{} {}", marker, option), style))
}

fn render_result(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header =
        Paragraph::new(app.template.title.clone()).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, chunks[0]);

    let message_style = if app.phase() == Phase::Succeeded {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    let mut lines = Vec::new();
    if app.celebrate() {
        for row in 0..3 {
            lines.push(confetti_line(row, chunks[1].width));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        app.result_message().unwrap_or("").to_string(),
        message_style,
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press r to fill another form, q to quit".to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    if app.celebrate() {
        lines.push(Line::from(""));
        for row in 3..6 {
            lines.push(confetti_line(row, chunks[1].width));
        }
    }

    let result = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(result, chunks[1]);

    render_status_bar(f, app, chunks[2]);
}

/// Deterministic scatter of colored glyphs for the celebration screen.
fn confetti_line(row: u16, width: u16) -> Line<'static> {
    const GLYPHS: [char; 4] = ['*', 'o', '+', '.'];
    const COLORS: [Color; 5] = [
        Color::Magenta,
        Color::Yellow,
        Color::Cyan,
        Color::Green,
        Color::Red,
    ];

    let mut spans = Vec::new();
    for col in 0..width.saturating_sub(2) {
        let seed = (row as usize * 31 + col as usize * 17) % 11;
        if seed < 3 {
            let glyph = GLYPHS[(row as usize + col as usize) % GLYPHS.len()];
            let color = COLORS[(row as usize * 3 + col as usize) % COLORS.len()];
            spans.push(Span::styled(
                glyph.to_string(),
                Style::default().fg(color),
            ));
        } else {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.phase() {
        Phase::Editing => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                let action = if app.is_last_step() {
                    "Enter: submit"
                } else {
                    "Enter: next"
                };
                match app.active_field().kind {
                    FieldKind::Text { .. } => format!(
                        "Type to fill | {} | Shift+Tab: back | F1: help | Esc: quit",
                        action
                    ),
                    FieldKind::Select { .. } | FieldKind::MultiSelect { .. } => format!(
                        "Up/Down: highlight | Space: select | {} | Shift+Tab: back | F1: help | Esc: quit",
                        action
                    ),
                }
            }
        }
        Phase::Submitting => "Submitting your application...".to_string(),
        Phase::Succeeded | Phase::Failed => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "r: fill another form | q: quit".to_string()
            }
        }
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.phase() {
            Phase::Editing => Style::default(),
            Phase::Submitting => Style::default().fg(Color::Yellow),
            Phase::Succeeded => Style::default().fg(Color::Green),
            Phase::Failed => Style::default().fg(Color::Red),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("tforms Help")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"TFORMS KEY REFERENCE

=== FILLING THE FORM ===
The wizard shows one field per step. Text fields take whatever you type;
choice fields are driven with the highlight keys below. Required fields
block the Next step until they hold a value; departments may be left
unselected.

=== TEXT FIELDS ===
Any character Insert at the cursor
Backspace      Delete before the cursor
Delete         Delete at the cursor
Left/Right     Move the cursor
Home/End       Jump to start/end of the value

=== CHOICE FIELDS ===
Up/Down        Move the highlight
Space          Select the highlighted year / toggle a department

=== NAVIGATION ===
Enter          Next step (on the last step: submit)
Tab            Next step
Shift+Tab      Previous step
F1             Toggle this help
Esc            Quit without submitting

=== SUBMISSION ===
The completed form is posted once; while it is in flight further
submits do nothing. Success and failure each show a closing screen --
your answers are kept on failure. From a closing screen press r to
start a fresh form or q to quit.

=== HELP NAVIGATION ===
Up/Down or j/k Scroll one line
PgUp/PgDn      Scroll five lines
Home           Jump to top
Esc/F1/q       Close this help window"#
        .to_string()
}

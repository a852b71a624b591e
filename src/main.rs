//! TFORMS - Terminal Form Wizard
//!
//! A terminal-based multi-step recruitment form, built in Rust. Collects
//! applicant fields one step at a time, validates each step, and posts the
//! completed record to a remote endpoint.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::{App, AppMode, Phase};
use infrastructure::{FORM_ENDPOINT, HttpSubmitter, SubmissionWorker};
use presentation::{InputHandler, render_ui};

/// Entry point for the TFORMS terminal form wizard.
///
/// Sets up the terminal interface, initializes the wizard state and the
/// submission worker, and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    let mut worker = SubmissionWorker::new(Arc::new(HttpSubmitter::new(FORM_ENDPOINT)));
    let res = run_app(&mut terminal, &mut app, &mut worker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Renders the wizard, processes keyboard input, and polls the submission
/// worker so the outcome of an in-flight delivery lands in the controller
/// as soon as it arrives. Continues until the user quits with Esc (or 'q'
/// on a closing screen).
///
/// # Arguments
///
/// * `terminal` - Terminal interface for rendering
/// * `app` - Mutable reference to application state
/// * `worker` - Background dispatcher for form submissions
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    worker: &mut SubmissionWorker,
) -> io::Result<()> {
    loop {
        if let Some(outcome) = worker.poll() {
            app.set_submit_result(outcome.map_err(|err| err.to_string()));
        }

        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Esc
                        if matches!(app.mode, AppMode::Form) && !app.is_submitting() =>
                    {
                        return Ok(());
                    }
                    KeyCode::Char('q')
                        if matches!(app.mode, AppMode::Form)
                            && matches!(app.phase(), Phase::Succeeded | Phase::Failed) =>
                    {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, worker, key.code, key.modifiers),
                }
            }
        }
    }
}

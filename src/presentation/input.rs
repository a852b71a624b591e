use crate::application::{App, AppMode, Phase};
use crate::domain::FieldKind;
use crate::infrastructure::SubmissionWorker;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(
        app: &mut App,
        worker: &mut SubmissionWorker,
        key: KeyCode,
        _modifiers: KeyModifiers,
    ) {
        match app.mode {
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Form => match app.phase() {
                Phase::Editing => Self::handle_editing_phase(app, worker, key),
                // No cancellation for an in-flight submission; keys wait
                Phase::Submitting => {}
                Phase::Succeeded | Phase::Failed => Self::handle_result_phase(app, key),
            },
        }
    }

    fn handle_editing_phase(app: &mut App, worker: &mut SubmissionWorker, key: KeyCode) {
        match key {
            KeyCode::F(1) => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
                return;
            }
            KeyCode::Enter | KeyCode::Tab => {
                if app.is_last_step() && key == KeyCode::Enter {
                    if let Some(record) = app.begin_submit() {
                        worker.dispatch(record);
                    }
                } else {
                    app.advance();
                }
                return;
            }
            KeyCode::BackTab => {
                app.retreat();
                return;
            }
            _ => {}
        }

        if matches!(app.active_field().kind, FieldKind::Text { .. }) {
            Self::handle_text_field(app, key);
        } else {
            Self::handle_choice_field(app, key);
        }
    }

    fn handle_text_field(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                    app.commit_input();
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    app.input.remove(app.cursor_position);
                    app.commit_input();
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += 1;
                app.commit_input();
            }
            _ => {}
        }
    }

    fn handle_choice_field(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.move_option_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.move_option_down();
            }
            KeyCode::Char(' ') => {
                if matches!(app.active_field().kind, FieldKind::Select { .. }) {
                    app.choose_option();
                } else {
                    app.toggle_current_option();
                }
            }
            _ => {}
        }
    }

    fn handle_result_phase(app: &mut App, key: KeyCode) {
        if key == KeyCode::Char('r') {
            app.reset();
        }
        // 'q' is handled by the main loop
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => {
                app.mode = AppMode::Form;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubmissionRecord;
    use crate::infrastructure::{SubmissionTransport, TransportError};
    use std::sync::Arc;

    struct OkTransport;

    impl SubmissionTransport for OkTransport {
        fn deliver(&self, _record: &SubmissionRecord) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn worker() -> SubmissionWorker {
        SubmissionWorker::new(Arc::new(OkTransport))
    }

    fn press(app: &mut App, worker: &mut SubmissionWorker, key: KeyCode) {
        InputHandler::handle_key_event(app, worker, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, worker: &mut SubmissionWorker, text: &str) {
        for c in text.chars() {
            press(app, worker, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_writes_through_to_record() {
        let mut app = App::default();
        let mut worker = worker();

        type_text(&mut app, &mut worker, "Asha Rao");

        assert_eq!(app.input, "Asha Rao");
        assert_eq!(app.record().scalar("Name"), Some("Asha Rao"));
    }

    #[test]
    fn test_backspace_updates_record() {
        let mut app = App::default();
        let mut worker = worker();

        type_text(&mut app, &mut worker, "Ashaa");
        press(&mut app, &mut worker, KeyCode::Backspace);

        assert_eq!(app.record().scalar("Name"), Some("Asha"));
    }

    #[test]
    fn test_enter_blocked_on_empty_required_field() {
        let mut app = App::default();
        let mut worker = worker();

        press(&mut app, &mut worker, KeyCode::Enter);

        assert_eq!(app.current_step(), 0);
        assert_eq!(app.status_message.as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_enter_advances_after_typing() {
        let mut app = App::default();
        let mut worker = worker();

        type_text(&mut app, &mut worker, "Asha Rao");
        press(&mut app, &mut worker, KeyCode::Enter);

        assert_eq!(app.current_step(), 1);
        assert_eq!(app.active_field().id, "Year");
    }

    #[test]
    fn test_back_tab_retreats() {
        let mut app = App::default();
        let mut worker = worker();

        type_text(&mut app, &mut worker, "Asha Rao");
        press(&mut app, &mut worker, KeyCode::Enter);
        press(&mut app, &mut worker, KeyCode::BackTab);

        assert_eq!(app.current_step(), 0);
        assert_eq!(app.input, "Asha Rao");
    }

    #[test]
    fn test_space_selects_year() {
        let mut app = App::default();
        let mut worker = worker();

        type_text(&mut app, &mut worker, "Asha Rao");
        press(&mut app, &mut worker, KeyCode::Enter);
        press(&mut app, &mut worker, KeyCode::Down);
        press(&mut app, &mut worker, KeyCode::Char(' '));

        assert_eq!(app.record().scalar("Year"), Some("2nd"));
    }

    #[test]
    fn test_space_toggles_department() {
        let mut app = App::default();
        let mut worker = worker();
        walk_to_department(&mut app, &mut worker);

        press(&mut app, &mut worker, KeyCode::Char(' '));
        assert!(app.record().selection("Department").contains("Creativity"));

        press(&mut app, &mut worker, KeyCode::Char(' '));
        assert!(app.record().selection("Department").is_empty());
    }

    #[test]
    fn test_enter_on_last_step_submits() {
        let mut app = App::default();
        let mut worker = worker();
        walk_to_department(&mut app, &mut worker);

        press(&mut app, &mut worker, KeyCode::Enter);

        assert_eq!(app.phase(), Phase::Submitting);
        assert!(worker.is_pending());
    }

    #[test]
    fn test_keys_ignored_while_submitting() {
        let mut app = App::default();
        let mut worker = worker();
        walk_to_department(&mut app, &mut worker);
        press(&mut app, &mut worker, KeyCode::Enter);

        press(&mut app, &mut worker, KeyCode::BackTab);
        press(&mut app, &mut worker, KeyCode::Char(' '));

        assert_eq!(app.phase(), Phase::Submitting);
        assert_eq!(app.current_step(), app.step_count() - 1);
        assert!(app.record().selection("Department").is_empty());
    }

    #[test]
    fn test_reset_key_only_works_on_result_screens() {
        let mut app = App::default();
        let mut worker = worker();

        // While editing, 'r' is just a character
        press(&mut app, &mut worker, KeyCode::Char('r'));
        assert_eq!(app.record().scalar("Name"), Some("r"));

        app.reset();
        walk_to_department(&mut app, &mut worker);
        press(&mut app, &mut worker, KeyCode::Enter);
        app.set_submit_result(Ok(()));
        assert_eq!(app.phase(), Phase::Succeeded);

        press(&mut app, &mut worker, KeyCode::Char('r'));
        assert_eq!(app.phase(), Phase::Editing);
        assert_eq!(app.current_step(), 0);
        assert!(app.record().scalar("Name").is_none());
    }

    #[test]
    fn test_help_toggle_and_scroll() {
        let mut app = App::default();
        let mut worker = worker();

        press(&mut app, &mut worker, KeyCode::F(1));
        assert!(matches!(app.mode, AppMode::Help));

        press(&mut app, &mut worker, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 5);

        // Keys routed to help do not leak into the form
        press(&mut app, &mut worker, KeyCode::Char('q'));
        assert!(matches!(app.mode, AppMode::Form));
        assert!(app.record().scalar("Name").is_none());
    }

    fn walk_to_department(app: &mut App, worker: &mut SubmissionWorker) {
        type_text(app, worker, "Asha Rao");
        press(app, worker, KeyCode::Enter);
        press(app, worker, KeyCode::Char(' ')); // Year: 1st
        press(app, worker, KeyCode::Enter);
        type_text(app, worker, "9999999999");
        press(app, worker, KeyCode::Enter);
        type_text(app, worker, "21CS001");
        press(app, worker, KeyCode::Enter);
        type_text(app, worker, "asha@example.com");
        press(app, worker, KeyCode::Enter);
        assert_eq!(app.active_field().id, "Department");
    }
}

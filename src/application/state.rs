//! Application state management for the terminal form wizard.
//!
//! This module contains the form controller: the step index, the answer
//! record, the submission lifecycle, and the transient input state the
//! terminal user interface edits through.

use crate::domain::{FieldDef, FieldKind, FormRecord, FormTemplate, RecordAssembler, SubmissionRecord};

/// Represents the current mode of the application.
///
/// The wizard is either showing the form itself or the help overlay.
#[derive(Debug)]
pub enum AppMode {
    /// The wizard form is active and keys edit the current field
    Form,
    /// Help screen is displayed
    Help,
}

/// Submission lifecycle phase of the wizard.
///
/// The phase starts at `Editing`, moves to `Submitting` when the completed
/// record is handed to the transport, and ends at `Succeeded` or `Failed`
/// when the outcome arrives. Both terminal phases exit only via [`App::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

/// Result message shown after the transport reports success.
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";
/// Result message shown after the transport reports any failure.
pub const FAILURE_MESSAGE: &str = "An error occurred while submitting the form";

/// Main application state containing the form template, the answers, and
/// the wizard's navigation and submission state.
///
/// The answer record is owned exclusively by this controller; the
/// presentation layer reads it through accessors and mutates it only via
/// the operations below.
///
/// # Examples
///
/// ```
/// use tforms::application::{App, Phase};
///
/// let app = App::default();
/// assert_eq!(app.current_step(), 0);
/// assert_eq!(app.phase(), Phase::Editing);
/// ```
#[derive(Debug)]
pub struct App {
    /// Static field declarations, one per step
    pub template: FormTemplate,
    /// The applicant's answers
    record: FormRecord,
    /// Index of the active field, always within [0, field_count - 1]
    current_step: usize,
    /// Submission lifecycle phase
    phase: Phase,
    /// Terminal result text, absent until a submission completes
    result_message: Option<String>,
    /// Set when the transport reported success; drives the celebration screen
    celebrate: bool,
    /// Current application mode
    pub mode: AppMode,
    /// Current input buffer for the active text field
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Highlighted option index for select and multi-select fields
    pub option_cursor: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(FormTemplate::recruitment())
    }
}

impl App {
    /// Creates a controller over the given template, at step 0 with an
    /// empty record.
    ///
    /// # Panics
    ///
    /// Panics if the template declares no fields.
    pub fn new(template: FormTemplate) -> Self {
        assert!(
            !template.fields.is_empty(),
            "form template must declare at least one field"
        );
        let record = FormRecord::new(&template);
        let mut app = Self {
            template,
            record,
            current_step: 0,
            phase: Phase::Editing,
            result_message: None,
            celebrate: false,
            mode: AppMode::Form,
            input: String::new(),
            cursor_position: 0,
            option_cursor: 0,
            status_message: None,
            help_scroll: 0,
        };
        app.load_step_state();
        app
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result_message(&self) -> Option<&str> {
        self.result_message.as_deref()
    }

    pub fn celebrate(&self) -> bool {
        self.celebrate
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn step_count(&self) -> usize {
        self.template.field_count()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.step_count()
    }

    /// The field the current step displays.
    pub fn active_field(&self) -> &FieldDef {
        self.template.field(self.current_step)
    }

    /// Completion percentage shown by the progress gauge.
    pub fn progress_percent(&self) -> u16 {
        (((self.current_step + 1) * 100) / self.step_count()) as u16
    }

    /// Number of options the active field offers (0 for text fields).
    pub fn option_count(&self) -> usize {
        self.active_field().kind.options().map_or(0, |o| o.len())
    }

    /// Writes the input buffer through to the active text field.
    ///
    /// Called by the input handler after every buffer edit so the record
    /// stays the single source of truth. Ignored outside the editing phase
    /// and for fields without a text buffer.
    pub fn commit_input(&mut self) {
        if self.phase != Phase::Editing {
            return;
        }
        let field = self.active_field();
        if let FieldKind::Text { .. } = field.kind {
            let id = field.id.clone();
            self.record.set_scalar(&id, self.input.clone());
        }
    }

    /// Stores the highlighted option as the value of the active select field.
    pub fn choose_option(&mut self) {
        if self.phase != Phase::Editing {
            return;
        }
        let field = self.active_field();
        let FieldKind::Select { options } = &field.kind else {
            return;
        };
        let Some(option) = options.get(self.option_cursor) else {
            return;
        };
        let id = field.id.clone();
        let option = option.clone();
        self.record.set_scalar(&id, option);
    }

    /// Flips the highlighted option of the active multi-select field.
    pub fn toggle_current_option(&mut self) {
        if self.phase != Phase::Editing {
            return;
        }
        let field = self.active_field();
        let FieldKind::MultiSelect { options } = &field.kind else {
            return;
        };
        let Some(option) = options.get(self.option_cursor) else {
            return;
        };
        let id = field.id.clone();
        let option = option.clone();
        let selected = self.record.selection(&id).contains(&option);
        self.record.toggle(&id, &option, !selected);
    }

    /// Moves the option highlight up one entry.
    pub fn move_option_up(&mut self) {
        if self.option_cursor > 0 {
            self.option_cursor -= 1;
        }
    }

    /// Moves the option highlight down one entry.
    pub fn move_option_down(&mut self) {
        if self.option_cursor + 1 < self.option_count() {
            self.option_cursor += 1;
        }
    }

    /// Moves to the next step if the active field's requirement is met.
    ///
    /// Blocked transitions leave all state unchanged apart from a
    /// "<label> is required" status message; nothing is thrown. The last
    /// step never advances (submission is a separate operation). Returns
    /// whether the step changed.
    pub fn advance(&mut self) -> bool {
        if self.phase != Phase::Editing {
            return false;
        }
        if !self.record.is_satisfied(self.active_field()) {
            let label = self.active_field().label.clone();
            self.status_message = Some(format!("{} is required", label));
            return false;
        }
        if self.is_last_step() {
            return false;
        }
        self.current_step += 1;
        self.status_message = None;
        self.load_step_state();
        true
    }

    /// Moves to the previous step. No-op at step 0.
    pub fn retreat(&mut self) -> bool {
        if self.phase != Phase::Editing || self.current_step == 0 {
            return false;
        }
        self.current_step -= 1;
        self.status_message = None;
        self.load_step_state();
        true
    }

    /// Starts a submission if one is allowed right now.
    ///
    /// Allowed only on the last step, in the editing phase, with no result
    /// from an earlier attempt; otherwise returns `None` and changes
    /// nothing, which is what keeps a second submit a no-op while the first
    /// is still in flight. On success the phase moves to `Submitting` and
    /// the assembled record is returned for the caller to hand to the
    /// transport.
    pub fn begin_submit(&mut self) -> Option<SubmissionRecord> {
        if self.phase != Phase::Editing || !self.is_last_step() {
            return None;
        }
        self.phase = Phase::Submitting;
        self.status_message = None;
        Some(RecordAssembler::new(&self.template).assemble(&self.record))
    }

    /// Completes the submission lifecycle with the transport's outcome.
    ///
    /// Ignored unless a submission is in flight, so the lifecycle completes
    /// exactly once per dispatch. Field values are preserved either way;
    /// a failed attempt loses nothing the applicant typed.
    ///
    /// # Arguments
    ///
    /// * `result` - `Ok` for a delivered record, `Err` with a human-readable
    ///   reason otherwise
    pub fn set_submit_result(&mut self, result: Result<(), String>) {
        if self.phase != Phase::Submitting {
            return;
        }
        match result {
            Ok(()) => {
                self.phase = Phase::Succeeded;
                self.celebrate = true;
                self.result_message = Some(SUCCESS_MESSAGE.to_string());
                self.status_message = None;
            }
            Err(reason) => {
                self.phase = Phase::Failed;
                self.result_message = Some(FAILURE_MESSAGE.to_string());
                self.status_message = Some(reason);
            }
        }
    }

    /// Replaces all wizard state with the initial state.
    ///
    /// Step 0, scalars cleared, multi-select emptied, editing phase, no
    /// messages, no celebration. Always succeeds.
    pub fn reset(&mut self) {
        self.record = FormRecord::new(&self.template);
        self.current_step = 0;
        self.phase = Phase::Editing;
        self.result_message = None;
        self.celebrate = false;
        self.status_message = None;
        self.load_step_state();
    }

    /// Reloads the transient input state for the active field.
    ///
    /// Text fields get their stored value back into the buffer with the
    /// cursor at the end; select fields highlight the stored choice.
    fn load_step_state(&mut self) {
        let field = self.active_field();
        let id = field.id.clone();
        let is_text = matches!(field.kind, FieldKind::Text { .. });
        let select_options = match &field.kind {
            FieldKind::Select { options } => Some(options.clone()),
            _ => None,
        };

        if is_text {
            self.input = self.record.scalar(&id).unwrap_or("").to_string();
            self.cursor_position = self.input.len();
            self.option_cursor = 0;
        } else {
            self.input.clear();
            self.cursor_position = 0;
            self.option_cursor = select_options
                .and_then(|options| {
                    self.record
                        .scalar(&id)
                        .and_then(|value| options.iter().position(|o| o == value))
                })
                .unwrap_or(0);
        }
    }
}

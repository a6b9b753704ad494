//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::EditDialog;
use crate::constants::DEFAULT_API_BASE_URL;
use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{default_programs, NewStudent, Notification, Program, Student, StudentField};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Student table
    pub students: Vec<Student>,
    pub selected_row: usize,
    pub has_loaded: bool,

    // Creation form
    pub form: NewStudent,
    pub form_field: StudentField,

    // Edit dialog
    pub dialog: EditDialog,

    pub programs: Vec<Program>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub show_help: bool,

    pub notifications: Vec<Notification>,
    pub is_loading: bool,
    pub api_base_url: String,
}

impl RenderState {
    pub fn program_label(&self, value: &str) -> Option<&str> {
        self.programs
            .iter()
            .find(|p| p.value == value)
            .map(|p| p.label.as_str())
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            students: Vec::new(),
            selected_row: 0,
            has_loaded: false,
            form: NewStudent::default(),
            form_field: StudentField::FirstName,
            dialog: EditDialog::Closed,
            programs: default_programs(),
            active_panel: Panel::Form,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
            notifications: Vec::new(),
            is_loading: true,
            api_base_url: String::from(DEFAULT_API_BASE_URL),
        }
    }
}

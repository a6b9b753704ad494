//! App state - pure data structure with no I/O logic

use std::collections::{HashMap, VecDeque};

use crate::constants::MAX_NOTIFICATIONS;
use crate::messages::network::Operation;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{
    NewStudent, Notification, Program, Student, StudentDraft, StudentField, StudentId,
};

/// Which set of editable fields an update targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormTarget {
    /// The creation form
    Create,
    /// The edit dialog draft
    Edit,
}

/// Edit dialog lifecycle
#[derive(Clone, Debug, PartialEq)]
pub enum EditDialog {
    Closed,
    Open {
        student_id: StudentId,
        /// Copy of the student's editable fields, detached from the list
        draft: StudentDraft,
        field: StudentField,
        /// Request id of an in-flight save
        saving: Option<u64>,
    },
}

impl EditDialog {
    pub fn is_open(&self) -> bool {
        matches!(self, EditDialog::Open { .. })
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, EditDialog::Open { saving: Some(_), .. })
    }

    pub fn draft(&self) -> Option<&StudentDraft> {
        match self {
            EditDialog::Open { draft, .. } => Some(draft),
            EditDialog::Closed => None,
        }
    }
}

/// A request the app is waiting on
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub operation: Operation,
    pub student_id: Option<StudentId>,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Student list (full snapshot of the last applied fetch)
    pub students: Vec<Student>,
    pub selected_row: usize,
    pub has_loaded: bool,

    // Creation form
    pub form: NewStudent,
    pub form_field: StudentField,

    // Edit dialog
    pub dialog: EditDialog,

    // Reference data
    pub programs: Vec<Program>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub show_help: bool,

    // Notifications
    pub notifications: VecDeque<Notification>,
    pub notification_ttl: chrono::Duration,

    // Request tracking
    pub next_request_id: u64,
    pub pending: HashMap<u64, PendingRequest>,
    pub last_list_applied: u64,

    pub api_base_url: String,
}

impl AppState {
    pub fn new(programs: Vec<Program>, notification_ttl: chrono::Duration, api_base_url: impl Into<String>) -> Self {
        AppState {
            students: Vec::new(),
            selected_row: 0,
            has_loaded: false,
            form: NewStudent::default(),
            form_field: StudentField::FirstName,
            dialog: EditDialog::Closed,
            programs,
            active_panel: Panel::Form,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            show_help: false,
            notifications: VecDeque::with_capacity(MAX_NOTIFICATIONS),
            notification_ttl,
            next_request_id: 1,
            pending: HashMap::new(),
            last_list_applied: 0,
            api_base_url: api_base_url.into(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Replace the whole list; no merging with the previous snapshot
    pub fn set_list(&mut self, students: Vec<Student>) {
        self.students = students;
        if self.selected_row >= self.students.len() {
            self.selected_row = self.students.len().saturating_sub(1);
        }
    }

    /// Open the edit dialog with a detached copy of the student's fields
    pub fn begin_edit(&mut self, student: &Student) {
        self.dialog = EditDialog::Open {
            student_id: student.id.clone(),
            draft: StudentDraft::from(student),
            field: StudentField::FirstName,
            saving: None,
        };
        self.input_mode = InputMode::Normal;
        self.cursor_position = 0;
    }

    /// Close the dialog and drop the draft without sending anything
    pub fn cancel_edit(&mut self) {
        self.dialog = EditDialog::Closed;
        self.input_mode = InputMode::Normal;
        self.cursor_position = 0;
    }

    /// Set one field on the creation form or the edit draft
    ///
    /// Returns false when targeting the draft while no dialog is open.
    pub fn update_draft_field(&mut self, target: FormTarget, field: StudentField, value: impl Into<String>) -> bool {
        match target {
            FormTarget::Create => {
                self.form.set(field, value);
                true
            }
            FormTarget::Edit => match &mut self.dialog {
                EditDialog::Open { draft, .. } => {
                    draft.set(field, value);
                    true
                }
                EditDialog::Closed => false,
            },
        }
    }

    /// Reset the creation form to empty strings
    pub fn clear_form(&mut self) {
        self.form.clear();
        if !self.dialog.is_open() && self.active_panel == Panel::Form {
            self.cursor_position = 0;
        }
    }

    /// The field that keyboard input currently applies to
    pub fn focused_field(&self) -> Option<(FormTarget, StudentField)> {
        match &self.dialog {
            EditDialog::Open { field, .. } => Some((FormTarget::Edit, *field)),
            EditDialog::Closed if self.active_panel == Panel::Form => {
                Some((FormTarget::Create, self.form_field))
            }
            EditDialog::Closed => None,
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.focused_field() {
            Some((FormTarget::Create, field)) => self.form.get(field),
            Some((FormTarget::Edit, field)) => {
                self.dialog.draft().map(|d| d.get(field)).unwrap_or("")
            }
            None => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        let (target, field) = self.focused_field()?;
        match target {
            FormTarget::Create => Some(self.form.get_mut(field)),
            FormTarget::Edit => match &mut self.dialog {
                EditDialog::Open { draft, .. } => Some(draft.get_mut(field)),
                EditDialog::Closed => None,
            },
        }
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.students.get(self.selected_row)
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        self.pending.values().any(|p| p.operation == operation)
    }

    pub fn push_notification(&mut self, notification: Notification) {
        if self.notifications.len() >= MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(notification);
    }

    /// Drop expired notifications, returns true if any were removed
    pub fn prune_notifications(&mut self, now: chrono::DateTime<chrono::Utc>) -> bool {
        let before = self.notifications.len();
        let ttl = self.notification_ttl;
        self.notifications.retain(|n| !n.is_expired(now, ttl));
        self.notifications.len() != before
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            students: self.students.clone(),
            selected_row: self.selected_row,
            has_loaded: self.has_loaded,
            form: self.form.clone(),
            form_field: self.form_field,
            dialog: self.dialog.clone(),
            programs: self.programs.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            show_help: self.show_help,
            notifications: self.notifications.iter().cloned().collect(),
            is_loading: self.is_loading(),
            api_base_url: self.api_base_url.clone(),
        }
    }
}

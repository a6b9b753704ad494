//! Command handlers - business logic for processing UI events

use crate::app::state::{EditDialog, FormTarget, PendingRequest};
use crate::app::AppState;
use crate::messages::network::Operation;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Notification, StudentField, StudentId};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.input_mode = InputMode::Normal;
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.input_mode = InputMode::Normal;
    }

    pub fn next_field(&mut self) {
        self.move_field(StudentField::next);
    }

    pub fn prev_field(&mut self) {
        self.move_field(StudentField::prev);
    }

    fn move_field(&mut self, step: fn(&StudentField) -> StudentField) {
        let new_field = match &mut self.dialog {
            EditDialog::Open { field, .. } => {
                *field = step(field);
                *field
            }
            EditDialog::Closed if self.active_panel == Panel::Form => {
                self.form_field = step(&self.form_field);
                self.form_field
            }
            EditDialog::Closed => return,
        };

        // Keep typing into the next text field, stop on the program selector
        if self.input_mode == InputMode::Editing && !new_field.is_text() {
            self.input_mode = InputMode::Normal;
        }
        self.cursor_position = self.current_input().len();
    }

    pub fn next_row(&mut self) {
        if !self.students.is_empty() {
            self.selected_row = (self.selected_row + 1) % self.students.len();
        }
    }

    pub fn prev_row(&mut self) {
        if !self.students.is_empty() {
            self.selected_row = self
                .selected_row
                .checked_sub(1)
                .unwrap_or(self.students.len() - 1);
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        let Some((_, field)) = self.focused_field() else {
            return;
        };
        if !field.is_text() {
            // Enter on the program selector steps through the list
            self.next_program();
            return;
        }
        if self.dialog.is_saving() {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.input_mode != InputMode::Editing || self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Program selector
    // ========================

    pub fn next_program(&mut self) {
        self.cycle_program(true);
    }

    pub fn prev_program(&mut self) {
        self.cycle_program(false);
    }

    fn cycle_program(&mut self, forward: bool) {
        let Some((target, StudentField::ProgramId)) = self.focused_field() else {
            return;
        };
        if self.programs.is_empty() || self.dialog.is_saving() {
            return;
        }

        let len = self.programs.len();
        let current = self
            .programs
            .iter()
            .position(|p| p.value == self.current_input());
        let index = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => i.checked_sub(1).unwrap_or(len - 1),
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let value = self.programs[index].value.clone();
        self.update_draft_field(target, StudentField::ProgramId, value);
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Requests
    // ========================

    fn track(&mut self, operation: Operation, student_id: Option<StudentId>) -> u64 {
        let id = self.next_id();
        self.pending.insert(id, PendingRequest { operation, student_id });
        id
    }

    /// Fetch the full list from the server
    pub fn refresh(&mut self) -> NetworkCommand {
        let id = self.track(Operation::List, None);
        NetworkCommand::ListStudents { id }
    }

    /// Send the creation form; the form is only cleared once the server accepts it
    pub fn submit_create(&mut self) -> Option<NetworkCommand> {
        if self.is_pending(Operation::Create) {
            return None;
        }
        self.input_mode = InputMode::Normal;

        let id = self.track(Operation::Create, None);
        Some(NetworkCommand::CreateStudent {
            id,
            student: self.form.clone(),
        })
    }

    /// Open the edit dialog for the highlighted row
    pub fn edit_selected(&mut self) {
        if let Some(student) = self.selected_student().cloned() {
            self.begin_edit(&student);
        }
    }

    /// Send the edit draft; the dialog stays open until the server answers
    pub fn save_edit(&mut self) -> Option<NetworkCommand> {
        let (student_id, draft) = match &self.dialog {
            EditDialog::Open { saving: None, student_id, draft, .. } => {
                (student_id.clone(), draft.clone())
            }
            _ => return None,
        };
        self.input_mode = InputMode::Normal;

        let id = self.track(Operation::Update, Some(student_id.clone()));
        if let EditDialog::Open { saving, .. } = &mut self.dialog {
            *saving = Some(id);
        }
        Some(NetworkCommand::UpdateStudent { id, student_id, draft })
    }

    /// Delete the highlighted row
    pub fn delete_selected(&mut self) -> Option<NetworkCommand> {
        let student_id = self.selected_student()?.id.clone();
        let already_deleting = self.pending.values().any(|p| {
            p.operation == Operation::Delete && p.student_id.as_ref() == Some(&student_id)
        });
        if already_deleting {
            return None;
        }

        let id = self.track(Operation::Delete, Some(student_id.clone()));
        Some(NetworkCommand::DeleteStudent { id, student_id })
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; returns the follow-up command, if any.
    ///
    /// A successful mutation is followed by exactly one list re-fetch. Failed
    /// requests never trigger a re-fetch and leave the list untouched.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        let request_id = response.id();
        let Some(pending) = self.pending.remove(&request_id) else {
            tracing::debug!(id = request_id, "Dropping response for untracked request");
            return None;
        };
        if pending.operation != response.operation() {
            tracing::warn!(
                id = request_id,
                expected = pending.operation.as_str(),
                got = response.operation().as_str(),
                "Dropping response for a different operation"
            );
            return None;
        }

        match response {
            NetworkResponse::StudentsLoaded { id, students, .. } => {
                if id < self.last_list_applied {
                    tracing::debug!(id, applied = self.last_list_applied, "Discarding stale student list");
                    return None;
                }
                self.last_list_applied = id;
                self.has_loaded = true;
                self.set_list(students);
                None
            }
            NetworkResponse::MutationSucceeded { id, operation, .. } => {
                match operation {
                    Operation::Create => {
                        self.clear_form();
                        self.push_notification(Notification::success("Student created successfully"));
                    }
                    Operation::Update => {
                        if matches!(self.dialog, EditDialog::Open { saving: Some(s), .. } if s == id) {
                            self.cancel_edit();
                        }
                        self.push_notification(Notification::success("Student updated successfully"));
                    }
                    Operation::Delete => {
                        self.push_notification(Notification::success("Student deleted successfully"));
                    }
                    Operation::List => return None,
                }
                Some(self.refresh())
            }
            NetworkResponse::Failed { id, operation, message, .. } => {
                if operation == Operation::List && id < self.last_list_applied {
                    tracing::debug!(id, applied = self.last_list_applied, "Ignoring failure of a superseded list fetch");
                    return None;
                }
                if operation == Operation::Update {
                    if let EditDialog::Open { saving, .. } = &mut self.dialog {
                        if *saving == Some(id) {
                            *saving = None;
                        }
                    }
                }
                let text = match operation {
                    Operation::List => format!("Could not load students: {}", message),
                    op => format!("Could not {} student: {}", op.as_str(), message),
                };
                self.push_notification(Notification::error(text));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationKind, Program, Student};

    fn state() -> AppState {
        AppState::new(
            vec![Program::new("P1", "Derecho"), Program::new("P2", "Psicología")],
            chrono::Duration::seconds(4),
            "http://localhost:3001",
        )
    }

    fn student(id: &str, first: &str) -> Student {
        Student {
            id: StudentId::new(id),
            first_name: first.into(),
            second_name: String::new(),
            surnames: "Lopez".into(),
            program_id: "P1".into(),
            programa: "Derecho".into(),
            facultad: "Ciencias Sociales".into(),
        }
    }

    fn loaded(state: &mut AppState, students: Vec<Student>) {
        let NetworkCommand::ListStudents { id } = state.refresh() else {
            panic!("expected a list command");
        };
        state.handle_response(NetworkResponse::StudentsLoaded { id, students, time_ms: 1 });
    }

    fn last_notification(state: &AppState) -> (NotificationKind, String) {
        let n = state.notifications.back().expect("a notification");
        (n.kind, n.message.clone())
    }

    #[test]
    fn test_set_list_replaces_and_clamps_selection() {
        let mut s = state();
        s.set_list(vec![student("1", "Ana"), student("2", "Luis"), student("3", "Eva")]);
        s.selected_row = 2;
        s.set_list(vec![student("9", "Zoe")]);
        assert_eq!(s.students.len(), 1);
        assert_eq!(s.selected_row, 0);
    }

    #[test]
    fn test_list_twice_is_idempotent() {
        let mut s = state();
        let list = vec![student("1", "Ana"), student("2", "Luis")];
        loaded(&mut s, list.clone());
        let first = s.students.clone();
        loaded(&mut s, list);
        assert_eq!(s.students, first);
    }

    #[test]
    fn test_create_success_clears_form_and_refetches_once() {
        let mut s = state();
        s.update_draft_field(FormTarget::Create, StudentField::FirstName, "Ana");
        s.update_draft_field(FormTarget::Create, StudentField::Surnames, "Lopez");
        s.update_draft_field(FormTarget::Create, StudentField::ProgramId, "P1");

        let Some(NetworkCommand::CreateStudent { id, student }) = s.submit_create() else {
            panic!("expected a create command");
        };
        assert_eq!(student.first_name, "Ana");
        // form is kept until the server confirms
        assert_eq!(s.form.first_name, "Ana");
        // a second submit while one is in flight is ignored
        assert!(s.submit_create().is_none());

        let follow_up = s.handle_response(NetworkResponse::MutationSucceeded {
            id,
            operation: Operation::Create,
            time_ms: 3,
        });
        assert!(matches!(follow_up, Some(NetworkCommand::ListStudents { .. })));
        assert!(StudentField::ALL.iter().all(|f| s.form.get(*f).is_empty()));
        assert_eq!(last_notification(&s).0, NotificationKind::Success);
        assert_eq!(s.pending.len(), 1);
    }

    #[test]
    fn test_create_failure_keeps_form_and_does_not_refetch() {
        let mut s = state();
        s.update_draft_field(FormTarget::Create, StudentField::FirstName, "Ana");
        let id = s.submit_create().and_then(|c| c.id()).unwrap();

        let follow_up = s.handle_response(NetworkResponse::Failed {
            id,
            operation: Operation::Create,
            message: "Server returned 500".into(),
            time_ms: 3,
        });
        assert!(follow_up.is_none());
        assert_eq!(s.form.first_name, "Ana");
        let (kind, msg) = last_notification(&s);
        assert_eq!(kind, NotificationKind::Error);
        assert_eq!(msg, "Could not create student: Server returned 500");
        assert!(!s.is_loading());
    }

    #[test]
    fn test_edit_draft_is_isolated_from_list() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        s.active_panel = Panel::Table;
        s.edit_selected();
        assert!(s.dialog.is_open());

        s.update_draft_field(FormTarget::Edit, StudentField::FirstName, "Changed");
        assert_eq!(s.students[0].first_name, "Ana");

        s.cancel_edit();
        assert_eq!(s.dialog, EditDialog::Closed);
        assert_eq!(s.students[0].first_name, "Ana");
        assert!(!s.is_loading());
    }

    #[test]
    fn test_update_draft_field_without_dialog() {
        let mut s = state();
        assert!(!s.update_draft_field(FormTarget::Edit, StudentField::FirstName, "x"));
        assert!(s.update_draft_field(FormTarget::Create, StudentField::FirstName, "x"));
    }

    #[test]
    fn test_update_success_closes_dialog_and_refetches() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        let first = s.students[0].clone();
        s.begin_edit(&first);
        s.update_draft_field(FormTarget::Edit, StudentField::FirstName, "Ana María");

        let Some(NetworkCommand::UpdateStudent { id, student_id, draft }) = s.save_edit() else {
            panic!("expected an update command");
        };
        assert_eq!(student_id, StudentId::new("1"));
        assert_eq!(draft.first_name, "Ana María");
        assert_eq!(draft.surnames, "Lopez");
        assert!(s.dialog.is_saving());
        assert!(s.save_edit().is_none());

        let follow_up = s.handle_response(NetworkResponse::MutationSucceeded {
            id,
            operation: Operation::Update,
            time_ms: 2,
        });
        assert_eq!(s.dialog, EditDialog::Closed);
        let Some(NetworkCommand::ListStudents { id: list_id }) = follow_up else {
            panic!("expected a re-fetch");
        };

        let mut updated = student("1", "Ana María");
        updated.programa = "Derecho".into();
        s.handle_response(NetworkResponse::StudentsLoaded {
            id: list_id,
            students: vec![updated.clone()],
            time_ms: 1,
        });
        assert_eq!(s.students, vec![updated]);
    }

    #[test]
    fn test_update_failure_keeps_dialog_and_list() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        let first = s.students[0].clone();
        s.begin_edit(&first);
        s.update_draft_field(FormTarget::Edit, StudentField::FirstName, "Ana María");
        let id = s.save_edit().and_then(|c| c.id()).unwrap();

        let follow_up = s.handle_response(NetworkResponse::Failed {
            id,
            operation: Operation::Update,
            message: "Connection failed".into(),
            time_ms: 30,
        });
        assert!(follow_up.is_none());
        assert!(s.dialog.is_open());
        assert!(!s.dialog.is_saving());
        assert_eq!(s.dialog.draft().unwrap().first_name, "Ana María");
        assert_eq!(s.students[0].first_name, "Ana");
        assert_eq!(last_notification(&s).0, NotificationKind::Error);

        // the user can retry
        assert!(s.save_edit().is_some());
    }

    #[test]
    fn test_late_update_after_cancel_still_refetches() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        let first = s.students[0].clone();
        s.begin_edit(&first);
        let id = s.save_edit().and_then(|c| c.id()).unwrap();
        s.cancel_edit();

        let follow_up = s.handle_response(NetworkResponse::MutationSucceeded {
            id,
            operation: Operation::Update,
            time_ms: 2,
        });
        assert!(matches!(follow_up, Some(NetworkCommand::ListStudents { .. })));
        assert_eq!(s.dialog, EditDialog::Closed);
    }

    #[test]
    fn test_delete_selected_and_refetch() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana"), student("2", "Luis")]);
        s.active_panel = Panel::Table;
        s.next_row();

        let Some(NetworkCommand::DeleteStudent { id, student_id }) = s.delete_selected() else {
            panic!("expected a delete command");
        };
        assert_eq!(student_id, StudentId::new("2"));
        assert!(s.delete_selected().is_none());

        let follow_up = s.handle_response(NetworkResponse::MutationSucceeded {
            id,
            operation: Operation::Delete,
            time_ms: 2,
        });
        let Some(NetworkCommand::ListStudents { id: list_id }) = follow_up else {
            panic!("expected a re-fetch");
        };
        s.handle_response(NetworkResponse::StudentsLoaded {
            id: list_id,
            students: vec![student("1", "Ana")],
            time_ms: 1,
        });
        assert_eq!(s.students.len(), 1);
        assert_eq!(s.selected_row, 0);
    }

    #[test]
    fn test_delete_failure_shows_error_without_refetch() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        let id = s.delete_selected().and_then(|c| c.id()).unwrap();
        let follow_up = s.handle_response(NetworkResponse::Failed {
            id,
            operation: Operation::Delete,
            message: "Server returned 404".into(),
            time_ms: 2,
        });
        assert!(follow_up.is_none());
        assert_eq!(s.students.len(), 1);
        assert_eq!(last_notification(&s).0, NotificationKind::Error);
    }

    #[test]
    fn test_list_failure_keeps_previous_snapshot() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        let id = s.refresh().id().unwrap();
        s.handle_response(NetworkResponse::Failed {
            id,
            operation: Operation::List,
            message: "Request timed out".into(),
            time_ms: 30_000,
        });
        assert_eq!(s.students.len(), 1);
        assert_eq!(last_notification(&s).1, "Could not load students: Request timed out");
    }

    #[test]
    fn test_stale_list_response_is_discarded() {
        let mut s = state();
        let older = s.refresh().id().unwrap();
        let newer = s.refresh().id().unwrap();

        s.handle_response(NetworkResponse::StudentsLoaded {
            id: newer,
            students: vec![student("1", "New")],
            time_ms: 1,
        });
        s.handle_response(NetworkResponse::StudentsLoaded {
            id: older,
            students: vec![student("1", "Old")],
            time_ms: 1,
        });
        assert_eq!(s.students[0].first_name, "New");
        assert!(!s.is_loading());
    }

    #[test]
    fn test_untracked_response_is_ignored() {
        let mut s = state();
        let follow_up = s.handle_response(NetworkResponse::MutationSucceeded {
            id: 99,
            operation: Operation::Delete,
            time_ms: 1,
        });
        assert!(follow_up.is_none());
        assert!(s.notifications.is_empty());
    }

    #[test]
    fn test_response_for_other_operation_is_ignored() {
        let mut s = state();
        loaded(&mut s, vec![student("1", "Ana")]);
        let id = s.delete_selected().and_then(|c| c.id()).unwrap();

        let follow_up = s.handle_response(NetworkResponse::StudentsLoaded {
            id,
            students: vec![],
            time_ms: 1,
        });
        assert!(follow_up.is_none());
        assert_eq!(s.students.len(), 1);
        assert!(s.notifications.is_empty());
    }

    #[test]
    fn test_superseded_list_failure_is_silent() {
        let mut s = state();
        let older = s.refresh().id().unwrap();
        let newer = s.refresh().id().unwrap();

        s.handle_response(NetworkResponse::StudentsLoaded {
            id: newer,
            students: vec![student("1", "Ana")],
            time_ms: 1,
        });
        let follow_up = s.handle_response(NetworkResponse::Failed {
            id: older,
            operation: Operation::List,
            message: "Request timed out".into(),
            time_ms: 30_000,
        });
        assert!(follow_up.is_none());
        assert!(s.notifications.is_empty());
        assert_eq!(s.students.len(), 1);
        assert!(!s.is_loading());
    }

    #[test]
    fn test_typing_into_form_fields() {
        let mut s = state();
        s.start_editing();
        for c in "Añá".chars() {
            s.enter_char(c);
        }
        s.delete_char();
        s.move_cursor_left();
        s.enter_char('n');
        assert_eq!(s.form.first_name, "Anñ");

        // moving to the program selector ends text editing
        s.next_field();
        s.next_field();
        s.next_field();
        assert_eq!(s.form_field, StudentField::ProgramId);
        assert_eq!(s.input_mode, InputMode::Normal);
        s.enter_char('x');
        assert_eq!(s.form.program_id, "");
    }

    #[test]
    fn test_program_selector_cycles() {
        let mut s = state();
        s.form_field = StudentField::ProgramId;
        s.next_program();
        assert_eq!(s.form.program_id, "P1");
        s.next_program();
        assert_eq!(s.form.program_id, "P2");
        s.next_program();
        assert_eq!(s.form.program_id, "P1");
        s.prev_program();
        assert_eq!(s.form.program_id, "P2");

        // no effect on text fields
        s.form_field = StudentField::FirstName;
        s.next_program();
        assert_eq!(s.form.first_name, "");
    }

    #[test]
    fn test_notifications_are_capped_and_pruned() {
        let mut s = state();
        for i in 0..8 {
            s.push_notification(Notification::success(format!("n{}", i)));
        }
        assert_eq!(s.notifications.len(), crate::constants::MAX_NOTIFICATIONS);
        assert_eq!(s.notifications.front().unwrap().message, "n3");

        let later = chrono::Utc::now() + chrono::Duration::seconds(10);
        assert!(s.prune_notifications(later));
        assert!(s.notifications.is_empty());
    }
}

//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,

    // Form / dialog field navigation
    NextField,
    PrevField,

    // Table navigation
    NextRow,
    PrevRow,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Program selector
    NextProgram,
    PrevProgram,

    // Creation form
    SubmitForm,
    ClearForm,

    // Row actions
    EditSelected,
    DeleteSelected,
    Refresh,

    // Edit dialog
    SaveEdit,
    CancelEdit,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Panel {
    Form,
    Table,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Form => Panel::Table,
            Panel::Table => Panel::Form,
        }
    }

    pub fn prev(&self) -> Panel {
        // Two panels: both directions land on the other one
        self.next()
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
    dialog_open: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(UiEvent::Quit),
            KeyCode::Char('s') if dialog_open => Some(UiEvent::SaveEdit),
            KeyCode::Char('s') => Some(UiEvent::SubmitForm),
            _ => None,
        };
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if input_mode == InputMode::Editing {
        return handle_editing_keys(key);
    }

    if dialog_open {
        return handle_dialog_keys(key);
    }

    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('r') => return Some(UiEvent::Refresh),
        KeyCode::Tab => return Some(UiEvent::NextPanel),
        KeyCode::BackTab => return Some(UiEvent::PrevPanel),
        _ => {}
    }

    match active_panel {
        Panel::Form => handle_form_keys(key),
        Panel::Table => handle_table_keys(key),
    }
}

/// Keys while a text field is being edited
fn handle_editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_dialog_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CancelEdit),
        KeyCode::Char('s') => Some(UiEvent::SaveEdit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::PrevProgram),
        KeyCode::Right => Some(UiEvent::NextProgram),
        _ => None,
    }
}

fn handle_form_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
        KeyCode::Left => Some(UiEvent::PrevProgram),
        KeyCode::Right => Some(UiEvent::NextProgram),
        KeyCode::Char('s') => Some(UiEvent::SubmitForm),
        KeyCode::Char('c') => Some(UiEvent::ClearForm),
        _ => None,
    }
}

fn handle_table_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up => Some(UiEvent::PrevRow),
        KeyCode::Down => Some(UiEvent::NextRow),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn map(code: KeyCode, panel: Panel, mode: InputMode, help: bool, dialog: bool) -> Option<UiEvent> {
        key_to_ui_event(press(code), panel, mode, help, dialog)
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(key, Panel::Form, InputMode::Editing, true, true),
            Some(UiEvent::Quit)
        );
    }

    #[test]
    fn test_help_swallows_keys() {
        assert_eq!(
            map(KeyCode::Char('q'), Panel::Table, InputMode::Normal, true, false),
            Some(UiEvent::CloseHelp)
        );
    }

    #[test]
    fn test_table_row_actions() {
        assert_eq!(
            map(KeyCode::Char('d'), Panel::Table, InputMode::Normal, false, false),
            Some(UiEvent::DeleteSelected)
        );
        assert_eq!(
            map(KeyCode::Enter, Panel::Table, InputMode::Normal, false, false),
            Some(UiEvent::EditSelected)
        );
        // 'd' has no meaning on the form
        assert_eq!(map(KeyCode::Char('d'), Panel::Form, InputMode::Normal, false, false), None);
    }

    #[test]
    fn test_editing_captures_letters() {
        assert_eq!(
            map(KeyCode::Char('q'), Panel::Form, InputMode::Editing, false, false),
            Some(UiEvent::CharInput('q'))
        );
        assert_eq!(
            map(KeyCode::Esc, Panel::Form, InputMode::Editing, false, true),
            Some(UiEvent::StopEditing)
        );
    }

    #[test]
    fn test_dialog_keys() {
        assert_eq!(
            map(KeyCode::Esc, Panel::Table, InputMode::Normal, false, true),
            Some(UiEvent::CancelEdit)
        );
        assert_eq!(
            map(KeyCode::Char('s'), Panel::Table, InputMode::Normal, false, true),
            Some(UiEvent::SaveEdit)
        );
        // quitting is not bound inside the dialog
        assert_eq!(map(KeyCode::Char('q'), Panel::Table, InputMode::Normal, false, true), None);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = crossterm::event::KeyEventKind::Release;
        assert_eq!(key_to_ui_event(key, Panel::Form, InputMode::Normal, false, false), None);
    }
}

//! App actor - message loop processing UI events and network responses

use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// How often expired notifications are swept
const NOTIFICATION_TICK: Duration = Duration::from_millis(250);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Initial load
        let cmd = self.state.refresh();
        self.send(cmd);
        self.render();

        let mut tick = tokio::time::interval(NOTIFICATION_TICK);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    // A closed UI channel means the terminal loop is gone
                    let quit = event.map_or(true, |e| self.handle_ui_event(e));
                    if quit {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    if let Some(cmd) = self.state.handle_response(response) {
                        self.send(cmd);
                    }
                    self.render();
                }
                _ = tick.tick() => {
                    if self.state.prune_notifications(chrono::Utc::now()) {
                        self.render();
                    }
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::error!("Network actor is gone, command dropped");
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::NextRow => self.state.next_row(),
            UiEvent::PrevRow => self.state.prev_row(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Program selector
            UiEvent::NextProgram => self.state.next_program(),
            UiEvent::PrevProgram => self.state.prev_program(),

            // Creation form
            UiEvent::SubmitForm => {
                if let Some(cmd) = self.state.submit_create() {
                    self.send(cmd);
                }
            }
            UiEvent::ClearForm => self.state.clear_form(),

            // Rows
            UiEvent::EditSelected => self.state.edit_selected(),
            UiEvent::DeleteSelected => {
                if let Some(cmd) = self.state.delete_selected() {
                    self.send(cmd);
                }
            }
            UiEvent::Refresh => {
                let cmd = self.state.refresh();
                self.send(cmd);
            }

            // Edit dialog
            UiEvent::SaveEdit => {
                if let Some(cmd) = self.state.save_edit() {
                    self.send(cmd);
                }
            }
            UiEvent::CancelEdit => self.state.cancel_edit(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

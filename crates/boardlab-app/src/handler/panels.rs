//! Bottom panel handlers
//!
//! Terminal and files panels are mutually exclusive. The shared height is
//! initialized the first time either opens and reused afterwards.

use boardlab_core::PanelHeight;

use super::{UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::AppState;

fn resize_editor(state: &AppState) -> UpdateAction {
    UpdateAction::ResizeEditor {
        panel: state.editor_inset(),
    }
}

/// Open the terminal (never toggles closed). Returns the layout effect when
/// anything changed.
pub(crate) fn open_terminal(state: &mut AppState) -> Option<UpdateAction> {
    if state.panels.terminal_open {
        return None;
    }
    state
        .panels
        .ensure_height(state.settings.panels.default_height);
    state.panels.terminal_open = true;
    state.panels.files_open = false;
    Some(resize_editor(state))
}

pub(crate) fn handle_show_terminal(state: &mut AppState) -> UpdateResult {
    state
        .panels
        .ensure_height(state.settings.panels.default_height);
    state.panels.terminal_open = !state.panels.terminal_open;
    state.panels.files_open = false;
    UpdateResult::action(resize_editor(state))
}

pub(crate) fn handle_show_files(state: &mut AppState) -> UpdateResult {
    state
        .panels
        .ensure_height(state.settings.panels.default_height);
    state.panels.terminal_open = false;
    state.panels.files_open = !state.panels.files_open;
    UpdateResult::action(resize_editor(state)).with_message(Message::UpdateFiles)
}

pub(crate) fn handle_close_panel(state: &mut AppState) -> UpdateResult {
    state.panels.terminal_open = false;
    state.panels.files_open = false;
    UpdateResult::action(resize_editor(state))
}

pub(crate) fn handle_start_resizing(state: &mut AppState) -> UpdateResult {
    if state.panels.resizing {
        return UpdateResult::none();
    }
    state.panels.resizing = true;
    UpdateResult::action(UpdateAction::TrackPanelResize)
}

pub(crate) fn handle_panel_resized(state: &mut AppState, height: PanelHeight) -> UpdateResult {
    state.panels.height = Some(height);
    UpdateResult::action(resize_editor(state))
}

pub(crate) fn handle_resize_ended(state: &mut AppState) -> UpdateResult {
    state.panels.resizing = false;
    UpdateResult::none()
}

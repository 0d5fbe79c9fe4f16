//! Connection lifecycle handlers
//!
//! `Disconnected -> Connecting -> Connected -> Disconnected`, with a direct
//! return to `Disconnected` on transport failure. Device-initiated loss and
//! the user's disconnect share [`handle_disconnect`].

use boardlab_core::SerialPort;
use tracing::{debug, warn};

use super::{files, notification, panels, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::{AppState, ConnectionState};

pub(crate) fn handle_load_ports() -> UpdateResult {
    UpdateResult::action(UpdateAction::LoadPorts { open_dialog: false })
}

pub(crate) fn handle_ports_loaded(
    state: &mut AppState,
    ports: Vec<SerialPort>,
    open_dialog: bool,
) -> UpdateResult {
    state.ports = ports;
    if open_dialog {
        state.is_port_dialog_open = true;
    }
    UpdateResult::none()
}

/// Force a disconnect before listing ports for the picker
pub(crate) fn handle_open_port_dialog() -> UpdateResult {
    UpdateResult::action(UpdateAction::LoadPorts { open_dialog: true })
        .with_message(Message::Disconnect)
}

pub(crate) fn handle_close_port_dialog(state: &mut AppState) -> UpdateResult {
    state.is_port_dialog_open = false;
    UpdateResult::none()
}

pub(crate) fn handle_connect(state: &mut AppState, path: String) -> UpdateResult {
    state.connection = ConnectionState::Connecting { path: path.clone() };
    UpdateResult::action(UpdateAction::ConnectDevice { path })
}

/// Transport is open and execution has been stopped
///
/// Only completes the pending attempt for `path`. A completion that lands
/// after a disconnect closes the transport it just opened.
pub(crate) fn handle_device_connected(state: &mut AppState, path: String) -> UpdateResult {
    match &state.connection {
        ConnectionState::Connecting { path: pending } if *pending == path => {}
        ConnectionState::Disconnected => {
            warn!("Connection to {} completed after disconnect, closing it", path);
            return UpdateResult::action(UpdateAction::ReleaseDevice);
        }
        other => {
            debug!("Ignoring stale connection to {} while {:?}", path, other);
            return UpdateResult::none();
        }
    }

    let mut actions = Vec::new();

    // Rebinding would duplicate every keystroke
    if !state.is_terminal_bound {
        state.is_terminal_bound = true;
        actions.push(UpdateAction::BindTerminalInput);
    }
    actions.push(UpdateAction::SubscribeDevice);

    state.connection = ConnectionState::Connected { path };

    let connected_after = state.settings.notifications.connected();
    actions.extend(notification::show(state, "Connected", Some(connected_after)));

    actions.push(files::refresh_listings(state));

    state.is_port_dialog_open = false;
    actions.extend(panels::open_terminal(state));

    UpdateResult::actions(actions)
}

pub(crate) fn handle_connect_failed(
    state: &mut AppState,
    path: String,
    error: String,
) -> UpdateResult {
    warn!("Failed to connect to {}: {}", path, error);
    if state.connection.path() == Some(path.as_str()) && !state.is_connected() {
        state.connection = ConnectionState::Disconnected;
    }
    UpdateResult::none()
}

/// Idempotent: a second call from `Disconnected` changes nothing and shows
/// no notification.
pub(crate) fn handle_disconnect(state: &mut AppState) -> UpdateResult {
    let was_connected = state.is_connected();
    let was_active = !state.connection.is_disconnected();
    let terminal_was_open = state.panels.terminal_open;

    let mut actions = Vec::new();
    if was_connected {
        actions.extend(notification::show(state, "Disconnected", None));
    }

    state.connection = ConnectionState::Disconnected;
    state.serial_files.clear();
    state.panels.terminal_open = false;

    if was_active {
        actions.push(UpdateAction::ReleaseDevice);
    } else {
        debug!("Disconnect while already disconnected");
    }
    if terminal_was_open {
        actions.push(UpdateAction::ResizeEditor {
            panel: state.editor_inset(),
        });
    }

    UpdateResult::actions(actions)
}

//! Tests for handler module

use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::message::Message;
use crate::state::{AppState, ConnectionState};
use boardlab_bridge::OpenedFolder;
use boardlab_core::{DeviceKind, NavigationFolder, PanelHeight};

const PORT: &str = "/dev/ttyUSB0";

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Flatten the single action of a result
fn actions_of(result: &UpdateResult) -> Vec<UpdateAction> {
    match &result.action {
        None => Vec::new(),
        Some(UpdateAction::Batch(actions)) => actions.clone(),
        Some(action) => vec![action.clone()],
    }
}

/// Connect to `PORT` and land the transport
fn complete_connection(state: &mut AppState) -> UpdateResult {
    update(
        state,
        Message::Connect {
            path: PORT.to_string(),
        },
    );
    update(
        state,
        Message::DeviceConnected {
            path: PORT.to_string(),
        },
    )
}

fn connected_state() -> AppState {
    let mut state = AppState::new();
    state.connection = ConnectionState::Connected {
        path: PORT.to_string(),
    };
    state.is_terminal_bound = true;
    state
}

// ─────────────────────────────────────────────────────────
// Connection
// ─────────────────────────────────────────────────────────

#[test]
fn test_connect_records_path_and_requests_transport() {
    let mut state = AppState::new();

    let result = update(
        &mut state,
        Message::Connect {
            path: PORT.to_string(),
        },
    );

    assert_eq!(
        state.connection,
        ConnectionState::Connecting {
            path: PORT.to_string()
        }
    );
    assert_eq!(
        result.action,
        Some(UpdateAction::ConnectDevice {
            path: PORT.to_string()
        })
    );
}

#[test]
fn test_first_device_connected_binds_terminal() {
    let mut state = AppState::new();
    state.is_port_dialog_open = true;

    let result = complete_connection(&mut state);
    let actions = actions_of(&result);

    assert!(state.is_terminal_bound);
    assert!(state.is_connected());
    assert!(!state.is_port_dialog_open);
    assert!(state.panels.terminal_open);
    assert_eq!(state.message.text, "Connected");
    assert_eq!(actions[0], UpdateAction::BindTerminalInput);
    assert_eq!(actions[1], UpdateAction::SubscribeDevice);
    assert!(actions.contains(&UpdateAction::ScheduleMessageHide {
        revision: state.message.revision,
        after: Duration::from_millis(150),
    }));
    assert!(actions.contains(&UpdateAction::RefreshListings {
        serial: Some("/".to_string()),
        disk: None,
    }));
}

#[test]
fn test_second_device_connected_never_rebinds() {
    let mut state = AppState::new();
    complete_connection(&mut state);
    update(&mut state, Message::Disconnect);

    let result = complete_connection(&mut state);
    let actions = actions_of(&result);

    assert!(!actions.contains(&UpdateAction::BindTerminalInput));
    assert!(actions.contains(&UpdateAction::SubscribeDevice));
}

#[test]
fn test_connect_keeps_open_terminal_open() {
    let mut state = AppState::new();
    update(&mut state, Message::ShowTerminal);

    complete_connection(&mut state);

    assert!(state.panels.terminal_open);
}

#[test]
fn test_device_connected_after_disconnect_closes_transport() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::Connect {
            path: PORT.to_string(),
        },
    );
    update(&mut state, Message::Disconnect);

    let result = update(
        &mut state,
        Message::DeviceConnected {
            path: PORT.to_string(),
        },
    );

    assert_eq!(state.connection, ConnectionState::Disconnected);
    assert!(!state.is_terminal_bound);
    assert!(!state.panels.terminal_open);
    assert_eq!(result.action, Some(UpdateAction::ReleaseDevice));
}

#[test]
fn test_device_connected_for_superseded_path_is_ignored() {
    let mut state = AppState::new();
    state.connection = ConnectionState::Connecting {
        path: "COM4".to_string(),
    };

    let result = update(
        &mut state,
        Message::DeviceConnected {
            path: PORT.to_string(),
        },
    );

    assert!(result.action.is_none());
    assert_eq!(
        state.connection,
        ConnectionState::Connecting {
            path: "COM4".to_string()
        }
    );
}

#[test]
fn test_disconnect_when_connected() {
    let mut state = connected_state();
    state.serial_files = names(&["main.py"]);
    state.panels.terminal_open = true;

    let result = update(&mut state, Message::Disconnect);
    let actions = actions_of(&result);

    assert_eq!(state.connection, ConnectionState::Disconnected);
    assert!(state.serial_files.is_empty());
    assert!(!state.panels.terminal_open);
    assert_eq!(state.message.text, "Disconnected");
    assert_eq!(state.message.revision, 1);
    assert!(actions.contains(&UpdateAction::ReleaseDevice));
    assert!(actions.contains(&UpdateAction::ResizeEditor { panel: None }));
}

#[test]
fn test_disconnect_twice_notifies_once() {
    let mut state = connected_state();

    update(&mut state, Message::Disconnect);
    let result = update(&mut state, Message::Disconnect);

    assert_eq!(state.message.revision, 1);
    assert!(result.action.is_none());
}

#[test]
fn test_disconnect_while_connecting_releases_silently() {
    let mut state = AppState::new();
    state.connection = ConnectionState::Connecting {
        path: PORT.to_string(),
    };

    let result = update(&mut state, Message::Disconnect);

    assert_eq!(state.message.revision, 0);
    assert_eq!(result.action, Some(UpdateAction::ReleaseDevice));
}

#[test]
fn test_connect_failed_only_resets_matching_attempt() {
    let mut state = AppState::new();
    state.connection = ConnectionState::Connecting {
        path: "COM4".to_string(),
    };

    update(
        &mut state,
        Message::ConnectFailed {
            path: PORT.to_string(),
            error: "busy".to_string(),
        },
    );
    assert!(matches!(state.connection, ConnectionState::Connecting { .. }));

    update(
        &mut state,
        Message::ConnectFailed {
            path: "COM4".to_string(),
            error: "busy".to_string(),
        },
    );
    assert_eq!(state.connection, ConnectionState::Disconnected);
}

#[test]
fn test_open_port_dialog_disconnects_first() {
    let mut state = connected_state();

    let result = update(&mut state, Message::OpenPortDialog);

    assert_eq!(result.message, Some(Message::Disconnect));
    assert_eq!(
        result.action,
        Some(UpdateAction::LoadPorts { open_dialog: true })
    );
}

#[test]
fn test_ports_loaded_without_dialog() {
    let mut state = AppState::new();

    update(
        &mut state,
        Message::PortsLoaded {
            ports: vec![boardlab_core::SerialPort::new(PORT)],
            open_dialog: false,
        },
    );

    assert_eq!(state.ports.len(), 1);
    assert!(!state.is_port_dialog_open);
}

// ─────────────────────────────────────────────────────────
// Execution
// ─────────────────────────────────────────────────────────

#[test]
fn test_run_opens_terminal_before_running() {
    let mut state = AppState::new();
    state.panels.files_open = true;

    let result = update(&mut state, Message::Run);
    let actions = actions_of(&result);

    assert!(state.panels.terminal_open);
    assert!(!state.panels.files_open);
    assert_eq!(actions.last(), Some(&UpdateAction::RunProgram));
}

#[test]
fn test_run_with_terminal_open_only_runs() {
    let mut state = AppState::new();
    update(&mut state, Message::ShowTerminal);

    let result = update(&mut state, Message::Run);

    assert!(state.panels.terminal_open);
    assert_eq!(result.action, Some(UpdateAction::RunProgram));
}

#[test]
fn test_stop_and_reset_pass_through() {
    let mut state = AppState::new();
    assert_eq!(
        update(&mut state, Message::Stop).action,
        Some(UpdateAction::StopProgram)
    );
    assert_eq!(
        update(&mut state, Message::Reset).action,
        Some(UpdateAction::ResetDevice)
    );
}

// ─────────────────────────────────────────────────────────
// Listings
// ─────────────────────────────────────────────────────────

#[test]
fn test_update_files_with_nothing_to_list() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::UpdateFiles);
    assert!(result.action.is_none());
}

#[test]
fn test_update_files_targets_navigation_folder() {
    let mut state = connected_state();
    state.disk_root = Some(PathBuf::from("/work"));
    state.navigation = NavigationFolder::Lib;

    let result = update(&mut state, Message::UpdateFiles);

    assert_eq!(
        result.action,
        Some(UpdateAction::RefreshListings {
            serial: Some("/lib".to_string()),
            disk: Some(PathBuf::from("/work/lib")),
        })
    );
}

#[test]
fn test_serial_listing_is_filtered_and_replaced() {
    let mut state = connected_state();
    state.serial_files = names(&["old.py"]);

    update(
        &mut state,
        Message::SerialFilesListed {
            files: names(&["main.py", ".boot", "lib"]),
        },
    );

    assert_eq!(state.serial_files, names(&["main.py"]));
}

#[test]
fn test_select_folder_then_refresh() {
    let mut state = AppState::new();

    let result = update(&mut state, Message::SelectLibFolder);
    assert_eq!(state.navigation, NavigationFolder::Lib);
    assert_eq!(result.message, Some(Message::UpdateFiles));

    update(&mut state, Message::SelectRootFolder);
    assert_eq!(state.navigation.as_path(), "/");
}

// ─────────────────────────────────────────────────────────
// Selection & editing
// ─────────────────────────────────────────────────────────

#[test]
fn test_select_serial_file_while_editing_is_refused() {
    let mut state = connected_state();
    state.selected_file = Some("boot.py".to_string());
    update(&mut state, Message::EditFilename);

    let result = update(
        &mut state,
        Message::SelectFile {
            device: DeviceKind::Serial,
            filename: "main.py".to_string(),
        },
    );

    assert!(result.action.is_none());
    assert_eq!(state.selected_file.as_deref(), Some("boot.py"));
    assert_eq!(state.selected_device, DeviceKind::Serial);
}

#[test]
fn test_select_disk_file_while_editing_loads() {
    let mut state = AppState::new();
    state.disk_root = Some(PathBuf::from("/work"));
    state.is_editing_filename = true;

    let result = update(
        &mut state,
        Message::SelectFile {
            device: DeviceKind::Disk,
            filename: "a.py".to_string(),
        },
    );

    assert_eq!(
        result.action,
        Some(UpdateAction::LoadFile {
            device: DeviceKind::Disk,
            filename: "a.py".to_string(),
            target: FileTarget::Disk {
                dir: PathBuf::from("/work"),
                filename: "a.py".to_string(),
            },
        })
    );
}

#[test]
fn test_select_serial_file_in_lib_folder() {
    let mut state = connected_state();
    state.navigation = NavigationFolder::Lib;

    let result = update(
        &mut state,
        Message::SelectFile {
            device: DeviceKind::Serial,
            filename: "util.py".to_string(),
        },
    );

    assert!(matches!(
        result.action,
        Some(UpdateAction::LoadFile {
            target: FileTarget::Serial { ref path },
            ..
        }) if path == "/lib/util.py"
    ));
}

#[test]
fn test_new_file_uses_unnamed_sentinel() {
    let mut state = AppState::new();
    state.is_new_file_dialog_open = true;

    let result = update(
        &mut state,
        Message::NewFile {
            device: DeviceKind::Serial,
        },
    );

    assert_eq!(state.selected_device, DeviceKind::Serial);
    assert_eq!(state.selected_file.as_deref(), Some("undefined"));
    assert!(!state.is_new_file_dialog_open);
    assert_eq!(
        result.action,
        Some(UpdateAction::SetEditorText(String::new()))
    );
}

#[test]
fn test_save_disk_without_root_still_refreshes() {
    let mut state = AppState::new();
    state.selected_file = Some("a.py".to_string());

    let result = update(&mut state, Message::Save);

    assert!(result.action.is_none());
    assert_eq!(result.message, Some(Message::UpdateFiles));
}

#[test]
fn test_save_serial_defaults_to_sentinel_name() {
    let mut state = connected_state();
    state.selected_device = DeviceKind::Serial;

    let result = update(&mut state, Message::Save);

    assert_eq!(
        result.action,
        Some(UpdateAction::SaveFile {
            target: FileTarget::Serial {
                path: "/undefined".to_string()
            },
            then: Message::UpdateFiles,
        })
    );
}

#[test]
fn test_remove_without_selection_does_nothing() {
    let mut state = connected_state();
    let result = update(&mut state, Message::Remove);
    assert!(result.action.is_none());
    assert!(result.message.is_none());
}

#[test]
fn test_save_filename_renames_listed_serial_file() {
    let mut state = connected_state();
    state.selected_device = DeviceKind::Serial;
    state.selected_file = Some("main.py".to_string());
    state.serial_files = names(&["main.py"]);
    state.is_editing_filename = true;

    let result = update(
        &mut state,
        Message::SaveFilename {
            filename: "app.py".to_string(),
        },
    );

    assert_eq!(state.selected_file.as_deref(), Some("app.py"));
    assert!(state.is_editing_filename, "cleared only once the rename lands");
    assert_eq!(
        result.action,
        Some(UpdateAction::RenameFile {
            target: RenameTarget::Serial {
                from: "/main.py".to_string(),
                to: "/app.py".to_string(),
            },
            then: Message::FilenameSaved,
        })
    );
}

#[test]
fn test_save_filename_creates_when_only_other_device_lists_it() {
    let mut state = connected_state();
    state.disk_root = Some(PathBuf::from("/work"));
    state.selected_device = DeviceKind::Serial;
    state.selected_file = Some("main.py".to_string());
    state.serial_files = Vec::new();
    state.disk_files = names(&["main.py"]);

    let result = update(
        &mut state,
        Message::SaveFilename {
            filename: "app.py".to_string(),
        },
    );

    assert_eq!(
        result.action,
        Some(UpdateAction::SaveFile {
            target: FileTarget::Serial {
                path: "/app.py".to_string()
            },
            then: Message::FilenameSaved,
        })
    );
}

#[test]
fn test_save_filename_renames_listed_disk_file() {
    let mut state = AppState::new();
    state.disk_root = Some(PathBuf::from("/work"));
    state.selected_file = Some("a.py".to_string());
    state.disk_files = names(&["a.py"]);

    let result = update(
        &mut state,
        Message::SaveFilename {
            filename: "b.py".to_string(),
        },
    );

    assert_eq!(
        result.action,
        Some(UpdateAction::RenameFile {
            target: RenameTarget::Disk {
                dir: PathBuf::from("/work"),
                from: "a.py".to_string(),
                to: "b.py".to_string(),
            },
            then: Message::FilenameSaved,
        })
    );
}

#[test]
fn test_save_filename_without_disk_root_completes_immediately() {
    let mut state = AppState::new();
    state.selected_file = Some("a.py".to_string());

    let result = update(
        &mut state,
        Message::SaveFilename {
            filename: "b.py".to_string(),
        },
    );

    assert!(result.action.is_none());
    assert_eq!(result.message, Some(Message::FilenameSaved));
}

#[test]
fn test_filename_saved_clears_flag_and_notifies() {
    let mut state = AppState::new();
    state.is_editing_filename = true;

    let result = update(&mut state, Message::FilenameSaved);
    let actions = actions_of(&result);

    assert!(!state.is_editing_filename);
    assert_eq!(state.message.text, "Filename is saved.");
    assert!(actions.contains(&UpdateAction::ScheduleMessageHide {
        revision: state.message.revision,
        after: Duration::from_secs(1),
    }));
}

#[test]
fn test_folder_opened_shows_files_panel_once() {
    let mut state = AppState::new();
    let folder = OpenedFolder {
        root: PathBuf::from("/work"),
        files: names(&["a.py"]),
    };

    let result = update(
        &mut state,
        Message::FolderOpened {
            folder: folder.clone(),
        },
    );
    assert_eq!(state.disk_root, Some(PathBuf::from("/work")));
    assert_eq!(state.disk_files, names(&["a.py"]));
    assert!(state.panels.files_open);
    assert_eq!(result.message, Some(Message::UpdateFiles));

    // Already open: stays open
    update(&mut state, Message::FolderOpened { folder });
    assert!(state.panels.files_open);
}

#[test]
fn test_transfer_needs_root_and_selection() {
    let mut state = AppState::new();
    state.selected_file = Some("a.py".to_string());
    assert!(update(&mut state, Message::Upload).action.is_none());

    state.disk_root = Some(PathBuf::from("/work"));
    state.navigation = NavigationFolder::Lib;
    let result = update(&mut state, Message::Download);

    assert_eq!(state.message.text, "Downloading file... Please wait");
    assert_eq!(
        result.action,
        Some(UpdateAction::Transfer {
            direction: TransferDirection::Download,
            disk_root: PathBuf::from("/work"),
            filename: "a.py".to_string(),
        })
    );
}

// ─────────────────────────────────────────────────────────
// Panels
// ─────────────────────────────────────────────────────────

#[test]
fn test_panels_are_mutually_exclusive() {
    let mut state = AppState::new();

    update(&mut state, Message::ShowTerminal);
    assert!(state.panels.terminal_open);
    assert!(!state.panels.files_open);

    update(&mut state, Message::ShowFiles);
    assert!(!state.panels.terminal_open);
    assert!(state.panels.files_open);
}

#[test]
fn test_panel_toggles_closed() {
    let mut state = AppState::new();
    update(&mut state, Message::ShowTerminal);

    let result = update(&mut state, Message::ShowTerminal);

    assert!(!state.panels.terminal_open);
    assert_eq!(
        result.action,
        Some(UpdateAction::ResizeEditor { panel: None })
    );
}

#[test]
fn test_panel_height_lazy_default_then_reused() {
    let mut state = AppState::new();
    assert!(state.panels.height.is_none());

    update(&mut state, Message::ShowFiles);
    assert_eq!(state.panels.height, Some(PanelHeight::DEFAULT));

    update(
        &mut state,
        Message::PanelResized {
            height: PanelHeight::Px(312),
        },
    );
    update(&mut state, Message::ClosePanel);

    let result = update(&mut state, Message::ShowTerminal);
    assert_eq!(state.panels.height, Some(PanelHeight::Px(312)));
    assert_eq!(
        result.action,
        Some(UpdateAction::ResizeEditor {
            panel: Some(PanelHeight::Px(312))
        })
    );
}

#[test]
fn test_show_files_refreshes_listings() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::ShowFiles);
    assert_eq!(result.message, Some(Message::UpdateFiles));
}

#[test]
fn test_start_resizing_installs_one_listener() {
    let mut state = AppState::new();

    let first = update(&mut state, Message::StartResizingPanel);
    let second = update(&mut state, Message::StartResizingPanel);

    assert_eq!(first.action, Some(UpdateAction::TrackPanelResize));
    assert!(second.action.is_none());

    update(&mut state, Message::PanelResizeEnded);
    let third = update(&mut state, Message::StartResizingPanel);
    assert_eq!(third.action, Some(UpdateAction::TrackPanelResize));
}

#[test]
fn test_clean_terminal() {
    let mut state = AppState::new();
    assert_eq!(
        update(&mut state, Message::CleanTerminal).action,
        Some(UpdateAction::ClearTerminal)
    );
}

// ─────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────

#[test]
fn test_message_with_timeout_schedules_hide() {
    let mut state = AppState::new();

    let result = update(
        &mut state,
        Message::ShowMessage {
            text: "Saved".to_string(),
            timeout: Some(Duration::from_millis(500)),
        },
    );

    assert!(state.message.visible);
    assert!(state.message.shown_at.is_some());
    assert_eq!(
        result.action,
        Some(UpdateAction::ScheduleMessageHide {
            revision: 1,
            after: Duration::from_millis(500),
        })
    );
}

#[test]
fn test_message_without_timeout_stays() {
    let mut state = AppState::new();

    let none = update(
        &mut state,
        Message::ShowMessage {
            text: "Working".to_string(),
            timeout: None,
        },
    );
    let zero = update(
        &mut state,
        Message::ShowMessage {
            text: "Working".to_string(),
            timeout: Some(Duration::ZERO),
        },
    );

    assert!(none.action.is_none());
    assert!(zero.action.is_none());
}

#[test]
fn test_stale_hide_is_ignored() {
    let mut state = AppState::new();
    update(
        &mut state,
        Message::ShowMessage {
            text: "first".to_string(),
            timeout: Some(Duration::from_millis(500)),
        },
    );
    update(
        &mut state,
        Message::ShowMessage {
            text: "second".to_string(),
            timeout: Some(Duration::from_millis(500)),
        },
    );

    update(&mut state, Message::HideMessage { revision: 1 });
    assert!(state.message.visible);

    update(&mut state, Message::HideMessage { revision: 2 });
    assert!(!state.message.visible);
}

#[test]
fn test_quit_message_sets_quitting() {
    let mut state = AppState::new();
    assert!(!state.should_quit());

    update(&mut state, Message::Quit);

    assert!(state.should_quit());
}

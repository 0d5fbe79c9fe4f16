//! File handlers: listing refresh, selection, save, remove, rename, transfers
//!
//! Listings are never patched after a mutation. Every mutation ends with a
//! refresh instead.

use boardlab_bridge::OpenedFolder;
use boardlab_core::{filter_serial_listing, DeviceKind, NavigationFolder};
use tracing::{debug, warn};

use super::{notification, panels, FileTarget, RenameTarget, UpdateAction, UpdateResult};
use crate::message::{Message, TransferDirection};
use crate::state::AppState;

/// Listing effect for the current connection, disk root and folder
pub(crate) fn refresh_listings(state: &AppState) -> UpdateAction {
    UpdateAction::RefreshListings {
        serial: state
            .is_connected()
            .then(|| state.navigation.as_path().to_string()),
        disk: state.disk_dir(),
    }
}

/// Target of `filename` on `device`, `None` when the disk has no root
fn file_target(state: &AppState, device: DeviceKind, filename: &str) -> Option<FileTarget> {
    match device {
        DeviceKind::Serial => Some(FileTarget::Serial {
            path: state.navigation.serial_path(filename),
        }),
        DeviceKind::Disk => state.disk_dir().map(|dir| FileTarget::Disk {
            dir,
            filename: filename.to_string(),
        }),
    }
}

pub(crate) fn handle_update_files(state: &mut AppState) -> UpdateResult {
    match refresh_listings(state) {
        UpdateAction::RefreshListings {
            serial: None,
            disk: None,
        } => {
            debug!("Nothing to list: not connected and no folder open");
            UpdateResult::none()
        }
        action => UpdateResult::action(action),
    }
}

pub(crate) fn handle_serial_files_listed(state: &mut AppState, files: Vec<String>) -> UpdateResult {
    state.serial_files = filter_serial_listing(files);
    UpdateResult::none()
}

pub(crate) fn handle_disk_files_listed(state: &mut AppState, files: Vec<String>) -> UpdateResult {
    state.disk_files = files;
    UpdateResult::none()
}

pub(crate) fn handle_select_folder(state: &mut AppState, folder: NavigationFolder) -> UpdateResult {
    state.navigation = folder;
    UpdateResult::message(Message::UpdateFiles)
}

pub(crate) fn handle_new_file(state: &mut AppState, device: DeviceKind) -> UpdateResult {
    state.selected_device = device;
    state.selected_file = Some(state.settings.files.unnamed_file.clone());
    state.is_new_file_dialog_open = false;
    UpdateResult::action(UpdateAction::SetEditorText(String::new()))
}

/// Serial loads are refused while a rename is pending so two commands
/// never share the half-duplex link.
pub(crate) fn handle_select_file(
    state: &mut AppState,
    device: DeviceKind,
    filename: String,
) -> UpdateResult {
    state.selected_device = device;

    if device == DeviceKind::Serial && state.is_editing_filename {
        debug!("Not loading {} while a filename edit is pending", filename);
        return UpdateResult::none();
    }

    state.selected_file = Some(filename.clone());

    match file_target(state, device, &filename) {
        Some(target) => UpdateResult::action(UpdateAction::LoadFile {
            device,
            filename,
            target,
        }),
        None => {
            warn!("Cannot load {}: no folder open", filename);
            UpdateResult::none()
        }
    }
}

pub(crate) fn handle_file_loaded(device: DeviceKind, filename: String) -> UpdateResult {
    debug!("Loaded {} from {}", filename, device);
    UpdateResult::none()
}

pub(crate) fn handle_save(state: &mut AppState) -> UpdateResult {
    let filename = state.selected_file_or_unnamed();
    match file_target(state, state.selected_device, &filename) {
        Some(target) => UpdateResult::action(UpdateAction::SaveFile {
            target,
            then: Message::UpdateFiles,
        }),
        None => {
            debug!("Skipping disk save of {}: no folder open", filename);
            UpdateResult::message(Message::UpdateFiles)
        }
    }
}

pub(crate) fn handle_remove(state: &mut AppState) -> UpdateResult {
    let Some(filename) = state.selected_file.clone() else {
        warn!("Remove requested with no file selected");
        return UpdateResult::none();
    };
    match file_target(state, state.selected_device, &filename) {
        Some(target) => UpdateResult::action(UpdateAction::RemoveFile { target }),
        None => {
            debug!("Skipping disk remove of {}: no folder open", filename);
            UpdateResult::message(Message::UpdateFiles)
        }
    }
}

pub(crate) fn handle_edit_filename(state: &mut AppState) -> UpdateResult {
    state.is_editing_filename = true;
    UpdateResult::none()
}

/// Rename when the old name is in the cached listing of the selected
/// device, otherwise create the file under the new name.
pub(crate) fn handle_save_filename(state: &mut AppState, filename: String) -> UpdateResult {
    let old = state.selected_file.replace(filename.clone());
    let exists = old
        .as_ref()
        .is_some_and(|old| state.files(state.selected_device).contains(old));

    let action = match (state.selected_device, old) {
        (DeviceKind::Serial, Some(old)) if exists => Some(UpdateAction::RenameFile {
            target: RenameTarget::Serial {
                from: state.navigation.serial_path(&old),
                to: state.navigation.serial_path(&filename),
            },
            then: Message::FilenameSaved,
        }),
        (DeviceKind::Disk, Some(old)) if exists => {
            state.disk_dir().map(|dir| UpdateAction::RenameFile {
                target: RenameTarget::Disk {
                    dir,
                    from: old,
                    to: filename.clone(),
                },
                then: Message::FilenameSaved,
            })
        }
        (device, _) => file_target(state, device, &filename).map(|target| {
            UpdateAction::SaveFile {
                target,
                then: Message::FilenameSaved,
            }
        }),
    };

    match action {
        Some(action) => UpdateResult::action(action),
        None => UpdateResult::message(Message::FilenameSaved),
    }
}

pub(crate) fn handle_filename_saved(state: &mut AppState) -> UpdateResult {
    state.is_editing_filename = false;
    let after = state.settings.notifications.filename_saved();
    let mut actions = vec![refresh_listings(state)];
    actions.extend(notification::show(state, "Filename is saved.", Some(after)));
    UpdateResult::actions(actions)
}

pub(crate) fn handle_open_folder() -> UpdateResult {
    UpdateResult::action(UpdateAction::OpenFolder)
}

pub(crate) fn handle_folder_opened(state: &mut AppState, folder: OpenedFolder) -> UpdateResult {
    state.disk_root = Some(folder.root);
    state.disk_files = folder.files;
    if state.panels.files_open {
        UpdateResult::none()
    } else {
        panels::handle_show_files(state)
    }
}

pub(crate) fn handle_transfer(state: &mut AppState, direction: TransferDirection) -> UpdateResult {
    let (Some(disk_root), Some(filename)) = (state.disk_root.clone(), state.selected_file.clone())
    else {
        warn!("{:?} needs an open folder and a selected file", direction);
        return UpdateResult::none();
    };

    let mut actions = Vec::new();
    actions.extend(notification::show(state, direction.progress_text(), None));
    actions.push(UpdateAction::Transfer {
        direction,
        disk_root,
        filename,
    });
    UpdateResult::actions(actions)
}

pub(crate) fn handle_transfer_completed(
    state: &mut AppState,
    direction: TransferDirection,
) -> UpdateResult {
    transfer_finished(state, direction.done_text())
}

pub(crate) fn handle_transfer_failed(
    state: &mut AppState,
    direction: TransferDirection,
    error: String,
) -> UpdateResult {
    warn!("{:?} failed: {}", direction, error);
    transfer_finished(state, direction.failed_text())
}

fn transfer_finished(state: &mut AppState, text: &str) -> UpdateResult {
    let after = state.settings.notifications.transfer();
    let mut actions = Vec::new();
    actions.extend(notification::show(state, text, Some(after)));
    actions.push(refresh_listings(state));
    UpdateResult::actions(actions)
}

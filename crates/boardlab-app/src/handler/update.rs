//! Main update function - handles state transitions (TEA pattern)

use boardlab_core::NavigationFolder;

use super::{connection, execution, files, notification, panels, UpdateAction, UpdateResult};
use crate::message::{Message, TransferDirection};
use crate::state::AppState;

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        // ─────────────────────────────────────────────────────────
        // Serial Connection
        // ─────────────────────────────────────────────────────────
        Message::LoadPorts => connection::handle_load_ports(),
        Message::PortsLoaded { ports, open_dialog } => {
            connection::handle_ports_loaded(state, ports, open_dialog)
        }
        Message::OpenPortDialog => connection::handle_open_port_dialog(),
        Message::ClosePortDialog => connection::handle_close_port_dialog(state),
        Message::Connect { path } => connection::handle_connect(state, path),
        Message::DeviceConnected { path } => connection::handle_device_connected(state, path),
        Message::ConnectFailed { path, error } => {
            connection::handle_connect_failed(state, path, error)
        }
        Message::Disconnect => connection::handle_disconnect(state),

        // ─────────────────────────────────────────────────────────
        // Code Execution
        // ─────────────────────────────────────────────────────────
        Message::Run => execution::handle_run(state),
        Message::Stop => execution::handle_stop(),
        Message::Reset => execution::handle_reset(),

        // ─────────────────────────────────────────────────────────
        // File Management
        // ─────────────────────────────────────────────────────────
        Message::OpenNewFileDialog => {
            state.is_new_file_dialog_open = true;
            UpdateResult::none()
        }
        Message::CloseNewFileDialog => {
            state.is_new_file_dialog_open = false;
            UpdateResult::none()
        }
        Message::NewFile { device } => files::handle_new_file(state, device),
        Message::Save => files::handle_save(state),
        Message::Remove => files::handle_remove(state),
        Message::SelectFile { device, filename } => {
            files::handle_select_file(state, device, filename)
        }
        Message::FileLoaded { device, filename } => files::handle_file_loaded(device, filename),
        Message::OpenFolder => files::handle_open_folder(),
        Message::FolderOpened { folder } => files::handle_folder_opened(state, folder),
        Message::UpdateFiles => files::handle_update_files(state),
        Message::SerialFilesListed { files } => files::handle_serial_files_listed(state, files),
        Message::DiskFilesListed { files } => files::handle_disk_files_listed(state, files),
        Message::Upload => files::handle_transfer(state, TransferDirection::Upload),
        Message::Download => files::handle_transfer(state, TransferDirection::Download),
        Message::TransferCompleted { direction } => {
            files::handle_transfer_completed(state, direction)
        }
        Message::TransferFailed { direction, error } => {
            files::handle_transfer_failed(state, direction, error)
        }
        Message::SelectRootFolder => files::handle_select_folder(state, NavigationFolder::Root),
        Message::SelectLibFolder => files::handle_select_folder(state, NavigationFolder::Lib),

        Message::EditFilename => files::handle_edit_filename(state),
        Message::SaveFilename { filename } => files::handle_save_filename(state, filename),
        Message::FilenameSaved => files::handle_filename_saved(state),

        // ─────────────────────────────────────────────────────────
        // Panels
        // ─────────────────────────────────────────────────────────
        Message::ShowTerminal => panels::handle_show_terminal(state),
        Message::ShowFiles => panels::handle_show_files(state),
        Message::ClosePanel => panels::handle_close_panel(state),
        Message::StartResizingPanel => panels::handle_start_resizing(state),
        Message::PanelResized { height } => panels::handle_panel_resized(state, height),
        Message::PanelResizeEnded => panels::handle_resize_ended(state),
        Message::CleanTerminal => UpdateResult::action(UpdateAction::ClearTerminal),

        // ─────────────────────────────────────────────────────────
        // Notifications
        // ─────────────────────────────────────────────────────────
        Message::ShowMessage { text, timeout } => {
            notification::handle_show_message(state, text, timeout)
        }
        Message::HideMessage { revision } => notification::handle_hide_message(state, revision),

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }
    }
}

//! Message types for the application (TEA pattern)

use std::time::Duration;

use boardlab_bridge::OpenedFolder;
use boardlab_core::{DeviceKind, PanelHeight, SerialPort};

/// Direction of a disk/board file copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Disk to board
    Upload,
    /// Board to disk
    Download,
}

impl TransferDirection {
    pub fn progress_text(&self) -> &'static str {
        match self {
            TransferDirection::Upload => "Uploading file... Please wait",
            TransferDirection::Download => "Downloading file... Please wait",
        }
    }

    pub fn done_text(&self) -> &'static str {
        match self {
            TransferDirection::Upload => "File uploaded!",
            TransferDirection::Download => "File downloaded!",
        }
    }

    pub fn failed_text(&self) -> &'static str {
        match self {
            TransferDirection::Upload => "Upload failed",
            TransferDirection::Download => "Download failed",
        }
    }
}

/// All possible messages in the application
///
/// UI intents and capability completions share this one type and the one
/// channel, so every state transition is serialized through `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Serial Connection
    // ─────────────────────────────────────────────────────────
    /// Refresh the port list without opening the dialog
    LoadPorts,

    /// Port enumeration finished
    PortsLoaded {
        ports: Vec<SerialPort>,
        open_dialog: bool,
    },

    /// Disconnect, refresh ports, then show the port picker
    OpenPortDialog,

    ClosePortDialog,

    /// Open the transport on `path`
    Connect { path: String },

    /// Transport opened and execution stopped
    DeviceConnected { path: String },

    /// Transport failed to open
    ConnectFailed { path: String, error: String },

    /// User request or transport loss; idempotent
    Disconnect,

    // ─────────────────────────────────────────────────────────
    // Code Execution
    // ─────────────────────────────────────────────────────────
    Run,
    Stop,
    Reset,

    // ─────────────────────────────────────────────────────────
    // File Management
    // ─────────────────────────────────────────────────────────
    OpenNewFileDialog,
    CloseNewFileDialog,

    /// Start an unsaved document targeting `device`
    NewFile { device: DeviceKind },

    /// Write the editor text to the selected file
    Save,

    /// Delete the selected file from the selected device
    Remove,

    SelectFile { device: DeviceKind, filename: String },

    /// Editor now holds the content of `filename`
    FileLoaded { device: DeviceKind, filename: String },

    /// Show the folder picker
    OpenFolder,

    FolderOpened { folder: OpenedFolder },

    /// Re-list both stores
    UpdateFiles,

    /// Raw board listing, filtered on receipt
    SerialFilesListed { files: Vec<String> },

    DiskFilesListed { files: Vec<String> },

    Upload,
    Download,

    TransferCompleted { direction: TransferDirection },

    TransferFailed {
        direction: TransferDirection,
        error: String,
    },

    SelectRootFolder,
    SelectLibFolder,

    // ─────────────────────────────────────────────────────────
    // Renaming
    // ─────────────────────────────────────────────────────────
    EditFilename,

    /// Rename the selected file, or create it under `filename`
    SaveFilename { filename: String },

    /// Rename or create finished
    FilenameSaved,

    // ─────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────
    /// Toggle the terminal panel
    ShowTerminal,

    /// Toggle the files panel
    ShowFiles,

    ClosePanel,

    /// Begin a divider drag
    StartResizingPanel,

    PanelResized { height: PanelHeight },

    /// Pointer released; the drag listener is gone
    PanelResizeEnded,

    CleanTerminal,

    // ─────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────
    /// Show `text`, auto-hiding after `timeout` when given
    ShowMessage {
        text: String,
        timeout: Option<Duration>,
    },

    /// Hide timer fired for notification `revision`
    HideMessage { revision: u64 },

    Quit,
}

impl Message {
    /// Event name used in dispatch logs
    pub fn event_name(&self) -> &'static str {
        match self {
            Message::LoadPorts => "load-ports",
            Message::PortsLoaded { .. } => "ports-loaded",
            Message::OpenPortDialog => "open-port-dialog",
            Message::ClosePortDialog => "close-port-dialog",
            Message::Connect { .. } => "connect",
            Message::DeviceConnected { .. } => "device-connected",
            Message::ConnectFailed { .. } => "connect-failed",
            Message::Disconnect => "disconnect",
            Message::Run => "run",
            Message::Stop => "stop",
            Message::Reset => "reset",
            Message::OpenNewFileDialog => "open-new-file-dialog",
            Message::CloseNewFileDialog => "close-new-file-dialog",
            Message::NewFile { .. } => "new-file",
            Message::Save => "save",
            Message::Remove => "remove",
            Message::SelectFile { .. } => "select-file",
            Message::FileLoaded { .. } => "file-loaded",
            Message::OpenFolder => "open-folder",
            Message::FolderOpened { .. } => "folder-opened",
            Message::UpdateFiles => "update-files",
            Message::SerialFilesListed { .. } => "serial-files-listed",
            Message::DiskFilesListed { .. } => "disk-files-listed",
            Message::Upload => "upload",
            Message::Download => "download",
            Message::TransferCompleted { .. } => "transfer-completed",
            Message::TransferFailed { .. } => "transfer-failed",
            Message::SelectRootFolder => "select-root-folder",
            Message::SelectLibFolder => "select-lib-folder",
            Message::EditFilename => "edit-filename",
            Message::SaveFilename { .. } => "save-filename",
            Message::FilenameSaved => "filename-saved",
            Message::ShowTerminal => "show-terminal",
            Message::ShowFiles => "show-files",
            Message::ClosePanel => "close-panel",
            Message::StartResizingPanel => "start-resizing-panel",
            Message::PanelResized { .. } => "panel-resized",
            Message::PanelResizeEnded => "panel-resize-ended",
            Message::CleanTerminal => "clean-terminal",
            Message::ShowMessage { .. } => "message",
            Message::HideMessage { .. } => "hide-message",
            Message::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Message::UpdateFiles.event_name(), "update-files");
        assert_eq!(
            Message::SaveFilename {
                filename: "a.py".into()
            }
            .event_name(),
            "save-filename"
        );
        assert_eq!(
            Message::ShowMessage {
                text: "x".into(),
                timeout: None
            }
            .event_name(),
            "message"
        );
    }

    #[test]
    fn test_transfer_texts() {
        assert_eq!(
            TransferDirection::Upload.progress_text(),
            "Uploading file... Please wait"
        );
        assert_eq!(TransferDirection::Download.done_text(), "File downloaded!");
    }
}

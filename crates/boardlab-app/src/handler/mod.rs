//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `connection`: Port dialog and connection lifecycle
//! - `execution`: Run / stop / reset pass-through
//! - `files`: Listing refresh, selection, save, remove, rename, transfers
//! - `panels`: Terminal/files panel toggles and divider drag
//! - `notification`: Transient message show/hide

pub(crate) mod connection;
pub(crate) mod execution;
pub(crate) mod files;
pub(crate) mod notification;
pub(crate) mod panels;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use crate::message::{Message, TransferDirection};
use boardlab_core::{DeviceKind, PanelHeight};

// Re-export main entry point
pub use update::update;

/// Where a single-file operation lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTarget {
    /// Absolute board path
    Serial { path: String },
    /// File `filename` inside directory `dir`
    Disk { dir: PathBuf, filename: String },
}

/// Rename on one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameTarget {
    Serial { from: String, to: String },
    Disk { dir: PathBuf, from: String, to: String },
}

/// Effects the runner performs after update
///
/// Capability calls never happen inside `update`; they are described here
/// and executed by `actions::handle_action`.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Several effects from one transition, dispatched in order
    Batch(Vec<UpdateAction>),

    /// Enumerate serial ports; `open_dialog` is carried back in `PortsLoaded`
    LoadPorts { open_dialog: bool },

    /// Open the transport, stop execution, report `DeviceConnected`
    ConnectDevice { path: String },

    /// Pipe terminal keystrokes to the board's eval entry point
    BindTerminalInput,

    /// Forward device output to the terminal and device loss to `Disconnect`
    SubscribeDevice,

    /// Drop the device subscription and close the transport
    ReleaseDevice,

    /// Submit the current editor text as a program
    RunProgram,

    StopProgram,

    /// Reset, then refresh listings
    ResetDevice,

    /// List the board folder (stopping execution first) and/or the disk folder
    RefreshListings {
        serial: Option<String>,
        disk: Option<PathBuf>,
    },

    /// Load a file into the editor
    LoadFile {
        device: DeviceKind,
        filename: String,
        target: FileTarget,
    },

    /// Write the current editor text, then process `then`
    SaveFile { target: FileTarget, then: Message },

    /// Delete, then refresh listings
    RemoveFile { target: FileTarget },

    /// Rename, then process `then`
    RenameFile { target: RenameTarget, then: Message },

    /// Show the folder picker
    OpenFolder,

    /// Copy `filename` between the disk root and the board
    Transfer {
        direction: TransferDirection,
        disk_root: PathBuf,
        filename: String,
    },

    /// Replace the editor text
    SetEditorText(String),

    /// Re-apply editor layout above a panel of the given height
    ResizeEditor { panel: Option<PanelHeight> },

    ClearTerminal,

    /// Install the one-shot pointer listener for a divider drag
    TrackPanelResize,

    /// Replace the pending hide timer with one for `revision`
    ScheduleMessageHide { revision: u64, after: Duration },
}

impl UpdateAction {
    /// Combine optional effects into at most one action
    pub fn batch(actions: Vec<UpdateAction>) -> Option<UpdateAction> {
        let mut actions = actions;
        match actions.len() {
            0 => None,
            1 => actions.pop(),
            _ => Some(UpdateAction::Batch(actions)),
        }
    }
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the runner to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Collapse a list of effects; empty means no action
    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            action: UpdateAction::batch(actions),
        }
    }

    pub fn with_message(mut self, msg: Message) -> Self {
        self.message = Some(msg);
        self
    }
}

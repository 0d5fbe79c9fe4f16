//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Capability calls run on spawned tasks so the dispatcher never waits on
//! the board or the disk. Each completion re-enters as a [`Message`].

mod spawn;

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::handler::UpdateAction;
use crate::message::Message;
use boardlab_bridge::{DiskStore, EditorSurface, PointerSurface, SerialDevice, TerminalSurface};

/// Capability implementations supplied by the front-end
pub struct Capabilities<S, D> {
    pub serial: Arc<S>,
    pub disk: Arc<D>,
    pub editor: Arc<dyn EditorSurface>,
    pub terminal: Arc<dyn TerminalSurface>,
    pub pointer: Arc<dyn PointerSurface>,
}

// Manual impl: no `S: Clone` or `D: Clone` bound
impl<S, D> Clone for Capabilities<S, D> {
    fn clone(&self) -> Self {
        Self {
            serial: self.serial.clone(),
            disk: self.disk.clone(),
            editor: self.editor.clone(),
            terminal: self.terminal.clone(),
            pointer: self.pointer.clone(),
        }
    }
}

impl<S, D> fmt::Debug for Capabilities<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("editor", &self.editor)
            .field("terminal", &self.terminal)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}

/// Long-lived tasks, at most one of each kind
#[derive(Debug, Default)]
pub struct BackgroundTasks {
    /// Device output to terminal, device loss to `Disconnect`
    device_events: Option<JoinHandle<()>>,
    /// Terminal keystrokes to `eval`; bound once per process
    terminal_input: Option<JoinHandle<()>>,
    /// Pending notification hide
    message_timer: Option<JoinHandle<()>>,
    /// Divider drag; owns the pointer subscription
    panel_resize: Option<JoinHandle<()>>,
}

impl BackgroundTasks {
    fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    fn release(slot: &mut Option<JoinHandle<()>>) {
        if let Some(task) = slot.take() {
            task.abort();
        }
    }

    pub fn abort_all(&mut self) {
        Self::release(&mut self.device_events);
        Self::release(&mut self.terminal_input);
        Self::release(&mut self.message_timer);
        Self::release(&mut self.panel_resize);
    }
}

/// Execute an action, spawning tasks for anything that awaits a capability
pub fn handle_action<S, D>(
    action: UpdateAction,
    msg_tx: &mpsc::Sender<Message>,
    caps: &Capabilities<S, D>,
    tasks: &mut BackgroundTasks,
) where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    match action {
        UpdateAction::Batch(actions) => {
            for action in actions {
                handle_action(action, msg_tx, caps, tasks);
            }
        }

        UpdateAction::LoadPorts { open_dialog } => {
            spawn::spawn_load_ports(caps.serial.clone(), open_dialog, msg_tx.clone());
        }

        UpdateAction::ConnectDevice { path } => {
            spawn::spawn_connect(caps.serial.clone(), path, msg_tx.clone());
        }

        UpdateAction::BindTerminalInput => {
            let handle = spawn::spawn_terminal_input(
                caps.serial.clone(),
                caps.terminal.clone(),
                caps.terminal.subscribe_input(),
            );
            BackgroundTasks::replace(&mut tasks.terminal_input, handle);
        }

        UpdateAction::SubscribeDevice => {
            let handle = spawn::spawn_device_events(
                caps.serial.subscribe(),
                caps.terminal.clone(),
                msg_tx.clone(),
            );
            BackgroundTasks::replace(&mut tasks.device_events, handle);
        }

        UpdateAction::ReleaseDevice => {
            BackgroundTasks::release(&mut tasks.device_events);
            spawn::spawn_disconnect(caps.serial.clone());
        }

        UpdateAction::RunProgram => {
            // Editor text is captured at dispatch
            spawn::spawn_run(caps.serial.clone(), caps.editor.text());
        }

        UpdateAction::StopProgram => spawn::spawn_stop(caps.serial.clone()),

        UpdateAction::ResetDevice => {
            spawn::spawn_reset(caps.serial.clone(), msg_tx.clone());
        }

        UpdateAction::RefreshListings { serial, disk } => {
            if let Some(path) = serial {
                spawn::spawn_list_serial(caps.serial.clone(), path, msg_tx.clone());
            }
            if let Some(dir) = disk {
                spawn::spawn_list_disk(caps.disk.clone(), dir, msg_tx.clone());
            }
        }

        UpdateAction::LoadFile {
            device,
            filename,
            target,
        } => {
            spawn::spawn_load_file(caps.clone(), device, filename, target, msg_tx.clone());
        }

        UpdateAction::SaveFile { target, then } => {
            spawn::spawn_save_file(caps.clone(), target, caps.editor.text(), then, msg_tx.clone());
        }

        UpdateAction::RemoveFile { target } => {
            spawn::spawn_remove_file(caps.clone(), target, msg_tx.clone());
        }

        UpdateAction::RenameFile { target, then } => {
            spawn::spawn_rename_file(caps.clone(), target, then, msg_tx.clone());
        }

        UpdateAction::OpenFolder => {
            spawn::spawn_open_folder(caps.disk.clone(), msg_tx.clone());
        }

        UpdateAction::Transfer {
            direction,
            disk_root,
            filename,
        } => {
            spawn::spawn_transfer(
                caps.serial.clone(),
                direction,
                disk_root,
                filename,
                msg_tx.clone(),
            );
        }

        UpdateAction::SetEditorText(text) => caps.editor.set_text(&text),

        UpdateAction::ResizeEditor { panel } => caps.editor.resize_to_fit(panel),

        UpdateAction::ClearTerminal => caps.terminal.clear(),

        UpdateAction::TrackPanelResize => {
            let handle =
                spawn::spawn_panel_resize(caps.pointer.subscribe_pointer(), msg_tx.clone());
            BackgroundTasks::replace(&mut tasks.panel_resize, handle);
        }

        UpdateAction::ScheduleMessageHide { revision, after } => {
            let handle = spawn::spawn_message_timer(revision, after, msg_tx.clone());
            BackgroundTasks::replace(&mut tasks.message_timer, handle);
        }
    }
}

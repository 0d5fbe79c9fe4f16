//! Background tasks for capability calls
//!
//! Failures are logged and either dropped or reported as a message; no task
//! panics and none retries.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Capabilities;
use crate::handler::{FileTarget, RenameTarget};
use crate::message::{Message, TransferDirection};
use boardlab_bridge::{
    DeviceEvent, DeviceEventStream, DiskStore, PointerEvent, PointerSubscription, SerialDevice,
    TerminalInput, TerminalSurface,
};
use boardlab_core::{strip_control_bytes, DeviceKind, Error, PanelHeight};

pub(super) fn spawn_load_ports<S>(serial: Arc<S>, open_dialog: bool, msg_tx: mpsc::Sender<Message>)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        match serial.list_ports().await {
            Ok(ports) => {
                debug!("Found {} serial ports", ports.len());
                let _ = msg_tx.send(Message::PortsLoaded { ports, open_dialog }).await;
            }
            Err(e) => warn!("Failed to list serial ports: {}", e),
        }
    });
}

/// Open the transport, then stop execution before anything attaches
pub(super) fn spawn_connect<S>(serial: Arc<S>, path: String, msg_tx: mpsc::Sender<Message>)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = serial.connect(&path).await {
            let _ = msg_tx
                .send(Message::ConnectFailed {
                    path,
                    error: e.to_string(),
                })
                .await;
            return;
        }
        info!("Connected to {}", path);

        if let Err(e) = serial.stop().await {
            warn!("Failed to stop execution after connect: {}", e);
        }
        let _ = msg_tx.send(Message::DeviceConnected { path }).await;
    });
}

pub(super) fn spawn_disconnect<S>(serial: Arc<S>)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = serial.disconnect().await {
            warn!("Failed to close serial transport: {}", e);
        }
    });
}

/// Terminal keystrokes go to the board's eval entry point
pub(super) fn spawn_terminal_input<S>(
    serial: Arc<S>,
    terminal: Arc<dyn TerminalSurface>,
    mut input: TerminalInput,
) -> JoinHandle<()>
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        while let Some(bytes) = input.recv().await {
            if let Err(e) = serial.eval(&bytes).await {
                warn!("Failed to send terminal input: {}", e);
            }
            terminal.scroll_to_bottom();
        }
        debug!("Terminal input closed");
    })
}

pub(super) fn spawn_device_events(
    mut events: DeviceEventStream,
    terminal: Arc<dyn TerminalSurface>,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Some(DeviceEvent::Data(bytes)) => {
                    terminal.write(&bytes);
                    terminal.scroll_to_bottom();
                }
                Some(DeviceEvent::Disconnected) => {
                    info!("Device disconnected");
                    break;
                }
                None => {
                    info!("Device event stream closed");
                    break;
                }
            }
        }
        // Aborted on release, so reaching here means the transport is gone
        let _ = msg_tx.send(Message::Disconnect).await;
    })
}

pub(super) fn spawn_run<S>(serial: Arc<S>, code: String)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = serial.run(&code).await {
            warn!("Failed to run program: {}", e);
        }
    });
}

pub(super) fn spawn_stop<S>(serial: Arc<S>)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = serial.stop().await {
            warn!("Failed to stop program: {}", e);
        }
    });
}

pub(super) fn spawn_reset<S>(serial: Arc<S>, msg_tx: mpsc::Sender<Message>)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = serial.reset().await {
            warn!("Failed to reset device: {}", e);
        }
        let _ = msg_tx.send(Message::UpdateFiles).await;
    });
}

/// The board cannot list while running user code, so stop first. A failed
/// stop skips the listing and keeps the previous one.
pub(super) fn spawn_list_serial<S>(serial: Arc<S>, path: String, msg_tx: mpsc::Sender<Message>)
where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = serial.stop().await {
            warn!("Skipping board listing, stop failed: {}", e);
            return;
        }
        match serial.list_files(&path).await {
            Ok(files) => {
                let _ = msg_tx.send(Message::SerialFilesListed { files }).await;
            }
            Err(e) => warn!("{}", Error::listing(DeviceKind::Serial, e.to_string())),
        }
    });
}

pub(super) fn spawn_list_disk<D>(disk: Arc<D>, dir: PathBuf, msg_tx: mpsc::Sender<Message>)
where
    D: DiskStore + Sync + 'static,
{
    tokio::spawn(async move {
        match disk.list_files(&dir).await {
            Ok(files) => {
                let _ = msg_tx.send(Message::DiskFilesListed { files }).await;
            }
            Err(e) => warn!("{}", Error::listing(DeviceKind::Disk, e.to_string())),
        }
    });
}

pub(super) fn spawn_load_file<S, D>(
    caps: Capabilities<S, D>,
    device: DeviceKind,
    filename: String,
    target: FileTarget,
    msg_tx: mpsc::Sender<Message>,
) where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    tokio::spawn(async move {
        let loaded = match &target {
            FileTarget::Serial { path } => caps
                .serial
                .load_file(path)
                .await
                .map(|content| strip_control_bytes(&content)),
            FileTarget::Disk { dir, filename } => caps.disk.load_file(dir, filename).await,
        };
        match loaded {
            Ok(content) => {
                caps.editor.set_text(&content);
                let _ = msg_tx.send(Message::FileLoaded { device, filename }).await;
            }
            Err(e) => warn!("Failed to load {:?}: {}", target, e),
        }
    });
}

/// The follow-up is sent whether or not the write succeeded
pub(super) fn spawn_save_file<S, D>(
    caps: Capabilities<S, D>,
    target: FileTarget,
    contents: String,
    then: Message,
    msg_tx: mpsc::Sender<Message>,
) where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    tokio::spawn(async move {
        let result = match &target {
            FileTarget::Serial { path } => caps.serial.save_file(path, &contents).await,
            FileTarget::Disk { dir, filename } => {
                caps.disk.save_file(dir, filename, &contents).await
            }
        };
        if let Err(e) = result {
            warn!("Failed to save {:?}: {}", target, e);
        }
        let _ = msg_tx.send(then).await;
    });
}

pub(super) fn spawn_remove_file<S, D>(
    caps: Capabilities<S, D>,
    target: FileTarget,
    msg_tx: mpsc::Sender<Message>,
) where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    tokio::spawn(async move {
        let result = match &target {
            FileTarget::Serial { path } => caps.serial.remove_file(path).await,
            FileTarget::Disk { dir, filename } => caps.disk.remove_file(dir, filename).await,
        };
        if let Err(e) = result {
            warn!("Failed to remove {:?}: {}", target, e);
        }
        let _ = msg_tx.send(Message::UpdateFiles).await;
    });
}

pub(super) fn spawn_rename_file<S, D>(
    caps: Capabilities<S, D>,
    target: RenameTarget,
    then: Message,
    msg_tx: mpsc::Sender<Message>,
) where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    tokio::spawn(async move {
        let result = match &target {
            RenameTarget::Serial { from, to } => caps.serial.rename_file(from, to).await,
            RenameTarget::Disk { dir, from, to } => caps.disk.rename_file(dir, from, to).await,
        };
        if let Err(e) = result {
            warn!("Failed to rename {:?}: {}", target, e);
        }
        let _ = msg_tx.send(then).await;
    });
}

pub(super) fn spawn_open_folder<D>(disk: Arc<D>, msg_tx: mpsc::Sender<Message>)
where
    D: DiskStore + Sync + 'static,
{
    tokio::spawn(async move {
        match disk.open_folder().await {
            Ok(Some(folder)) => {
                info!("Opened folder {:?}", folder.root);
                let _ = msg_tx.send(Message::FolderOpened { folder }).await;
            }
            Ok(None) => debug!("Folder picker dismissed"),
            Err(e) => warn!("Failed to open folder: {}", e),
        }
    });
}

pub(super) fn spawn_transfer<S>(
    serial: Arc<S>,
    direction: TransferDirection,
    disk_root: PathBuf,
    filename: String,
    msg_tx: mpsc::Sender<Message>,
) where
    S: SerialDevice + Sync + 'static,
{
    tokio::spawn(async move {
        let result = match direction {
            TransferDirection::Upload => serial.upload_file(&disk_root, &filename).await,
            TransferDirection::Download => serial.download_file(&disk_root, &filename).await,
        };
        let msg = match result {
            Ok(()) => Message::TransferCompleted { direction },
            Err(e) => Message::TransferFailed {
                direction,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    });
}

/// Height tracks the pointer's distance to the viewport bottom until
/// release. The subscription is dropped with the task.
pub(super) fn spawn_panel_resize(
    mut pointer: PointerSubscription,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = pointer.recv().await {
            match event {
                PointerEvent::Moved { y, viewport_height } => {
                    let height = PanelHeight::Px(viewport_height.saturating_sub(y));
                    if msg_tx.send(Message::PanelResized { height }).await.is_err() {
                        return;
                    }
                }
                PointerEvent::Released => break,
            }
        }
        drop(pointer);
        let _ = msg_tx.send(Message::PanelResizeEnded).await;
    })
}

pub(super) fn spawn_message_timer(
    revision: u64,
    after: Duration,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        let _ = msg_tx.send(Message::HideMessage { revision }).await;
    })
}

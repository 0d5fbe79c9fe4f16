//! Engine - single-consumer dispatcher for the Board Lab state machine
//!
//! The Engine owns the application state, the message channel, the
//! capability bundle and the long-lived background tasks. The front-end
//! feeds it messages and repaints on [`EngineEvent::Render`].

use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::actions::{BackgroundTasks, Capabilities};
use crate::config::{self, Settings};
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::state::{AppState, ConnectionState};
use boardlab_bridge::{DiskStore, SerialDevice};
use boardlab_core::DeviceKind;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    connection: ConnectionState,
    message_revision: u64,
    message_visible: bool,
    serial_files: Vec<String>,
    disk_files: Vec<String>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            connection: state.connection.clone(),
            message_revision: state.message.revision,
            message_visible: state.message.visible,
            serial_files: state.serial_files.clone(),
            disk_files: state.disk_files.clone(),
        }
    }
}

/// Orchestration engine for Board Lab.
pub struct Engine<S, D> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the message channel. Cloned into every task.
    msg_tx: mpsc::Sender<Message>,

    /// Receiver half; only the Engine consumes it
    msg_rx: mpsc::Receiver<Message>,

    caps: Capabilities<S, D>,

    tasks: BackgroundTasks,

    /// Event broadcaster for the presentation layer
    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S, D> Engine<S, D>
where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    /// Create an Engine with explicit settings
    pub fn new(caps: Capabilities<S, D>, settings: Settings) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(256);
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state: AppState::with_settings(settings),
            msg_tx,
            msg_rx,
            caps,
            tasks: BackgroundTasks::default(),
            event_tx,
        }
    }

    /// Create an Engine with settings from the user's config directory
    pub fn with_user_settings(caps: Capabilities<S, D>) -> Self {
        Self::new(caps, config::load_user_settings())
    }

    /// Subscribe to events. Lagging subscribers lose the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Sender for UI intents and other external input
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Run one handler chain, then emit change events and `Render`
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.caps,
            &mut self.tasks,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
        self.emit(EngineEvent::Render);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Dispatcher loop; returns after `Message::Quit`
    pub async fn run(&mut self) {
        info!("Engine started");
        while !self.should_quit() {
            let Some(msg) = self.msg_rx.recv().await else {
                break;
            };
            self.process_message(msg);
        }
        info!("Engine stopped");
    }

    /// Stop background tasks and release the device
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);
        self.tasks.abort_all();

        if !self.state.connection.is_disconnected() {
            if let Err(e) = self.caps.serial.disconnect().await {
                warn!("Failed to close serial transport on shutdown: {}", e);
            }
        }
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.connection != post.connection {
            self.emit(EngineEvent::ConnectionChanged {
                connection: post.connection.clone(),
            });
        }

        if pre.message_revision != post.message_revision && post.message_visible {
            self.emit(EngineEvent::NotificationShown {
                text: self.state.message.text.clone(),
            });
        } else if pre.message_visible && !post.message_visible {
            self.emit(EngineEvent::NotificationHidden);
        }

        if pre.serial_files != post.serial_files {
            self.emit(EngineEvent::ListingsUpdated {
                device: DeviceKind::Serial,
            });
        }
        if pre.disk_files != post.disk_files {
            self.emit(EngineEvent::ListingsUpdated {
                device: DeviceKind::Disk,
            });
        }
    }

    /// No subscribers is not an error
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

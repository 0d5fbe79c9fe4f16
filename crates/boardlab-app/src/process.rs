//! Message processing
//!
//! Runs one handler chain to completion: update, dispatch the resulting
//! action, then the follow-up message, until the chain ends.

use tokio::sync::mpsc;
use tracing::debug;

use crate::actions::{handle_action, BackgroundTasks, Capabilities};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;
use boardlab_bridge::{DiskStore, SerialDevice};

/// Process a message through the TEA update function
pub fn process_message<S, D>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    caps: &Capabilities<S, D>,
    tasks: &mut BackgroundTasks,
) where
    S: SerialDevice + Sync + 'static,
    D: DiskStore + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        debug!("{}", m.event_name());
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx, caps, tasks);
        }

        msg = result.message;
    }
}

//! Transient notification handlers

use std::time::Duration;

use chrono::Local;

use super::{UpdateAction, UpdateResult};
use crate::state::AppState;

/// Make `text` visible. Returns the hide-timer effect when `timeout` is
/// positive.
pub(crate) fn show(
    state: &mut AppState,
    text: impl Into<String>,
    timeout: Option<Duration>,
) -> Option<UpdateAction> {
    let message = &mut state.message;
    message.text = text.into();
    message.visible = true;
    message.revision = message.revision.wrapping_add(1);
    message.shown_at = Some(Local::now());

    timeout
        .filter(|after| !after.is_zero())
        .map(|after| UpdateAction::ScheduleMessageHide {
            revision: message.revision,
            after,
        })
}

pub(crate) fn handle_show_message(
    state: &mut AppState,
    text: String,
    timeout: Option<Duration>,
) -> UpdateResult {
    UpdateResult {
        message: None,
        action: show(state, text, timeout),
    }
}

/// A timer only hides the notification it was scheduled for
pub(crate) fn handle_hide_message(state: &mut AppState, revision: u64) -> UpdateResult {
    if state.message.revision == revision {
        state.message.visible = false;
    } else {
        tracing::trace!(
            "Ignoring stale hide timer {} (current {})",
            revision,
            state.message.revision
        );
    }
    UpdateResult::none()
}

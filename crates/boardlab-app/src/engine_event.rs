//! Domain events emitted by the Engine for the presentation layer
//!
//! Events are broadcast after each handler chain via `Engine::subscribe()`.
//! `Render` closes every chain and is the only event a front-end must
//! handle; the others describe what changed.

use crate::state::ConnectionState;
use boardlab_core::DeviceKind;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// State may have changed; repaint
    Render,

    /// The connection moved to a new state
    ConnectionChanged { connection: ConnectionState },

    /// A notification became visible
    NotificationShown { text: String },

    /// The visible notification was hidden by its timer
    NotificationHidden,

    /// A file listing was replaced with different contents
    ListingsUpdated { device: DeviceKind },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Get a string label for the event type (for logging/filtering)
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::ConnectionChanged { .. } => "connection_changed",
            Self::NotificationShown { .. } => "notification_shown",
            Self::NotificationHidden => "notification_hidden",
            Self::ListingsUpdated { .. } => "listings_updated",
            Self::Shutdown => "shutdown",
        }
    }
}

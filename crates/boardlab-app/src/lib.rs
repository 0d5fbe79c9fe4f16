//! boardlab-app - Application state and orchestration for Board Lab
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: a pure `handler::update` over [`AppState`], effects described
//! as [`UpdateAction`]s and executed by the action runner, and the [`Engine`]
//! that serializes every message through one channel. Configuration loading
//! lives in [`config`].

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod process;
pub mod state;

// Re-export primary types
pub use actions::{BackgroundTasks, Capabilities};
pub use config::Settings;
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{FileTarget, RenameTarget, UpdateAction, UpdateResult};
pub use message::{Message, TransferDirection};
pub use state::{AppState, ConnectionState, Notification, PanelState};

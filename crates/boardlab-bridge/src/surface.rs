//! Panel widget capabilities
//!
//! The editor, terminal and pointer are owned by the presentation layer. They
//! are synchronous: every call is a direct widget mutation.

use std::fmt;

use tokio::sync::mpsc;

use boardlab_core::PanelHeight;

/// Text-editing widget
pub trait EditorSurface: Send + Sync + fmt::Debug {
    /// Full current text
    fn text(&self) -> String;

    /// Replace the full text
    fn set_text(&self, text: &str);

    /// Lay the editor out above a panel of `panel` height, or full height
    /// when no panel is open.
    fn resize_to_fit(&self, panel: Option<PanelHeight>);
}

/// Keystrokes typed into the terminal
pub type TerminalInput = mpsc::UnboundedReceiver<Vec<u8>>;

/// Terminal-emulator widget
pub trait TerminalSurface: Send + Sync + fmt::Debug {
    fn write(&self, bytes: &[u8]);

    fn scroll_to_bottom(&self);

    fn clear(&self);

    /// Start receiving typed input. Every call creates a new binding.
    fn subscribe_input(&self) -> TerminalInput;
}

/// Pointer activity while dragging the panel divider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Moved { y: u32, viewport_height: u32 },
    Released,
}

/// Window-wide pointer listener. Dropping it removes the listener.
pub type PointerSubscription = mpsc::UnboundedReceiver<PointerEvent>;

/// Source of global pointer events
pub trait PointerSurface: Send + Sync + fmt::Debug {
    fn subscribe_pointer(&self) -> PointerSubscription;
}

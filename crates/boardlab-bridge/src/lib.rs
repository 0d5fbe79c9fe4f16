//! # boardlab-bridge - Capability Interfaces
//!
//! Contracts the application core consumes. Concrete implementations (the
//! serial transport, OS file access, the editor and terminal widgets) belong
//! to the front-end; the core depends on them only through these traits.
//!
//! ## Public API
//!
//! ### Stores (`serial`, `disk`)
//! - [`SerialDevice`] - Board connection, program execution, board file system
//! - [`DiskStore`] - The folder opened on the local machine
//! - [`DeviceEvent`] - Output bytes and disconnect notifications from the board
//!
//! ### Panels (`surface`)
//! - [`EditorSurface`] - Get/set editor text, re-apply layout
//! - [`TerminalSurface`] - Write output, scroll, clear, input binding
//! - [`PointerSurface`] - Window-wide pointer listener for panel resizing
//!
//! Async traits are generated with `trait_variant`: implement the `Send`
//! variant (`SerialDevice`, `DiskStore`); `Local*` variants exist for
//! single-threaded front-ends.

pub mod disk;
pub mod serial;
pub mod surface;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use disk::{DiskStore, LocalDiskStore, OpenedFolder};
pub use serial::{DeviceEvent, DeviceEventStream, LocalSerialDevice, SerialDevice};
pub use surface::{
    EditorSurface, PointerEvent, PointerSubscription, PointerSurface, TerminalInput,
    TerminalSurface,
};

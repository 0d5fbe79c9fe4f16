//! # boardlab-core - Core Domain Types
//!
//! Foundation crate for Board Lab. Provides domain types, file-name rules,
//! error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`DeviceKind`] - Which store a file operation targets (disk or serial)
//! - [`NavigationFolder`] - Root or `/lib`, shared by both listings
//! - [`PanelHeight`] - CSS-like length of the bottom panel
//! - [`SerialPort`] - An available serial port
//!
//! ### File Rules (`files`)
//! - [`filter_serial_listing()`] - Drop dot-files and extensionless entries
//! - [`strip_control_bytes()`] - Remove bytes that abort execution on the board
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum for transport, listing, disk and config failures
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use boardlab_core::prelude::*;
//! ```

pub mod error;
pub mod files;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all Board Lab crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use files::{filter_serial_listing, strip_control_bytes, EXECUTION_ABORT_BYTE};
pub use types::{DeviceKind, NavigationFolder, PanelHeight, SerialPort};

//! Serial device capability
//!
//! The board speaks a half-duplex command protocol over the serial link. The
//! wire protocol itself lives in the front-end's transport; the core only
//! needs the operations below.

use std::path::Path;

use tokio::sync::mpsc;

use boardlab_core::prelude::*;
use boardlab_core::SerialPort;

/// Asynchronous notifications pushed by a connected board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Raw output bytes (REPL echo, program output)
    Data(Vec<u8>),
    /// The transport went away
    Disconnected,
}

/// Receiving half of a device subscription. Dropping it unsubscribes.
pub type DeviceEventStream = mpsc::UnboundedReceiver<DeviceEvent>;

/// Serial device operations
///
/// Board paths are absolute (`/main.py`, `/lib/util.py`).
#[trait_variant::make(SerialDevice: Send)]
pub trait LocalSerialDevice {
    /// Enumerate serial ports the board may be attached to
    async fn list_ports(&self) -> Result<Vec<SerialPort>>;

    /// Open the transport. Resolves once the port is usable.
    async fn connect(&self, path: &str) -> Result<()>;

    /// Close the transport
    async fn disconnect(&self) -> Result<()>;

    /// Submit `code` as a program to execute
    async fn run(&self, code: &str) -> Result<()>;

    /// Interrupt any running program
    async fn stop(&self) -> Result<()>;

    /// Soft-reset the board
    async fn reset(&self) -> Result<()>;

    /// Forward raw terminal input to the REPL
    async fn eval(&self, input: &[u8]) -> Result<()>;

    /// Raw directory listing, unfiltered
    async fn list_files(&self, path: &str) -> Result<Vec<String>>;

    async fn load_file(&self, path: &str) -> Result<String>;

    async fn save_file(&self, path: &str, contents: &str) -> Result<()>;

    async fn remove_file(&self, path: &str) -> Result<()>;

    async fn rename_file(&self, from: &str, to: &str) -> Result<()>;

    /// Copy `filename` from `disk_dir` onto the board
    async fn upload_file(&self, disk_dir: &Path, filename: &str) -> Result<()>;

    /// Copy `filename` from the board into `disk_dir`
    async fn download_file(&self, disk_dir: &Path, filename: &str) -> Result<()>;

    /// Subscribe to output bytes and the disconnect notification
    fn subscribe(&self) -> DeviceEventStream;
}

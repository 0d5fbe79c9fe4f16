//! Recording capability doubles for tests
//!
//! Every mock records the calls it receives so tests can assert on the
//! commands the core issued. Operations can be told to fail, or to block on a
//! [`Notify`] gate until the test releases them (used to exercise
//! interleavings between in-flight operations and new messages).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, Notify};

use boardlab_core::prelude::*;
use boardlab_core::{PanelHeight, SerialPort};

use crate::disk::{DiskStore, OpenedFolder};
use crate::serial::{DeviceEvent, DeviceEventStream, SerialDevice};
use crate::surface::{
    EditorSurface, PointerEvent, PointerSubscription, PointerSurface, TerminalInput,
    TerminalSurface,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─────────────────────────────────────────────────────────────────────────────
// Serial
// ─────────────────────────────────────────────────────────────────────────────

/// Serial operation kinds, for failure injection and gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialOp {
    ListPorts,
    Connect,
    Disconnect,
    Run,
    Stop,
    Reset,
    Eval,
    ListFiles,
    LoadFile,
    SaveFile,
    RemoveFile,
    RenameFile,
    Upload,
    Download,
}

/// A recorded serial call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialCall {
    ListPorts,
    Connect(String),
    Disconnect,
    Run(String),
    Stop,
    Reset,
    Eval(Vec<u8>),
    ListFiles(String),
    LoadFile(String),
    SaveFile { path: String, contents: String },
    RemoveFile(String),
    RenameFile { from: String, to: String },
    Upload { dir: PathBuf, filename: String },
    Download { dir: PathBuf, filename: String },
}

#[derive(Debug, Default)]
struct SerialInner {
    calls: Vec<SerialCall>,
    ports: Vec<SerialPort>,
    listing: Vec<String>,
    files: HashMap<String, String>,
    failing: HashSet<SerialOp>,
    gates: HashMap<SerialOp, Arc<Notify>>,
    subscribers: Vec<mpsc::UnboundedSender<DeviceEvent>>,
}

/// In-memory board
#[derive(Debug, Default)]
pub struct MockSerial {
    inner: Mutex<SerialInner>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ports(self, ports: &[&str]) -> Self {
        lock(&self.inner).ports = ports.iter().map(|p| SerialPort::new(*p)).collect();
        self
    }

    /// Raw listing returned by every `list_files` call
    pub fn with_listing(self, names: &[&str]) -> Self {
        lock(&self.inner).listing = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        lock(&self.inner)
            .files
            .insert(path.to_string(), contents.to_string());
        self
    }

    pub fn set_listing(&self, names: &[&str]) {
        lock(&self.inner).listing = names.iter().map(|n| n.to_string()).collect();
    }

    pub fn fail(&self, op: SerialOp) {
        lock(&self.inner).failing.insert(op);
    }

    pub fn recover(&self, op: SerialOp) {
        lock(&self.inner).failing.remove(&op);
    }

    /// Block `op` until the returned gate is notified
    pub fn gate(&self, op: SerialOp) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.inner).gates.insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<SerialCall> {
        lock(&self.inner).calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&SerialCall) -> bool) -> usize {
        lock(&self.inner).calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        lock(&self.inner).calls.clear();
    }

    /// Number of `subscribe` calls so far
    pub fn subscriptions(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    /// Subscriptions whose receiver is still alive
    pub fn live_subscriptions(&self) -> usize {
        lock(&self.inner)
            .subscribers
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Push an event to every live subscriber
    pub fn emit(&self, event: DeviceEvent) {
        for tx in lock(&self.inner).subscribers.iter() {
            let _ = tx.send(event.clone());
        }
    }

    /// Drop every sender, as a transport does when the link dies silently
    pub fn close_subscriptions(&self) {
        lock(&self.inner).subscribers.clear();
    }

    pub fn file(&self, path: &str) -> Option<String> {
        lock(&self.inner).files.get(path).cloned()
    }

    async fn enter(&self, call: SerialCall, op: SerialOp) -> Result<()> {
        let gate = {
            let mut inner = lock(&self.inner);
            inner.calls.push(call);
            inner.gates.remove(&op)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if lock(&self.inner).failing.contains(&op) {
            return Err(Error::transport(format!("{op:?} failed")));
        }
        Ok(())
    }
}

impl SerialDevice for MockSerial {
    async fn list_ports(&self) -> Result<Vec<SerialPort>> {
        self.enter(SerialCall::ListPorts, SerialOp::ListPorts).await?;
        Ok(lock(&self.inner).ports.clone())
    }

    async fn connect(&self, path: &str) -> Result<()> {
        self.enter(SerialCall::Connect(path.to_string()), SerialOp::Connect)
            .await
    }

    async fn disconnect(&self) -> Result<()> {
        self.enter(SerialCall::Disconnect, SerialOp::Disconnect)
            .await
    }

    async fn run(&self, code: &str) -> Result<()> {
        self.enter(SerialCall::Run(code.to_string()), SerialOp::Run)
            .await
    }

    async fn stop(&self) -> Result<()> {
        self.enter(SerialCall::Stop, SerialOp::Stop).await
    }

    async fn reset(&self) -> Result<()> {
        self.enter(SerialCall::Reset, SerialOp::Reset).await
    }

    async fn eval(&self, input: &[u8]) -> Result<()> {
        self.enter(SerialCall::Eval(input.to_vec()), SerialOp::Eval)
            .await
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        self.enter(SerialCall::ListFiles(path.to_string()), SerialOp::ListFiles)
            .await?;
        Ok(lock(&self.inner).listing.clone())
    }

    async fn load_file(&self, path: &str) -> Result<String> {
        self.enter(SerialCall::LoadFile(path.to_string()), SerialOp::LoadFile)
            .await?;
        Ok(lock(&self.inner).files.get(path).cloned().unwrap_or_default())
    }

    async fn save_file(&self, path: &str, contents: &str) -> Result<()> {
        let call = SerialCall::SaveFile {
            path: path.to_string(),
            contents: contents.to_string(),
        };
        self.enter(call, SerialOp::SaveFile).await?;
        lock(&self.inner)
            .files
            .insert(path.to_string(), contents.to_string());
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        self.enter(SerialCall::RemoveFile(path.to_string()), SerialOp::RemoveFile)
            .await?;
        lock(&self.inner).files.remove(path);
        Ok(())
    }

    async fn rename_file(&self, from: &str, to: &str) -> Result<()> {
        let call = SerialCall::RenameFile {
            from: from.to_string(),
            to: to.to_string(),
        };
        self.enter(call, SerialOp::RenameFile).await?;
        let mut inner = lock(&self.inner);
        if let Some(contents) = inner.files.remove(from) {
            inner.files.insert(to.to_string(), contents);
        }
        Ok(())
    }

    async fn upload_file(&self, disk_dir: &Path, filename: &str) -> Result<()> {
        let call = SerialCall::Upload {
            dir: disk_dir.to_path_buf(),
            filename: filename.to_string(),
        };
        self.enter(call, SerialOp::Upload).await
    }

    async fn download_file(&self, disk_dir: &Path, filename: &str) -> Result<()> {
        let call = SerialCall::Download {
            dir: disk_dir.to_path_buf(),
            filename: filename.to_string(),
        };
        self.enter(call, SerialOp::Download).await
    }

    fn subscribe(&self) -> DeviceEventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.inner).subscribers.push(tx);
        rx
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Disk
// ─────────────────────────────────────────────────────────────────────────────

/// Disk operation kinds, for failure injection and gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiskOp {
    OpenFolder,
    ListFiles,
    LoadFile,
    SaveFile,
    RemoveFile,
    RenameFile,
}

/// A recorded disk call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskCall {
    OpenFolder,
    ListFiles(PathBuf),
    LoadFile {
        dir: PathBuf,
        filename: String,
    },
    SaveFile {
        dir: PathBuf,
        filename: String,
        contents: String,
    },
    RemoveFile {
        dir: PathBuf,
        filename: String,
    },
    RenameFile {
        dir: PathBuf,
        from: String,
        to: String,
    },
}

#[derive(Debug, Default)]
struct DiskInner {
    calls: Vec<DiskCall>,
    folder: Option<OpenedFolder>,
    listing: Vec<String>,
    files: HashMap<String, String>,
    failing: HashSet<DiskOp>,
    gates: HashMap<DiskOp, Arc<Notify>>,
}

/// In-memory folder
#[derive(Debug, Default)]
pub struct MockDisk {
    inner: Mutex<DiskInner>,
}

impl MockDisk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder returned by the picker
    pub fn with_folder(self, root: impl Into<PathBuf>, files: &[&str]) -> Self {
        lock(&self.inner).folder = Some(OpenedFolder {
            root: root.into(),
            files: files.iter().map(|f| f.to_string()).collect(),
        });
        self
    }

    /// Listing returned by every `list_files` call
    pub fn with_listing(self, names: &[&str]) -> Self {
        lock(&self.inner).listing = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_file(self, filename: &str, contents: &str) -> Self {
        lock(&self.inner)
            .files
            .insert(filename.to_string(), contents.to_string());
        self
    }

    pub fn set_listing(&self, names: &[&str]) {
        lock(&self.inner).listing = names.iter().map(|n| n.to_string()).collect();
    }

    pub fn fail(&self, op: DiskOp) {
        lock(&self.inner).failing.insert(op);
    }

    pub fn recover(&self, op: DiskOp) {
        lock(&self.inner).failing.remove(&op);
    }

    /// Block `op` until the returned gate is notified
    pub fn gate(&self, op: DiskOp) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.inner).gates.insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<DiskCall> {
        lock(&self.inner).calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&DiskCall) -> bool) -> usize {
        lock(&self.inner).calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        lock(&self.inner).calls.clear();
    }

    pub fn file(&self, filename: &str) -> Option<String> {
        lock(&self.inner).files.get(filename).cloned()
    }

    async fn enter(&self, call: DiskCall, op: DiskOp) -> Result<()> {
        let gate = {
            let mut inner = lock(&self.inner);
            inner.calls.push(call);
            inner.gates.remove(&op)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if lock(&self.inner).failing.contains(&op) {
            return Err(Error::disk(format!("{op:?} failed")));
        }
        Ok(())
    }
}

impl DiskStore for MockDisk {
    async fn open_folder(&self) -> Result<Option<OpenedFolder>> {
        self.enter(DiskCall::OpenFolder, DiskOp::OpenFolder).await?;
        Ok(lock(&self.inner).folder.clone())
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
        self.enter(DiskCall::ListFiles(dir.to_path_buf()), DiskOp::ListFiles)
            .await?;
        Ok(lock(&self.inner).listing.clone())
    }

    async fn load_file(&self, dir: &Path, filename: &str) -> Result<String> {
        let call = DiskCall::LoadFile {
            dir: dir.to_path_buf(),
            filename: filename.to_string(),
        };
        self.enter(call, DiskOp::LoadFile).await?;
        Ok(lock(&self.inner)
            .files
            .get(filename)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_file(&self, dir: &Path, filename: &str, contents: &str) -> Result<()> {
        let call = DiskCall::SaveFile {
            dir: dir.to_path_buf(),
            filename: filename.to_string(),
            contents: contents.to_string(),
        };
        self.enter(call, DiskOp::SaveFile).await?;
        lock(&self.inner)
            .files
            .insert(filename.to_string(), contents.to_string());
        Ok(())
    }

    async fn remove_file(&self, dir: &Path, filename: &str) -> Result<()> {
        let call = DiskCall::RemoveFile {
            dir: dir.to_path_buf(),
            filename: filename.to_string(),
        };
        self.enter(call, DiskOp::RemoveFile).await?;
        lock(&self.inner).files.remove(filename);
        Ok(())
    }

    async fn rename_file(&self, dir: &Path, from: &str, to: &str) -> Result<()> {
        let call = DiskCall::RenameFile {
            dir: dir.to_path_buf(),
            from: from.to_string(),
            to: to.to_string(),
        };
        self.enter(call, DiskOp::RenameFile).await?;
        let mut inner = lock(&self.inner);
        if let Some(contents) = inner.files.remove(from) {
            inner.files.insert(to.to_string(), contents);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Panels
// ─────────────────────────────────────────────────────────────────────────────

/// Editor widget double
#[derive(Debug, Default)]
pub struct MockEditor {
    text: Mutex<String>,
    set_count: Mutex<usize>,
    layouts: Mutex<Vec<Option<PanelHeight>>>,
}

impl MockEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: &str) -> Self {
        *lock(&self.text) = text.to_string();
        self
    }

    /// Simulate the user typing into the editor
    pub fn type_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
    }

    pub fn set_count(&self) -> usize {
        *lock(&self.set_count)
    }

    /// Every layout applied through `resize_to_fit`
    pub fn layouts(&self) -> Vec<Option<PanelHeight>> {
        lock(&self.layouts).clone()
    }
}

impl EditorSurface for MockEditor {
    fn text(&self) -> String {
        lock(&self.text).clone()
    }

    fn set_text(&self, text: &str) {
        *lock(&self.text) = text.to_string();
        *lock(&self.set_count) += 1;
    }

    fn resize_to_fit(&self, panel: Option<PanelHeight>) {
        lock(&self.layouts).push(panel);
    }
}

#[derive(Debug, Default)]
struct TerminalInner {
    output: Vec<u8>,
    scrolls: usize,
    clears: usize,
    inputs: Vec<mpsc::UnboundedSender<Vec<u8>>>,
}

/// Terminal widget double
#[derive(Debug, Default)]
pub struct MockTerminal {
    inner: Mutex<TerminalInner>,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner).output).into_owned()
    }

    pub fn scrolls(&self) -> usize {
        lock(&self.inner).scrolls
    }

    pub fn clears(&self) -> usize {
        lock(&self.inner).clears
    }

    /// Number of input bindings created
    pub fn input_bindings(&self) -> usize {
        lock(&self.inner).inputs.len()
    }

    /// Simulate a keystroke; delivered to every live binding
    pub fn type_input(&self, bytes: &[u8]) {
        for tx in lock(&self.inner).inputs.iter() {
            let _ = tx.send(bytes.to_vec());
        }
    }
}

impl TerminalSurface for MockTerminal {
    fn write(&self, bytes: &[u8]) {
        lock(&self.inner).output.extend_from_slice(bytes);
    }

    fn scroll_to_bottom(&self) {
        lock(&self.inner).scrolls += 1;
    }

    fn clear(&self) {
        let mut inner = lock(&self.inner);
        inner.output.clear();
        inner.clears += 1;
    }

    fn subscribe_input(&self) -> TerminalInput {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.inner).inputs.push(tx);
        rx
    }
}

/// Pointer source double
#[derive(Debug, Default)]
pub struct MockPointer {
    listeners: Mutex<Vec<mpsc::UnboundedSender<PointerEvent>>>,
}

impl MockPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listeners that have not been released
    pub fn active_listeners(&self) -> usize {
        lock(&self.listeners)
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    pub fn move_to(&self, y: u32, viewport_height: u32) {
        self.send(PointerEvent::Moved { y, viewport_height });
    }

    pub fn release(&self) {
        self.send(PointerEvent::Released);
    }

    fn send(&self, event: PointerEvent) {
        for tx in lock(&self.listeners).iter() {
            let _ = tx.send(event);
        }
    }
}

impl PointerSurface for MockPointer {
    fn subscribe_pointer(&self) -> PointerSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.listeners).push(tx);
        rx
    }
}

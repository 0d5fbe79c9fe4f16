//! Disk store capability

use std::path::{Path, PathBuf};

use boardlab_core::prelude::*;

/// Result of the folder picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFolder {
    pub root: PathBuf,
    pub files: Vec<String>,
}

/// Local folder operations
///
/// `dir` is always a directory path (the opened root, or `root/lib`);
/// file names are bare.
#[trait_variant::make(DiskStore: Send)]
pub trait LocalDiskStore {
    /// Ask the user for a folder. `Ok(None)` when the picker was dismissed.
    async fn open_folder(&self) -> Result<Option<OpenedFolder>>;

    async fn list_files(&self, dir: &Path) -> Result<Vec<String>>;

    async fn load_file(&self, dir: &Path, filename: &str) -> Result<String>;

    async fn save_file(&self, dir: &Path, filename: &str, contents: &str) -> Result<()>;

    async fn remove_file(&self, dir: &Path, filename: &str) -> Result<()>;

    async fn rename_file(&self, dir: &Path, from: &str, to: &str) -> Result<()>;
}

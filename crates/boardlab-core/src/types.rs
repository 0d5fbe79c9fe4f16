//! Core domain types shared by every Board Lab crate

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which file store an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// The local folder opened by the user
    #[default]
    Disk,
    /// The microcontroller reachable over the serial link
    Serial,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Disk => write!(f, "disk"),
            DeviceKind::Serial => write!(f, "serial"),
        }
    }
}

/// Logical folder used to scope both file listings
///
/// Shared across devices even though the disk and the board have
/// independent roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationFolder {
    #[default]
    Root,
    Lib,
}

impl NavigationFolder {
    /// Absolute navigation path; always starts with `/`
    pub fn as_path(&self) -> &'static str {
        match self {
            NavigationFolder::Root => "/",
            NavigationFolder::Lib => "/lib",
        }
    }

    /// Path of `filename` on the board's file system
    pub fn serial_path(&self, filename: &str) -> String {
        match self {
            NavigationFolder::Root => format!("/{filename}"),
            NavigationFolder::Lib => format!("/lib/{filename}"),
        }
    }

    /// Directory on disk that mirrors this folder under `root`
    pub fn disk_dir(&self, root: &Path) -> PathBuf {
        match self {
            NavigationFolder::Root => root.to_path_buf(),
            NavigationFolder::Lib => root.join("lib"),
        }
    }
}

impl fmt::Display for NavigationFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Height of the bottom panel, as a CSS-like length
///
/// Serialized as `"25rem"` / `"312px"` so the presentation layer can apply it
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PanelHeight {
    Rem(f32),
    Px(u32),
}

impl PanelHeight {
    /// Height used the first time any panel is opened
    pub const DEFAULT: PanelHeight = PanelHeight::Rem(25.0);
}

impl Default for PanelHeight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PanelHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelHeight::Rem(rem) => write!(f, "{rem}rem"),
            PanelHeight::Px(px) => write!(f, "{px}px"),
        }
    }
}

impl FromStr for PanelHeight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(value) = s.strip_suffix("rem") {
            return value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(PanelHeight::Rem)
                .ok_or_else(|| Error::config(format!("invalid panel height: {s}")));
        }
        if let Some(value) = s.strip_suffix("px") {
            return value
                .trim()
                .parse::<u32>()
                .map(PanelHeight::Px)
                .map_err(|_| Error::config(format!("invalid panel height: {s}")));
        }
        Err(Error::config(format!(
            "panel height must end in `rem` or `px`: {s}"
        )))
    }
}

impl TryFrom<String> for PanelHeight {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PanelHeight> for String {
    fn from(value: PanelHeight) -> Self {
        value.to_string()
    }
}

/// A serial port the board may be attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPort {
    /// OS path, e.g. `/dev/ttyUSB0` or `COM3`
    pub path: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

impl SerialPort {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            manufacturer: None,
        }
    }
}

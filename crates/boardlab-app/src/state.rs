//! Application state (Model in TEA pattern)

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::config::Settings;
use boardlab_core::{DeviceKind, NavigationFolder, PanelHeight, SerialPort};

/// Serial link status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Transport is being opened
    Connecting { path: String },
    /// Transport is open and the device byte stream is subscribed
    Connected { path: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, ConnectionState::Disconnected)
    }

    /// Port path of the current or pending connection
    pub fn path(&self) -> Option<&str> {
        match self {
            ConnectionState::Disconnected => None,
            ConnectionState::Connecting { path } | ConnectionState::Connected { path } => {
                Some(path)
            }
        }
    }
}

/// Bottom panel layout. At most one panel is open at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    pub terminal_open: bool,
    pub files_open: bool,
    /// Unset until a panel is first opened, then kept across toggles
    pub height: Option<PanelHeight>,
    /// A divider drag is in progress
    pub resizing: bool,
}

impl PanelState {
    pub fn any_open(&self) -> bool {
        self.terminal_open || self.files_open
    }

    /// Initialize the shared height on first use
    pub fn ensure_height(&mut self, default: PanelHeight) {
        if self.height.is_none() {
            self.height = Some(default);
        }
    }

    /// Height the editor must leave free below it, `None` for full height
    pub fn editor_inset(&self, default: PanelHeight) -> Option<PanelHeight> {
        self.any_open().then(|| self.height.unwrap_or(default))
    }
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub visible: bool,
    /// Bumped on every show; a hide timer only applies to the revision that
    /// scheduled it.
    pub revision: u64,
    pub shown_at: Option<DateTime<Local>>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            text: "Disconnected".to_string(),
            visible: true,
            revision: 0,
            shown_at: None,
        }
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    pub connection: ConnectionState,

    /// Store that file operations target
    pub selected_device: DeviceKind,

    /// Folder scoping both listings
    pub navigation: NavigationFolder,

    /// Opened disk folder; `None` disables disk operations
    pub disk_root: Option<PathBuf>,

    /// Replaced wholesale by each listing refresh
    pub disk_files: Vec<String>,

    /// Replaced wholesale by each listing refresh, already filtered
    pub serial_files: Vec<String>,

    /// File loaded into the editor. May not exist yet on the selected store.
    pub selected_file: Option<String>,

    /// A rename is in progress; serial file loads are refused meanwhile
    pub is_editing_filename: bool,

    pub panels: PanelState,

    pub message: Notification,

    /// Terminal input has been wired to the device. Never reset.
    pub is_terminal_bound: bool,

    /// Ports found when the port dialog last opened
    pub ports: Vec<SerialPort>,

    pub is_port_dialog_open: bool,

    pub is_new_file_dialog_open: bool,

    pub settings: Settings,

    quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            selected_device: DeviceKind::Disk,
            navigation: NavigationFolder::Root,
            disk_root: None,
            disk_files: Vec::new(),
            serial_files: Vec::new(),
            selected_file: None,
            is_editing_filename: false,
            panels: PanelState::default(),
            message: Notification::default(),
            is_terminal_bound: false,
            ports: Vec::new(),
            is_port_dialog_open: false,
            is_new_file_dialog_open: false,
            settings,
            quitting: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Cached listing of `device`
    pub fn files(&self, device: DeviceKind) -> &[String] {
        match device {
            DeviceKind::Disk => &self.disk_files,
            DeviceKind::Serial => &self.serial_files,
        }
    }

    /// Selected file name, or the configured placeholder for a new file
    pub fn selected_file_or_unnamed(&self) -> String {
        self.selected_file
            .clone()
            .unwrap_or_else(|| self.settings.files.unnamed_file.clone())
    }

    /// Disk directory for the current navigation folder
    pub fn disk_dir(&self) -> Option<PathBuf> {
        self.disk_root
            .as_deref()
            .map(|root| self.navigation.disk_dir(root))
    }

    /// Height the editor must leave free for the open panel
    pub fn editor_inset(&self) -> Option<PanelHeight> {
        self.panels.editor_inset(self.settings.panels.default_height)
    }

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_initial_state() {
        let state = AppState::new();
        assert_eq!(state.connection, ConnectionState::Disconnected);
        assert_eq!(state.selected_device, DeviceKind::Disk);
        assert_eq!(state.navigation.as_path(), "/");
        assert!(state.disk_root.is_none());
        assert!(state.selected_file.is_none());
        assert!(!state.is_terminal_bound);
        assert!(state.panels.height.is_none());
        assert_eq!(state.message.text, "Disconnected");
        assert!(state.message.visible);
        assert!(!state.should_quit());
    }

    #[test]
    fn test_connection_path() {
        assert_eq!(ConnectionState::Disconnected.path(), None);
        let c = ConnectionState::Connecting {
            path: "/dev/ttyUSB0".into(),
        };
        assert_eq!(c.path(), Some("/dev/ttyUSB0"));
        assert!(!c.is_connected());
        assert!(!c.is_disconnected());
    }

    #[test]
    fn test_editor_inset_only_when_panel_open() {
        let mut panels = PanelState::default();
        assert_eq!(panels.editor_inset(PanelHeight::DEFAULT), None);

        panels.files_open = true;
        assert_eq!(
            panels.editor_inset(PanelHeight::DEFAULT),
            Some(PanelHeight::DEFAULT)
        );

        panels.height = Some(PanelHeight::Px(180));
        assert_eq!(
            panels.editor_inset(PanelHeight::DEFAULT),
            Some(PanelHeight::Px(180))
        );
    }

    #[test]
    fn test_ensure_height_keeps_existing() {
        let mut panels = PanelState {
            height: Some(PanelHeight::Px(90)),
            ..Default::default()
        };
        panels.ensure_height(PanelHeight::DEFAULT);
        assert_eq!(panels.height, Some(PanelHeight::Px(90)));
    }

    #[test]
    fn test_disk_dir_follows_navigation() {
        let mut state = AppState::new();
        assert!(state.disk_dir().is_none());

        state.disk_root = Some(PathBuf::from("/work"));
        assert_eq!(state.disk_dir().as_deref(), Some(Path::new("/work")));

        state.navigation = NavigationFolder::Lib;
        assert_eq!(state.disk_dir().as_deref(), Some(Path::new("/work/lib")));
    }

    #[test]
    fn test_selected_file_or_unnamed() {
        let mut state = AppState::new();
        assert_eq!(state.selected_file_or_unnamed(), "undefined");
        state.selected_file = Some("main.py".into());
        assert_eq!(state.selected_file_or_unnamed(), "main.py");
    }
}

//! Configuration types for Board Lab
//!
//! Defines:
//! - `Settings` - Global application settings
//! - Related sub-sections

use std::time::Duration;

use boardlab_core::PanelHeight;
use serde::{Deserialize, Serialize};

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub panels: PanelSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub files: FileSettings,
}

/// Bottom panel settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PanelSettings {
    /// Height applied the first time a panel opens (e.g. "25rem", "300px")
    #[serde(default)]
    pub default_height: PanelHeight,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            default_height: PanelHeight::DEFAULT,
        }
    }
}

/// Auto-hide delays for transient notifications, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationSettings {
    #[serde(default = "default_connected_ms")]
    pub connected_ms: u64,

    #[serde(default = "default_transfer_ms")]
    pub transfer_ms: u64,

    #[serde(default = "default_filename_saved_ms")]
    pub filename_saved_ms: u64,
}

impl NotificationSettings {
    pub fn connected(&self) -> Duration {
        Duration::from_millis(self.connected_ms)
    }

    pub fn transfer(&self) -> Duration {
        Duration::from_millis(self.transfer_ms)
    }

    pub fn filename_saved(&self) -> Duration {
        Duration::from_millis(self.filename_saved_ms)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            connected_ms: default_connected_ms(),
            transfer_ms: default_transfer_ms(),
            filename_saved_ms: default_filename_saved_ms(),
        }
    }
}

fn default_connected_ms() -> u64 {
    150
}

fn default_transfer_ms() -> u64 {
    500
}

fn default_filename_saved_ms() -> u64 {
    1000
}

/// File handling settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileSettings {
    /// Name given to a new file until the user renames it
    #[serde(default = "default_unnamed_file")]
    pub unnamed_file: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            unnamed_file: default_unnamed_file(),
        }
    }
}

fn default_unnamed_file() -> String {
    "undefined".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.panels.default_height, PanelHeight::Rem(25.0));
        assert_eq!(settings.notifications.connected(), Duration::from_millis(150));
        assert_eq!(settings.notifications.transfer(), Duration::from_millis(500));
        assert_eq!(
            settings.notifications.filename_saved(),
            Duration::from_secs(1)
        );
        assert_eq!(settings.files.unnamed_file, "undefined");
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml = r#"
[notifications]
transfer_ms = 2000
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.notifications.transfer_ms, 2000);
        assert_eq!(settings.notifications.connected_ms, 150);
        assert_eq!(settings.panels, PanelSettings::default());
    }

    #[test]
    fn test_settings_deserialize_panel_height() {
        let toml = r#"
[panels]
default_height = "320px"
"#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.panels.default_height, PanelHeight::Px(320));
    }

    #[test]
    fn test_settings_reject_bad_panel_height() {
        let toml = r#"
[panels]
default_height = "tall"
"#;
        assert!(toml::from_str::<Settings>(toml).is_err());
    }
}

//! Settings parser for config.toml

use std::path::{Path, PathBuf};

use super::types::Settings;
use boardlab_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "boardlab";

/// Per-user configuration directory (`~/.config/boardlab` on Linux)
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR))
}

/// Load settings from `config_dir/config.toml`
///
/// A missing or unreadable file is not an error: defaults are returned and
/// the problem is logged.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings from the per-user configuration directory
pub fn load_user_settings() -> Settings {
    match user_config_dir() {
        Some(dir) => load_settings(&dir),
        None => {
            debug!("No user config directory on this platform, using defaults");
            Settings::default()
        }
    }
}

/// Save settings to `config_dir/config.toml`
pub fn save_settings(config_dir: &Path, settings: &Settings) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config dir {:?}", config_dir))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    let temp_path = config_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("{}{}", CONFIG_HEADER, content);

    // Atomic write: write to temp, then rename
    std::fs::write(&temp_path, &full_content).context("Failed to write temp config file")?;
    std::fs::rename(&temp_path, &config_path)
        .with_context(|| format!("Failed to replace {:?}", config_path))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

const CONFIG_HEADER: &str = "# Board Lab Configuration\n\n";

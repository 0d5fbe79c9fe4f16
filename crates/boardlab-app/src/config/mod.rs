//! Configuration file parsing for Board Lab
//!
//! Supports `<config dir>/boardlab/config.toml` - global settings

pub mod settings;
pub mod types;

pub use settings::{load_settings, load_user_settings, save_settings, user_config_dir};
pub use types::*;

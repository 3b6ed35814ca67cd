pub mod settings;
pub mod store;

pub use settings::{ConfigError, ConfigResult, Settings};
pub use store::SettingsStore;

use std::path::PathBuf;

/// Environment variable that overrides the stored API key
pub const API_KEY_ENV: &str = "KIMI_API_KEY";

/// Configuration directory (~/.kimi-coder)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kimi-coder"))
}

/// Default settings file path (~/.kimi-coder/config.json)
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Expand a leading ~/ to the user's home directory
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(path))
    }
}

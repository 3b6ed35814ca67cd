use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::settings::{ConfigError, ConfigResult, Settings};
use crate::API_KEY_ENV;

/// Loads and persists [`Settings`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (~/.kimi-coder/config.json)
    pub fn default_location() -> ConfigResult<Self> {
        let path = crate::default_config_path()
            .ok_or_else(|| ConfigError::InvalidPath("Could not find home directory".to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load settings from disk, falling back to defaults when the file is
    /// missing. The `KIMI_API_KEY` environment variable overrides the
    /// stored key either way.
    pub async fn load(&self) -> ConfigResult<Settings> {
        let mut settings = if self.path.exists() {
            debug!("loading settings from {:?}", self.path);
            let content = tokio::fs::read_to_string(&self.path).await?;
            serde_json::from_str(&content)?
        } else {
            debug!("settings file {:?} not found, using defaults", self.path);
            Settings::default()
        };

        Self::apply_key_override(&mut settings, std::env::var(API_KEY_ENV).ok().as_deref());

        Ok(settings)
    }

    /// Replace the stored key with the environment override, unless the
    /// override is absent or whitespace-only
    fn apply_key_override(settings: &mut Settings, override_key: Option<&str>) {
        if let Some(key) = override_key {
            if !key.trim().is_empty() {
                settings.api_key = key.to_string();
            }
        }
    }

    /// Write settings to disk, creating parent directories as needed
    pub async fn save(&self, settings: &Settings) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, content).await?;
        info!("settings saved to {:?}", self.path);
        Ok(())
    }

    /// Write defaults unless a file already exists (or `force` is set).
    /// Returns whether a file was written.
    pub async fn init(&self, force: bool) -> ConfigResult<bool> {
        if self.exists() && !force {
            return Ok(false);
        }
        self.save(&Settings::default()).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("config.json"));

        let mut settings = Settings::with_api_key("sk-test");
        settings.model = "k2-base".to_string();
        store.save(&settings).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.model, "k2-base");
    }

    #[test]
    fn test_key_override_rules() {
        let mut settings = Settings::with_api_key("sk-stored");

        SettingsStore::apply_key_override(&mut settings, None);
        assert_eq!(settings.api_key, "sk-stored");

        SettingsStore::apply_key_override(&mut settings, Some("   "));
        assert_eq!(settings.api_key, "sk-stored");

        SettingsStore::apply_key_override(&mut settings, Some("sk-env"));
        assert_eq!(settings.api_key, "sk-env");
    }

    #[tokio::test]
    async fn test_load_reads_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("config.json"));
        store.save(&Settings::with_api_key("sk-stored")).await.unwrap();

        std::env::set_var(API_KEY_ENV, "sk-env");
        let loaded = store.load().await.unwrap();
        std::env::remove_var(API_KEY_ENV);

        assert_eq!(loaded.api_key, "sk-env");
        assert_eq!(loaded.model, crate::settings::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("missing.json"));

        let settings = store.load().await.unwrap();
        assert_eq!(settings.model, crate::settings::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_init_respects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("config.json"));

        assert!(store.init(false).await.unwrap());

        let mut settings = store.load().await.unwrap();
        settings.model = "custom".to_string();
        store.save(&settings).await.unwrap();

        assert!(!store.init(false).await.unwrap());
        assert_eq!(store.load().await.unwrap().model, "custom");

        assert!(store.init(true).await.unwrap());
        assert_eq!(
            store.load().await.unwrap().model,
            crate::settings::DEFAULT_MODEL
        );
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.ai/v1";
pub const DEFAULT_MODEL: &str = "moonshotai/Kimi-K2-Instruct";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const MAX_TOKENS_LIMIT: u32 = 128_000;

/// Assistant settings.
///
/// `api_key`, `base_url`, `model`, `temperature`, `max_tokens` and
/// `timeout_secs` drive the wire behavior; the behavior and shortcut
/// fields are frontend hints only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub auto_complete_enabled: bool,
    #[serde(default = "default_auto_complete_delay")]
    pub auto_complete_delay_ms: u32,
    #[serde(default = "default_true")]
    pub show_code_analysis: bool,

    #[serde(default = "default_completion_shortcut")]
    pub quick_completion_shortcut: String,
    #[serde(default = "default_analysis_shortcut")]
    pub code_analysis_shortcut: String,
    #[serde(default = "default_tests_shortcut")]
    pub generate_tests_shortcut: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_auto_complete_delay() -> u32 {
    1000
}

fn default_completion_shortcut() -> String {
    "Ctrl+Shift+K".to_string()
}

fn default_analysis_shortcut() -> String {
    "Ctrl+Shift+A".to_string()
}

fn default_tests_shortcut() -> String {
    "Ctrl+Shift+T".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            auto_complete_enabled: true,
            auto_complete_delay_ms: default_auto_complete_delay(),
            show_code_analysis: true,
            quick_completion_shortcut: default_completion_shortcut(),
            code_analysis_shortcut: default_analysis_shortcut(),
            generate_tests_shortcut: default_tests_shortcut(),
        }
    }
}

impl Settings {
    /// Create settings with the given API key and all other defaults
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: key.into(),
            ..Self::default()
        }
    }

    /// Whether the settings can back a request
    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Every validation failure, in stable order
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.api_key.trim().is_empty() {
            errors.push("API Key is required".to_string());
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            errors.push("Temperature must be between 0.0 and 1.0".to_string());
        }

        if self.max_tokens < 1 || self.max_tokens > MAX_TOKENS_LIMIT {
            errors.push("Max Tokens must be between 1 and 128000".to_string());
        }

        errors
    }

    /// Read a scalar field by dotted key
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "api_key" => Some(self.api_key.clone()),
            "base_url" => Some(self.base_url.clone()),
            "model" => Some(self.model.clone()),
            "temperature" => Some(self.temperature.to_string()),
            "max_tokens" => Some(self.max_tokens.to_string()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            "behavior.auto_complete_enabled" => Some(self.auto_complete_enabled.to_string()),
            "behavior.auto_complete_delay_ms" => Some(self.auto_complete_delay_ms.to_string()),
            "behavior.show_code_analysis" => Some(self.show_code_analysis.to_string()),
            "shortcuts.quick_completion" => Some(self.quick_completion_shortcut.clone()),
            "shortcuts.code_analysis" => Some(self.code_analysis_shortcut.clone()),
            "shortcuts.generate_tests" => Some(self.generate_tests_shortcut.clone()),
            _ => None,
        }
    }

    /// Set a scalar field by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "api_key" => self.api_key = value.to_string(),
            "base_url" => self.base_url = value.to_string(),
            "model" => self.model = value.to_string(),
            "temperature" => {
                self.temperature = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid temperature: {}", value))
                })?;
            }
            "max_tokens" => {
                self.max_tokens = value
                    .parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid number: {}", value)))?;
            }
            "timeout_secs" => {
                self.timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid number: {}", value)))?;
            }
            "behavior.auto_complete_enabled" => {
                self.auto_complete_enabled = value
                    .parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid boolean: {}", value)))?;
            }
            "behavior.auto_complete_delay_ms" => {
                self.auto_complete_delay_ms = value
                    .parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid number: {}", value)))?;
            }
            "behavior.show_code_analysis" => {
                self.show_code_analysis = value
                    .parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid boolean: {}", value)))?;
            }
            "shortcuts.quick_completion" => self.quick_completion_shortcut = value.to_string(),
            "shortcuts.code_analysis" => self.code_analysis_shortcut = value.to_string(),
            "shortcuts.generate_tests" => self.generate_tests_shortcut = value.to_string(),
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model, "moonshotai/Kimi-K2-Instruct");
        assert_eq!(settings.temperature, 0.3);
        assert_eq!(settings.max_tokens, 2048);
        assert_eq!(settings.base_url, "https://api.moonshot.ai/v1");
        assert!(settings.auto_complete_enabled);
    }

    #[test]
    fn test_missing_api_key() {
        let settings = Settings::default();
        assert!(!settings.is_valid());
        assert_eq!(settings.validation_errors(), vec!["API Key is required"]);
    }

    #[test]
    fn test_whitespace_api_key() {
        let settings = Settings::with_api_key("   ");
        assert!(!settings.is_valid());
        assert_eq!(settings.validation_errors(), vec!["API Key is required"]);
    }

    #[test]
    fn test_valid_settings() {
        let settings = Settings::with_api_key("sk-test");
        assert!(settings.is_valid());
        assert!(settings.validation_errors().is_empty());
    }

    #[test]
    fn test_temperature_range() {
        let mut settings = Settings::with_api_key("sk-test");
        settings.temperature = 1.5;
        assert_eq!(
            settings.validation_errors(),
            vec!["Temperature must be between 0.0 and 1.0"]
        );

        settings.temperature = -0.1;
        assert!(!settings.is_valid());

        settings.temperature = 1.0;
        assert!(settings.is_valid());
    }

    #[test]
    fn test_max_tokens_range() {
        let mut settings = Settings::with_api_key("sk-test");
        settings.max_tokens = 0;
        assert_eq!(
            settings.validation_errors(),
            vec!["Max Tokens must be between 1 and 128000"]
        );

        settings.max_tokens = 128_001;
        assert!(!settings.is_valid());

        settings.max_tokens = 128_000;
        assert!(settings.is_valid());
    }

    #[test]
    fn test_all_errors_stable_order() {
        let mut settings = Settings::default();
        settings.temperature = 2.0;
        settings.max_tokens = 0;

        let errors = settings.validation_errors();
        assert_eq!(
            errors,
            vec![
                "API Key is required",
                "Temperature must be between 0.0 and 1.0",
                "Max Tokens must be between 1 and 128000",
            ]
        );
    }

    #[test]
    fn test_get_set_value() {
        let mut settings = Settings::default();
        settings.set_value("model", "k2-base").unwrap();
        assert_eq!(settings.get_value("model"), Some("k2-base".to_string()));

        settings.set_value("temperature", "0.9").unwrap();
        assert_eq!(settings.temperature, 0.9);

        assert!(matches!(
            settings.set_value("temperature", "warm"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            settings.set_value("no.such.key", "1"),
            Err(ConfigError::KeyNotFound(_))
        ));
        assert_eq!(settings.get_value("no.such.key"), None);
    }

    #[test]
    fn test_roundtrip_json() {
        let settings = Settings::with_api_key("sk-test");
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_partial_json_gets_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"api_key":"sk-test"}"#).unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(settings.is_valid());
    }
}

/// Application configuration
///
/// Loaded from `<config_dir>/car-scanner/config.toml` when present:
/// - Linux: ~/.config/car-scanner/config.toml
/// - macOS: ~/Library/Application Support/car-scanner/config.toml
/// - Windows: %APPDATA%\car-scanner\config.toml
///
/// Every field has a default, so an empty or missing file is fine.
/// The API key is normally supplied through the environment.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

/// Environment variables checked for the API key, first match wins
const API_KEY_VARS: [&str; 2] = ["CAR_SCANNER_API_KEY", "GEMINI_API_KEY"];
const MODEL_VAR: &str = "CAR_SCANNER_MODEL";

#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Append the damage assessment instruction to the prompt
    #[serde(default = "default_true")]
    pub damage_assessment: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            damage_assessment: true,
        }
    }
}

impl GeminiConfig {
    /// Request timeout, never below one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// Keep the key out of logs
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("damage_assessment", &self.damage_assessment)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// SQLite file holding the history; defaults to the user data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// A file that fails to parse is logged and ignored.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(raw) => Self::from_toml_str(&raw).unwrap_or_else(|e| {
                    tracing::error!("⚠️  {} (using defaults): {}", path.display(), e);
                    Self::default()
                }),
                Err(e) => {
                    tracing::error!("⚠️  Cannot read {}: {}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Where the config file is looked up
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("car-scanner");
        path.push("config.toml");
        Some(path)
    }

    /// Override fields from the environment. `lookup` is `std::env::var`
    /// outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());
        if let Some(key) = key {
            self.gemini.api_key = Some(key.trim().to_string());
        }

        if let Some(model) = lookup(MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            self.gemini.model = model.trim().to_string();
        }
    }

    /// Resolved history database path
    pub fn history_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.history.path {
            return Some(path.clone());
        }
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("car-scanner");
        path.push("car_scanner.db");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.gemini.timeout_secs, 60);
        assert!(config.gemini.damage_assessment);
        assert!(config.gemini.api_key.is_none());
        assert!(config.history.path.is_none());
    }

    #[test]
    fn test_partial_file() {
        let raw = r#"
            [gemini]
            model = "gemini-1.5-pro"
            damage_assessment = false

            [history]
            path = "/tmp/history.db"
        "#;
        let config = Config::from_toml_str(raw).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert!(!config.gemini.damage_assessment);
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/history.db")));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = Config::from_toml_str("[gemini]\ntimeout_secs = 0").unwrap();
        assert_eq!(config.gemini.timeout(), Duration::from_secs(1));

        let config = Config::from_toml_str("[gemini]\ntimeout_secs = 30").unwrap();
        assert_eq!(config.gemini.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(Config::from_toml_str("[gemini\nmodel = ").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GEMINI_API_KEY", " secret-key "),
            ("CAR_SCANNER_MODEL", "gemini-2.0-flash"),
        ]);
        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.gemini.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_blank_env_key_is_ignored() {
        let mut config = Config::default();
        config.gemini.api_key = Some("from-file".to_string());
        config.apply_env(|name| (name == "GEMINI_API_KEY").then(|| "  ".to_string()));
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_api_key_never_serialized_or_debug_printed() {
        let mut config = Config::default();
        config.gemini.api_key = Some("super-secret".to_string());

        let serialized = toml::to_string(&config).unwrap();
        assert!(!serialized.contains("super-secret"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

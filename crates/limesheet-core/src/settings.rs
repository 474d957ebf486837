//! Assistant settings: API key and model.
//!
//! Resolution order: `LIMESHEET_API_KEY` in the environment wins, then
//! `<config dir>/limesheet/config.toml`. The model defaults to
//! [`DEFAULT_MODEL`] unless the config file overrides it.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

use crate::assistant::DEFAULT_MODEL;
use crate::error::{CoreError, Result};

pub const API_KEY_ENV: &str = "LIMESHEET_API_KEY";

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Deserialize, Default)]
struct SettingsFile {
    api_key: Option<String>,
    model: Option<String>,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the config file (if any), then apply the
    /// environment override.
    pub fn load() -> Result<Settings> {
        let mut settings = match config_path() {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(&path)?;
                Settings::from_toml_str(&text)?
            }
            _ => Settings::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                settings.api_key = Some(key);
            }
        }
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Settings> {
        let file: SettingsFile =
            toml::from_str(text).map_err(|e| CoreError::Settings(e.to_string()))?;
        Ok(Settings {
            api_key: file.api_key,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// The key, or a hard error for callers that need the assistant.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(CoreError::MissingApiKey)
    }
}

fn config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "limesheet")?;
    Some(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str() {
        let settings = Settings::from_toml_str(
            "api_key = \"k-123\"\nmodel = \"gemini-2.5-pro\"\n",
        )
        .unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("k-123"));
        assert_eq!(settings.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_model_defaults_when_missing() {
        let settings = Settings::from_toml_str("api_key = \"k\"\n").unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_require_api_key() {
        let settings = Settings::default();
        assert!(matches!(
            settings.require_api_key(),
            Err(CoreError::MissingApiKey)
        ));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Settings::from_toml_str("api_key = [broken").is_err());
    }
}

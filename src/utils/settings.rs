use super::catalog::Provider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
const OPENROUTER_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Deployment configuration, read from `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Shared credentials used when the user has not entered their own
    pub default_gemini_key: Option<String>,
    pub default_openrouter_key: Option<String>,
    pub request_timeout_secs: u64,
    pub ctrl_enter_submit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_gemini_key: None,
            default_openrouter_key: None,
            request_timeout_secs: 120,
            ctrl_enter_submit: false,
        }
    }
}

impl Settings {
    /// Get the platform-specific settings directory
    pub fn settings_dir() -> Result<PathBuf, String> {
        let config_dir = if cfg!(any(target_os = "windows", target_os = "macos")) {
            // %APPDATA%\fiesta or ~/Library/Application Support/fiesta
            dirs::config_dir()
                .ok_or("Could not find config directory")?
                .join("fiesta")
        } else {
            // Linux/Unix: $HOME/.fiesta
            dirs::home_dir()
                .ok_or("Could not find home directory")?
                .join(".fiesta")
        };

        Ok(config_dir)
    }

    pub fn settings_path() -> Result<PathBuf, String> {
        Ok(Self::settings_dir()?.join("settings.toml"))
    }

    /// Load settings from the config file, then apply environment overrides
    pub fn load() -> Result<Self, String> {
        let path = Self::settings_path()?;
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read settings file: {}", e))?;
            Self::parse(&contents)?
        } else {
            Self::default()
        };

        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse settings file: {}", e))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(GEMINI_KEY_ENV).and_then(non_blank) {
            self.default_gemini_key = Some(key);
        }
        if let Some(key) = lookup(OPENROUTER_KEY_ENV).and_then(non_blank) {
            self.default_openrouter_key = Some(key);
        }
    }

    pub fn default_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.default_gemini_key.as_deref(),
            Provider::OpenRouter => self.default_openrouter_key.as_deref(),
        }
    }
}

/// Keys the user entered, persisted in the client store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter: Option<String>,
}

impl ApiKeys {
    /// Blank input clears a key
    pub fn new(gemini: &str, openrouter: &str) -> Self {
        Self {
            gemini: non_blank(gemini.to_string()),
            openrouter: non_blank(openrouter.to_string()),
        }
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.gemini.as_deref(),
            Provider::OpenRouter => self.openrouter.as_deref(),
        }
    }

    pub fn has_key(&self, provider: Provider) -> bool {
        self.get(provider).is_some()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_gemini_key, None);
        assert_eq!(settings.request_timeout_secs, 120);
        assert!(!settings.ctrl_enter_submit);
    }

    #[test]
    fn test_parse_partial_file() {
        let settings = Settings::parse("default_openrouter_key = \"sk-or-shared\"\n").unwrap();
        assert_eq!(settings.default_key(Provider::OpenRouter), Some("sk-or-shared"));
        assert_eq!(settings.default_key(Provider::Gemini), None);
        assert_eq!(settings.request_timeout_secs, 120);

        assert!(Settings::parse("request_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut settings = Settings::parse("default_gemini_key = \"from-file\"").unwrap();
        settings.apply_env(|name| match name {
            GEMINI_KEY_ENV => Some("from-env".to_string()),
            OPENROUTER_KEY_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(settings.default_key(Provider::Gemini), Some("from-env"));
        assert_eq!(settings.default_key(Provider::OpenRouter), None);
    }

    #[test]
    fn test_api_keys_blank_clears() {
        let keys = ApiKeys::new("  AIza-123 ", "");
        assert_eq!(keys.get(Provider::Gemini), Some("AIza-123"));
        assert!(!keys.has_key(Provider::OpenRouter));
    }

    #[test]
    fn test_api_keys_wire_shape() {
        let json = serde_json::to_string(&ApiKeys::new("", "sk-or")).unwrap();
        assert_eq!(json, r#"{"openrouter":"sk-or"}"#);
    }
}

//! Provider settings and their persistence.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Large-language-model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Provider {
    /// Google Gemini
    #[default]
    #[serde(rename = "gemini")]
    Gemini,

    /// OpenAI or any endpoint speaking the chat completions protocol
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    /// Identifier used in settings files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        }
    }

    /// Display name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }

    /// Base URL pre-filled when switching to this provider.
    ///
    /// Empty means the provider's public endpoint.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => "",
            Provider::OpenAi => "https://api.openai.com",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(Error::Settings(format!(
                "unknown provider '{}' (expected gemini or openai)",
                other
            ))),
        }
    }
}

/// Settings for the analysis client.
///
/// Passed explicitly to every analysis call; nothing is read from the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: Provider,
    pub api_key: String,
    /// Proxy or compatible endpoint; empty for the provider default
    pub base_url: String,
    /// Model name; empty for the provider default
    pub model: String,
}

impl AiSettings {
    /// Defaults for the given provider.
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            api_key: String::new(),
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
        }
    }

    /// Switch provider, resetting model and base URL to its defaults.
    ///
    /// The API key is kept.
    pub fn switch_provider(&mut self, provider: Provider) {
        if self.provider != provider {
            let api_key = std::mem::take(&mut self.api_key);
            *self = Self::for_provider(provider);
            self.api_key = api_key;
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Model to request, falling back to the provider default.
    pub fn effective_model(&self) -> &str {
        match self.model.trim() {
            "" => self.provider.default_model(),
            model => model,
        }
    }

    /// API key with all but the first and last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !base.is_empty() && !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::Settings(format!(
                "base URL must start with http:// or https://: {}",
                base
            )));
        }
        if self.model.chars().any(char::is_whitespace) {
            return Err(Error::Settings(format!(
                "model name must not contain whitespace: '{}'",
                self.model
            )));
        }
        Ok(())
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self::for_provider(Provider::Gemini)
    }
}

/// Persists [`AiSettings`] as a JSON file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Name of the settings file inside the config directory.
    pub const FILE_NAME: &'static str = "settings.json";

    /// Store settings at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store settings in the platform config directory.
    pub fn default_location() -> Result<Self> {
        directories::ProjectDirs::from("", "", "penpolish")
            .map(|dirs| Self::new(dirs.config_dir().join(Self::FILE_NAME)))
            .ok_or_else(|| Error::Settings("could not determine config directory".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults.
    ///
    /// A missing file yields defaults silently; unreadable, malformed or
    /// invalid content is logged and also yields defaults.
    pub fn load(&self) -> AiSettings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => AiSettings::default(),
            Err(e) => {
                log::warn!(
                    "Ignoring stored settings at {}: {}",
                    self.path.display(),
                    e
                );
                AiSettings::default()
            }
        }
    }

    /// Load settings, reporting why stored content was rejected.
    ///
    /// Returns `Ok(None)` when no settings file exists.
    pub fn try_load(&self) -> Result<Option<AiSettings>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let settings: AiSettings = serde_json::from_str(&content)
            .map_err(|e| Error::Settings(format!("failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(Some(settings))
    }

    /// Write settings, creating the parent directory if needed.
    pub fn save(&self, settings: &AiSettings) -> Result<()> {
        settings.validate()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::Settings(format!("failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, json)?;
        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Delete the stored settings. Missing files are not an error.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AiSettings::default();
        assert_eq!(settings.provider, Provider::Gemini);
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.base_url, "");
        assert!(!settings.has_api_key());

        let openai = AiSettings::for_provider(Provider::OpenAi);
        assert_eq!(openai.model, "gpt-4o-mini");
        assert_eq!(openai.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_switch_provider_keeps_key() {
        let mut settings = AiSettings::default()
            .with_api_key("secret")
            .with_model("gemini-2.5-pro");
        settings.switch_provider(Provider::OpenAi);

        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_effective_model_falls_back() {
        let settings = AiSettings::for_provider(Provider::OpenAi).with_model("  ");
        assert_eq!(settings.effective_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" gemini ".parse::<Provider>().unwrap(), Provider::Gemini);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_masked_api_key() {
        let settings = AiSettings::default().with_api_key("sk-1234567890abcd");
        assert_eq!(settings.masked_api_key(), "sk-1...abcd");
        assert_eq!(AiSettings::default().with_api_key("short").masked_api_key(), "*****");
    }

    #[test]
    fn test_validate() {
        assert!(AiSettings::default().validate().is_ok());
        assert!(AiSettings::default()
            .with_base_url("ftp://proxy")
            .validate()
            .is_err());
        assert!(AiSettings::default().with_model("gpt 4").validate().is_err());
    }

    #[test]
    fn test_wire_format_matches_stored_shape() {
        let settings = AiSettings::for_provider(Provider::OpenAi).with_api_key("k");
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"provider\":\"openai\""));
        assert!(json.contains("\"apiKey\":\"k\""));
        assert!(json.contains("\"baseUrl\""));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));

        assert_eq!(store.load(), AiSettings::default());

        let settings = AiSettings::for_provider(Provider::OpenAi)
            .with_api_key("sk-test")
            .with_base_url("https://proxy.example.com");
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);

        store.reset().unwrap();
        store.reset().unwrap();
        assert_eq!(store.load(), AiSettings::default());
    }

    #[test]
    fn test_corrupt_store_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(&path);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(store.try_load().is_err());
        assert_eq!(store.load(), AiSettings::default());

        std::fs::write(&path, r#"{"provider":"claude","apiKey":"","baseUrl":"","model":""}"#)
            .unwrap();
        assert_eq!(store.load(), AiSettings::default());

        std::fs::write(
            &path,
            r#"{"provider":"openai","apiKey":"k","baseUrl":"not a url","model":"m"}"#,
        )
        .unwrap();
        assert_eq!(store.load(), AiSettings::default());
    }
}

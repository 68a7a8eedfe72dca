//! STAR Journal configuration.
//!
//! User configuration for the text-generation backend and local storage.
//! Config file: `~/.config/star-journal/config.toml`. A missing file means
//! defaults; a malformed file is a configuration error.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Text-generation backend settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Base URL of the chat-completion API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum tokens in a completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. Low by default so rewrites stay stable.
    #[serde(default)]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    600
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Override for the data directory holding the CSV tables.
    /// Defaults to the XDG data directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    /// Effective data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::data_dir)
    }
}

/// Question pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSettings {
    /// Remove exact-duplicate questions from a freshly generated interview
    /// pool. Off by default: the generated candidates intentionally appear
    /// twice (directly and via the persisted store re-read), which weights
    /// them higher in the shuffled pool.
    #[serde(default)]
    pub strict_dedup: bool,
}

impl Default for QuestionSettings {
    fn default() -> Self {
        Self { strict_dedup: false }
    }
}

/// Main STAR Journal configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarConfig {
    /// Text-generation backend
    #[serde(default)]
    pub llm: LlmSettings,

    /// Local storage
    #[serde(default)]
    pub storage: StorageSettings,

    /// Question pool behavior
    #[serde(default)]
    pub questions: QuestionSettings,
}

impl StarConfig {
    /// Load configuration from the user config file.
    ///
    /// An absent file yields defaults; an unreadable or malformed file is
    /// an error the caller should surface.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let config = StarConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.max_tokens, 600);
        assert_eq!(config.llm.temperature, 0.0);
        assert!(!config.questions.strict_dedup);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[llm]\nmodel = \"gpt-4o-mini\"\n\n[questions]\nstrict_dedup = true\n",
        )
        .unwrap();

        let config = StarConfig::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 600);
        assert!(config.questions.strict_dedup);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [").unwrap();

        assert!(StarConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_data_dir_override() {
        let settings = StorageSettings {
            data_dir: Some(PathBuf::from("/tmp/star-test")),
        };
        assert_eq!(settings.resolve_data_dir(), PathBuf::from("/tmp/star-test"));
    }
}

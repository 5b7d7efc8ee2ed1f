//! Configuration settings for vidlearn.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the VideoDB API key.
pub const VIDEODB_API_KEY_ENV: &str = "VIDEODB_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub videodb: VideoDbSettings,
    pub llm: LlmSettings,
    pub topic: TopicSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// VideoDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoDbSettings {
    /// API base URL.
    pub base_url: String,
    /// API key. Falls back to the VIDEODB_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Collection created when the account has none.
    pub collection_name: String,
    pub collection_description: String,
    /// Delay between polls of long-running jobs.
    pub poll_interval_secs: u64,
    /// Request timeout, also the upper bound for polling a job.
    pub timeout_secs: u64,
}

impl Default for VideoDbSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.videodb.io".to_string(),
            api_key: None,
            collection_name: "Video Learning Collection".to_string(),
            collection_description: "Collection for educational videos".to_string(),
            poll_interval_secs: 5,
            timeout_secs: 600,
        }
    }
}

impl VideoDbSettings {
    /// Resolve the API key from config, then the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(VIDEODB_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Language model settings for answering questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat completion model.
    pub model: String,
    /// Maximum output tokens per answer.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Topic analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Number of transcript characters sent for topic analysis.
    pub max_transcript_preview: usize,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            max_tokens: 50,
            temperature: 0.3,
            max_transcript_preview: 500,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VidlearnError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidlearn")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_settings() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.llm.max_tokens, 150);
        assert!((settings.llm.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(settings.topic.max_transcript_preview, 500);
        assert_eq!(settings.videodb.collection_name, "Video Learning Collection");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "gpt-4.1"
            "#,
        )
        .unwrap();
        assert_eq!(settings.llm.model, "gpt-4.1");
        assert_eq!(settings.llm.max_tokens, 150);
        assert_eq!(settings.videodb.base_url, "https://api.videodb.io");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.topic.max_transcript_preview = 800;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.topic.max_transcript_preview, 800);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.general.log_level, "info");
    }

    #[test]
    fn test_configured_api_key_wins() {
        let settings = VideoDbSettings {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.resolved_api_key().as_deref(), Some("from-config"));
    }
}

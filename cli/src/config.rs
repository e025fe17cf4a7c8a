//! Application configuration.
//!
//! Read from `--config <path>` or `<config_dir>/chainlab/config.toml`. Every
//! field has a default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chainlab_embeddings::OpenAIProvider;
use chainlab_llm::OpenAIChatModel;
use chainlab_retrieval::RetrievalConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::travel::TravelConfig;

/// Environment variable that overrides `openai.api_key`.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub openai: OpenAIConfig,
    pub retrieval: RetrievalConfig,
    pub travel: TravelConfig,
}

/// Hosted API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: chainlab_llm::DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: chainlab_embeddings::DEFAULT_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/chainlab/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chainlab").join("config.toml"))
    }

    /// Load from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            },
        };

        config
            .retrieval
            .validate()
            .context("invalid [retrieval] configuration")?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// API key from the environment, then from the file.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// [`AppConfig::api_key`] with an injectable environment lookup.
    pub fn api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        env(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.openai.api_key.clone())
    }

    /// Chat client for the configured model.
    pub fn chat_model(&self, api_key: &str, temperature: f32) -> OpenAIChatModel {
        OpenAIChatModel::new()
            .with_api_key(api_key)
            .with_base_url(&self.openai.base_url)
            .with_model(&self.openai.chat_model)
            .with_temperature(temperature)
    }

    /// Embedding client for the configured model.
    pub fn embedder(&self, api_key: &str) -> OpenAIProvider {
        OpenAIProvider::new()
            .with_api_key(api_key)
            .with_base_url(&self.openai.base_url)
            .with_model(&self.openai.embedding_model)
    }
}

//! Configuration file management for imgscribe.
//!
//! This module handles loading application configuration from TOML files.
//! The file is optional: every field has a default, so a missing file or a
//! partial one both produce a usable configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::transcription::TranscriptionProvider;

/// Generation parameters sent with every chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Instruction placed before the image in the user message
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Sampling temperature
    #[serde(default = "default_one")]
    pub temperature: f32,
    /// Upper bound on generated tokens
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,
    /// Nucleus sampling mass
    #[serde(default = "default_one")]
    pub top_p: f32,
}

fn default_prompt() -> String {
    "Transcribe the following image".to_string()
}

fn default_one() -> f32 {
    1.0
}

fn default_max_completion_tokens() -> u32 {
    4096
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            temperature: default_one(),
            max_completion_tokens: default_max_completion_tokens(),
            top_p: default_one(),
        }
    }
}

/// Per-provider overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderEndpointConfig {
    /// Replaces the provider's chat-completions URL (proxies, gateways)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// All provider configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: ProviderEndpointConfig,
    #[serde(default)]
    pub openai: ProviderEndpointConfig,
}

impl ProvidersConfig {
    /// Resolves the endpoint for a provider, honouring overrides.
    pub fn endpoint_for(&self, provider: TranscriptionProvider) -> String {
        let overridden = match provider {
            TranscriptionProvider::Groq => self.groq.endpoint.as_deref(),
            TranscriptionProvider::OpenAI => self.openai.endpoint.as_deref(),
        };
        overridden.unwrap_or_else(|| provider.endpoint()).to_string()
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImgscribeConfig {
    /// Provider used when `--provider` is not given
    #[serde(default)]
    pub provider: TranscriptionProvider,
    /// Model id; the provider default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Root directory for `-n` output folders
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for ImgscribeConfig {
    fn default() -> Self {
        Self {
            provider: TranscriptionProvider::default(),
            model: None,
            output_dir: default_output_dir(),
            generation: GenerationConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl ImgscribeConfig {
    /// Loads configuration from `path`, or from the user's config directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file exists but cannot be read
    /// - If the TOML is malformed
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => get_config_path()?,
        };

        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config = Self::from_toml(&config_content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;
        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    /// - If the TOML is malformed or has wrongly typed fields
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    /// - If serialization fails
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Retrieves the default path of the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".config").join("imgscribe").join("imgscribe.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = ImgscribeConfig::from_toml("").unwrap();
        assert_eq!(config, ImgscribeConfig::default());
        assert_eq!(config.provider, TranscriptionProvider::Groq);
        assert_eq!(config.generation.max_completion_tokens, 4096);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = ImgscribeConfig::from_toml(
            r#"
provider = "openai"
model = "gpt-4o"

[generation]
temperature = 0.2

[providers.openai]
endpoint = "http://localhost:8080/v1/chat/completions"
"#,
        )
        .unwrap();

        assert_eq!(config.provider, TranscriptionProvider::OpenAI);
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.top_p, 1.0);
        assert_eq!(config.generation.prompt, "Transcribe the following image");
        assert_eq!(
            config.providers.endpoint_for(TranscriptionProvider::OpenAI),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            config.providers.endpoint_for(TranscriptionProvider::Groq),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(ImgscribeConfig::from_toml(r#"provider = "deepgram""#).is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImgscribeConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, ImgscribeConfig::default());
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let rendered = ImgscribeConfig::default().to_toml().unwrap();
        assert!(rendered.contains(r#"provider = "groq""#));
        assert_eq!(
            ImgscribeConfig::from_toml(&rendered).unwrap(),
            ImgscribeConfig::default()
        );
    }
}

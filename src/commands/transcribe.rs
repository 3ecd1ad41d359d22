//! Transcribe an image file.
//!
//! The default command: resolves provider, model and credentials, sends the
//! image to the chat-completion API once, and writes the transcript to stdout
//! or a file.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::{self, ImgscribeConfig};
use crate::transcription::{
    Transcript, TranscriptSchema, TranscriptionClient, TranscriptionConfig, TranscriptionModel,
    TranscriptionProvider,
};

/// Command-line overrides for a transcription run
#[derive(Debug, Clone, Default)]
pub struct TranscribeOptions {
    /// Provider to use instead of the configured one
    pub provider: Option<TranscriptionProvider>,
    /// Model id to use instead of the configured one
    pub model: Option<String>,
    /// Write the transcript here instead of stdout
    pub output: Option<PathBuf>,
    /// Print the transcript as JSON
    pub json: bool,
}

/// Handles transcription of an image file.
///
/// The API key is checked before the image is read, so a missing credential
/// never leads to any I/O or network traffic.
///
/// # Errors
/// - If the provider's API key is missing
/// - If the image cannot be read
/// - If the API request fails or the response has no transcript
/// - If the output file cannot be written
pub async fn handle_transcribe(
    image: &Path,
    options: TranscribeOptions,
    config_data: &ImgscribeConfig,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== imgscribe Transcribe Command ===");

    let transcription_config = resolve_config(&options, config_data)?;
    let schema = TranscriptSchema::generate()?;
    let client = TranscriptionClient::new(transcription_config, schema);

    let transcript = client.transcribe(image).await.map_err(|e| {
        tracing::error!("Transcription failed: {e}");
        e
    })?;
    tracing::debug!("Transcription completed: {} characters", transcript.text.len());

    let rendered = render(&transcript, options.json)?;

    if let Some(file_path) = options.output {
        std::fs::write(&file_path, &rendered)
            .with_context(|| format!("Failed to write to file '{}'", file_path.display()))?;
        tracing::debug!("Transcript written to file: {}", file_path.display());
    } else {
        println!("{rendered}");
        tracing::debug!("Transcript printed to stdout");
    }

    Ok(())
}

/// Merges flags over the config file and reads the credential.
///
/// # Errors
/// - `MissingApiKey` if the provider's environment variable is unset
pub fn resolve_config(
    options: &TranscribeOptions,
    config_data: &ImgscribeConfig,
) -> Result<TranscriptionConfig, anyhow::Error> {
    let provider = options.provider.unwrap_or(config_data.provider);

    // A configured model belongs to the configured provider; switching
    // provider on the command line falls back to that provider's default.
    let model_id = options.model.as_deref().or_else(|| {
        if provider == config_data.provider {
            config_data.model.as_deref()
        } else {
            None
        }
    });
    let model = TranscriptionModel::new(provider, model_id);

    let api_key = config::get_api_key(provider)?;

    Ok(TranscriptionConfig::new(
        model,
        api_key,
        config_data.providers.endpoint_for(provider),
        config_data.generation.clone(),
    ))
}

fn render(transcript: &Transcript, json: bool) -> Result<String, anyhow::Error> {
    if json {
        Ok(serde_json::to_string_pretty(transcript)?)
    } else {
        Ok(transcript.text.trim().to_string())
    }
}

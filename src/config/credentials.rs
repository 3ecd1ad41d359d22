//! API credentials from the environment.
//!
//! Keys are never stored in the config file. A `.env` file in the working
//! directory is honoured, but variables already set in the process win.

use crate::transcription::{TranscriptionError, TranscriptionProvider};

/// Loads `.env` from the working directory, if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env file: {e}"),
    }
}

/// Returns the API key for `provider` from its environment variable.
///
/// # Errors
/// - `MissingApiKey` if the variable is unset, not unicode, or blank
pub fn get_api_key(provider: TranscriptionProvider) -> Result<String, TranscriptionError> {
    let var = provider.api_key_env();
    std::env::var(var)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or(TranscriptionError::MissingApiKey {
            provider: provider.name(),
            var,
        })
}

//! Error taxonomy for the transcription pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while turning an image into a [`Transcript`](super::Transcript).
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The credential environment variable for the provider is unset or empty
    #[error("No API key for {provider}. Set the {var} environment variable")]
    MissingApiKey {
        provider: &'static str,
        var: &'static str,
    },

    /// The image file could not be read
    #[error("Failed to read image file {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, timeout or request-building failure
    #[error("{0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body was not a decodable JSON envelope
    #[error("Failed to decode API response: {0}")]
    InvalidResponse(String),

    /// The envelope decoded but did not contain a usable transcript
    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    /// The structured output schema could not be generated
    #[error("Failed to generate transcript schema: {0}")]
    Schema(String),
}

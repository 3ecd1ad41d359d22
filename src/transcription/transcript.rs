//! The transcript returned by the model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured transcription of a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct Transcript {
    /// Transcription of the provided image
    pub text: String,
}


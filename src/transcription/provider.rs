//! Transcription provider definitions and methods.
//!
//! Defines the chat-completion hosts imgscribe can talk to. Each provider has
//! its own endpoint, default vision model and credential variable.

use serde::{Deserialize, Serialize};

/// Represents a supported transcription provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAI,
}

impl TranscriptionProvider {
    pub fn id(&self) -> &'static str {
        match self {
            TranscriptionProvider::Groq => "groq",
            TranscriptionProvider::OpenAI => "openai",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TranscriptionProvider::Groq => "Groq",
            TranscriptionProvider::OpenAI => "OpenAI",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "groq" => Some(TranscriptionProvider::Groq),
            "openai" => Some(TranscriptionProvider::OpenAI),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[TranscriptionProvider::Groq, TranscriptionProvider::OpenAI]
    }

    /// Environment variable holding the bearer token for this provider
    pub fn api_key_env(&self) -> &'static str {
        match self {
            TranscriptionProvider::Groq => "GROQ_API_KEY",
            TranscriptionProvider::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Chat-completions endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            TranscriptionProvider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            TranscriptionProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
        }
    }

    /// Vision model used when neither config nor flags name one
    pub fn default_model(&self) -> &'static str {
        match self {
            TranscriptionProvider::Groq => "meta-llama/llama-4-maverick-17b-128e-instruct",
            TranscriptionProvider::OpenAI => "gpt-4o-mini",
        }
    }

    /// Whether the `strict` flag is sent with the JSON schema.
    ///
    /// OpenAI only enforces the schema in strict mode; Groq takes the schema as is.
    pub fn strict_schema(&self) -> Option<bool> {
        match self {
            TranscriptionProvider::Groq => None,
            TranscriptionProvider::OpenAI => Some(true),
        }
    }
}

impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(&s.to_ascii_lowercase()).ok_or_else(|| {
            let known: Vec<&str> = Self::all().iter().map(|p| p.id()).collect();
            format!("unknown provider '{s}' (expected one of: {})", known.join(", "))
        })
    }
}

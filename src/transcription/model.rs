//! Transcription model selection.
//!
//! A model is a provider plus the model identifier sent in the request body.
//! Unlike a fixed catalogue, vision models change often, so any id is accepted
//! and the provider default fills in when none is given.

use super::provider::TranscriptionProvider;

/// The model a request is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionModel {
    provider: TranscriptionProvider,
    api_model_name: String,
}

impl TranscriptionModel {
    /// Creates a model for the given provider, falling back to its default id
    pub fn new(provider: TranscriptionProvider, model: Option<&str>) -> Self {
        let api_model_name = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model())
            .to_string();
        Self {
            provider,
            api_model_name,
        }
    }

    /// Returns the provider for this model
    pub fn provider(&self) -> TranscriptionProvider {
        self.provider
    }

    /// Returns the model name to send to the API
    pub fn api_model_name(&self) -> &str {
        &self.api_model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_provider_default() {
        let model = TranscriptionModel::new(TranscriptionProvider::Groq, None);
        assert_eq!(
            model.api_model_name(),
            "meta-llama/llama-4-maverick-17b-128e-instruct"
        );

        let blank = TranscriptionModel::new(TranscriptionProvider::OpenAI, Some("  "));
        assert_eq!(blank.api_model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_explicit_model_wins() {
        let model = TranscriptionModel::new(TranscriptionProvider::OpenAI, Some("gpt-4o"));
        assert_eq!(model.api_model_name(), "gpt-4o");
        assert_eq!(model.provider(), TranscriptionProvider::OpenAI);
    }
}

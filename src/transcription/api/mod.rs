//! Chat-completion client for image transcription.
//!
//! Groq and OpenAI expose the same OpenAI-compatible chat-completions API, so
//! one client handles both; the provider only decides the endpoint, default
//! model, credential and whether the schema is sent in strict mode.
//!
//! A transcription is a single exchange: encode the image, build one request
//! carrying a structured-output schema, POST it once, and read the transcript
//! out of `choices[0].message.content`. There are no retries.

pub mod request;
pub mod response;

use std::path::Path;

use super::error::TranscriptionError;
use super::image::{encode_image, image_data_url};
use super::model::TranscriptionModel;
use super::schema::TranscriptSchema;
use super::transcript::Transcript;
use crate::config::GenerationConfig;

pub use request::{
    ChatCompletionRequest, ChatMessage, ContentPart, ImageUrl, JsonSchemaFormat, ResponseFormat,
};
pub use response::ChatCompletionResponse;

/// Configuration for transcription requests
#[derive(Clone)]
pub struct TranscriptionConfig {
    /// The model to use
    pub model: TranscriptionModel,
    /// The API key for authentication
    pub api_key: String,
    /// Chat-completions URL
    pub endpoint: String,
    /// Prompt and sampling parameters
    pub generation: GenerationConfig,
}

impl TranscriptionConfig {
    /// Creates a new transcription configuration
    pub fn new(
        model: TranscriptionModel,
        api_key: String,
        endpoint: String,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            model,
            api_key,
            endpoint,
            generation,
        }
    }
}

impl std::fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Sends images to a vision model and returns structured transcripts.
#[derive(Debug)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    config: TranscriptionConfig,
    schema: TranscriptSchema,
}

impl TranscriptionClient {
    /// Creates a client with the schema it will attach to every request
    pub fn new(config: TranscriptionConfig, schema: TranscriptSchema) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            schema,
        }
    }

    /// Transcribes the image at `image_path`.
    ///
    /// # Errors
    /// - If the image file cannot be read from disk
    /// - If the API request fails due to network issues (connection, timeout)
    /// - If the API returns an HTTP error (401 for invalid key, 429 for rate limit, etc.)
    /// - If the response does not contain a transcript
    pub async fn transcribe(&self, image_path: &Path) -> Result<Transcript, TranscriptionError> {
        tracing::info!(
            "Transcribing {} with {} ({})",
            image_path.display(),
            self.config.model.provider().name(),
            self.config.model.api_model_name()
        );

        let b64_image = encode_image(image_path)?;
        let request = self.build_request(&b64_image);
        let response = self.send_request(&request).await?;
        Self::parse_transcript(&response)
    }

    /// Builds the chat-completion body for one base64-encoded image.
    pub fn build_request(&self, b64_image: &str) -> ChatCompletionRequest {
        let generation = &self.config.generation;
        let provider = self.config.model.provider();

        ChatCompletionRequest {
            model: self.config.model.api_model_name().to_string(),
            messages: vec![ChatMessage::user(vec![
                ContentPart::Text {
                    text: generation.prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url(b64_image),
                    },
                },
            ])],
            temperature: generation.temperature,
            max_completion_tokens: generation.max_completion_tokens,
            top_p: generation.top_p,
            stream: false,
            response_format: ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: self.schema.name().to_string(),
                    schema: self.schema.schema().clone(),
                    strict: provider.strict_schema(),
                },
            },
        }
    }

    /// POSTs the request once and decodes the response envelope.
    ///
    /// # Errors
    /// - `Network` if the request cannot be sent
    /// - `Api` if the server answers with a non-success status
    /// - `InvalidResponse` / `ResponseShape` if the body cannot be decoded
    pub async fn send_request(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TranscriptionError> {
        let provider_name = self.config.model.provider().name();
        let endpoint = &self.config.endpoint;

        tracing::debug!(
            "{} API Call:\n  URL: {}\n  Method: POST\n  Headers:\n    Authorization: Bearer <redacted>\n    Content-Type: application/json\n  Body parameters:\n    model={}\n    temperature={}\n    max_completion_tokens={}\n    top_p={}\n    response_format=json_schema({})",
            provider_name,
            endpoint,
            request.model,
            request.temperature,
            request.max_completion_tokens,
            request.top_p,
            self.schema.name()
        );

        let response = match self
            .http
            .post(endpoint)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let error_msg = if e.is_connect() {
                    format!("Failed to connect to {provider_name} API server. Check your internet connection.")
                } else if e.is_timeout() {
                    format!("Request to {provider_name} timed out. The API server is not responding.")
                } else if e.is_builder() {
                    format!("Failed to build {provider_name} API request: {e}. This may be a configuration error.")
                } else {
                    format!("{provider_name} network error: {e}")
                };
                return Err(TranscriptionError::Network(error_msg));
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TranscriptionError::Network(format!("Failed to read {provider_name} response: {e}"))
        })?;

        if !status.is_success() {
            let detail = response::error_detail(status, &body);
            let env_var = self.config.model.provider().api_key_env();

            let human_readable = match status.as_u16() {
                401 => format!("{provider_name} API key is invalid or expired. Check the {env_var} environment variable."),
                403 => format!("You don't have permission to use {provider_name}'s API. Check your API key and account status."),
                429 => format!("Too many requests to {provider_name}. You've hit the API rate limit. Please wait and try again."),
                500 | 502 | 503 | 504 => format!("{provider_name} API server is experiencing issues. Please try again later."),
                _ => format!("{provider_name} API error (status {status}): {detail}"),
            };

            tracing::error!("{provider_name} API returned {status}: {detail}");
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message: human_readable,
            });
        }

        let envelope = ChatCompletionResponse::from_json(&body)?;

        if let Some(usage) = &envelope.usage {
            tracing::debug!(
                "{} API Response:\n  Status: Success\n  Tokens: prompt={} completion={} total={}",
                provider_name,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(envelope)
    }

    /// Reads the transcript out of `choices[0].message.content`.
    ///
    /// # Errors
    /// - `ResponseShape` if the path is missing or the content is not a transcript
    pub fn parse_transcript(
        response: &ChatCompletionResponse,
    ) -> Result<Transcript, TranscriptionError> {
        let shape = |msg: String| TranscriptionError::ResponseShape(msg);

        let choices = response.choices.as_deref().ok_or_else(|| match &response.error {
            Some(error) => shape(format!("response has no `choices` (API error: {})", error.message)),
            None => shape("response has no `choices` field".to_string()),
        })?;
        let choice = choices
            .first()
            .ok_or_else(|| shape("`choices` is empty".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Completion stopped at max_completion_tokens; transcript may be truncated");
        }

        let message = choice
            .message
            .as_ref()
            .ok_or_else(|| shape("`choices[0]` has no `message`".to_string()))?;

        let content = match (&message.content, &message.refusal) {
            (Some(content), _) => content,
            (None, Some(refusal)) => return Err(shape(format!("model refused: {refusal}"))),
            (None, None) => return Err(shape("`choices[0].message` has no `content`".to_string())),
        };

        serde_json::from_str(content).map_err(|e| {
            shape(format!("`choices[0].message.content` is not a transcript: {e}"))
        })
    }
}

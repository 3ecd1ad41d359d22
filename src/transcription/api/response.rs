//! Chat-completion response envelope.
//!
//! Every field on the path to `choices[0].message.content` is optional so that a
//! reply with an unexpected shape still decodes and can be reported precisely.

use serde::Deserialize;

use crate::transcription::error::TranscriptionError;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Option<Vec<Choice>>,
    pub usage: Option<Usage>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// `{"error": {...}}` body returned by both providers on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

impl ChatCompletionResponse {
    /// Decodes a raw response body.
    ///
    /// # Errors
    /// - `InvalidResponse` if the body is not JSON
    /// - `ResponseShape` if it is JSON but does not fit the envelope types
    pub fn from_json(body: &str) -> Result<Self, TranscriptionError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| TranscriptionError::InvalidResponse(format!("body is not JSON: {e}")))?;
        serde_json::from_value(value).map_err(|e| TranscriptionError::ResponseShape(e.to_string()))
    }
}

/// Extracts the provider's error message from a failed response body, if present.
pub fn api_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ApiErrorBody,
    }

    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}

/// Longest raw body excerpt carried into a user-facing error
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Describes a failed response for the user.
///
/// Prefers the provider's `error.message`; otherwise an excerpt of the raw
/// body, or the status reason when the body is blank.
pub fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    if let Some(message) = api_error_message(body) {
        return message;
    }

    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    let mut excerpt: String = body.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    if body.chars().count() > MAX_ERROR_DETAIL_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_minimal_envelope() {
        let response = ChatCompletionResponse::from_json(
            r#"{"choices":[{"message":{"content":"{\"text\":\"hello\"}"}}]}"#,
        )
        .unwrap();

        let choices = response.choices.unwrap();
        assert_eq!(choices.len(), 1);
        assert_eq!(
            choices[0].message.as_ref().unwrap().content.as_deref(),
            Some(r#"{"text":"hello"}"#)
        );
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_non_json_body_is_invalid_response() {
        let err = ChatCompletionResponse::from_json("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidResponse(_)), "got: {err:?}");
    }

    #[test]
    fn test_wrong_types_are_shape_errors() {
        let err = ChatCompletionResponse::from_json(r#"{"choices":"nope"}"#).unwrap_err();
        assert!(matches!(err, TranscriptionError::ResponseShape(_)), "got: {err:?}");
    }

    #[test]
    fn test_error_detail_truncates_raw_bodies() {
        let page = format!("<html>{}</html>", "x".repeat(5000));
        let detail = error_detail(reqwest::StatusCode::BAD_GATEWAY, &page);
        assert!(detail.starts_with("<html>"));
        assert!(detail.ends_with("..."));
        assert_eq!(detail.chars().count(), MAX_ERROR_DETAIL_CHARS + 3);
    }

    #[test]
    fn test_error_detail_prefers_provider_message() {
        let body = r#"{"error":{"message":"image too large"}}"#;
        assert_eq!(
            error_detail(reqwest::StatusCode::BAD_REQUEST, body),
            "image too large"
        );
        assert_eq!(
            error_detail(reqwest::StatusCode::IM_A_TEAPOT, "  "),
            "I'm a teapot"
        );
        assert_eq!(error_detail(reqwest::StatusCode::BAD_REQUEST, "short"), "short");
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body).as_deref(), Some("model not found"));
        assert_eq!(api_error_message("not json"), None);
    }
}

//! # Gemini HTTP Client
//!
//! Thin wrapper around the Gemini `generateContent` REST endpoint.
//!
//! The client sends a single prompt and returns the first candidate's text.
//! There are no retries: a failed call is reported to the enrichment chain,
//! which substitutes a deterministic fallback instead.

use serde_json::Value;

/// Errors from the Gemini client layer.
#[derive(Debug)]
pub enum GeminiError {
    /// Cannot reach the API endpoint.
    ConnectionFailed(String),
    /// Non-success HTTP status from the API.
    HttpStatus(u16, String),
    /// The reply carried no candidates or no text part.
    EmptyReply,
    /// Failed to parse the response body.
    ParseError(String),
}

impl std::fmt::Display for GeminiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Cannot connect to Gemini: {msg}"),
            Self::HttpStatus(status, msg) => write!(f, "Gemini returned {status}: {msg}"),
            Self::EmptyReply => write!(f, "Gemini reply carried no text"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for GeminiError {}

// =============================================================================
// CLIENT
// =============================================================================

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client from connection settings.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a prompt and return the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key,
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeminiError::HttpStatus(status.as_u16(), text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GeminiError::ParseError(e.to_string()))?;

        extract_text(&payload).ok_or(GeminiError::EmptyReply)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a reply payload.
fn extract_text(payload: &Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

// =============================================================================
// TESTS
// =============================================================================

//! Gemini generation backend.
//!
//! Issues a single `generateContent` call per generation attempt against
//! the Google generative-language API. The API key travels as the `key`
//! query parameter, matching the upstream wire contract.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use idiom_core::IdiomRecord;

use super::traits::{GenerateError, IdiomGenerator};
use crate::extract;
use crate::languages::Language;
use crate::prompt;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Backend for the Gemini `generateContent` API.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiBackend {
    /// Create a backend with the default host and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            temperature: 0.9,
            max_output_tokens: 1024,
        }
    }

    /// Point the backend at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override generation parameters.
    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one prompt and return the first candidate's text.
    async fn send_prompt(
        &self,
        text: &str,
        max_output_tokens: u32,
    ) -> Result<String, GenerateError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Parse(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenerateError::EmptyResponse)?;

        Ok(text)
    }
}

/// Map a non-success HTTP status to the error taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> GenerateError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return GenerateError::Auth {
            status: status.as_u16(),
        };
    }

    // The API wraps failures in {"error": {"message": ...}} when it can
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_default();

    GenerateError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl IdiomGenerator for GeminiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, language: &Language) -> Result<IdiomRecord, GenerateError> {
        debug!(language = language.code, model = %self.model, "Requesting idiom generation");

        let text = self
            .send_prompt(&prompt::idiom_prompt(language), self.max_output_tokens)
            .await?;

        let record = extract::record_from_text(&text).map_err(|e| {
            warn!(language = language.code, error = %e, "Generated text failed extraction");
            e
        })?;

        debug!(
            fingerprint = %record.fingerprint(),
            idiom = %record.idiom,
            "Generated idiom record"
        );
        Ok(record)
    }

    async fn probe(&self) -> Result<(), GenerateError> {
        self.send_prompt(prompt::CONNECTION_TEST_PROMPT, 20)
            .await
            .map(|_| ())
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// `generateContent` response body (the parts we read).
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Error envelope on non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

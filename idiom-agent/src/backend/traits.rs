//! Core trait for idiom generator backends.

use async_trait::async_trait;

use idiom_core::IdiomRecord;

use crate::languages::Language;

/// Error types for a single generation attempt.
///
/// Every variant is terminal for the attempt: the supply layer converts all
/// of them into a "no idiom available" outcome, and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Credential rejected by the API (HTTP 401/403)
    #[error("Generation API rejected the credential (HTTP {status})")]
    Auth { status: u16 },

    /// Upstream failure other than an auth rejection
    #[error("Generation API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Successful response with no extractable candidate text
    #[error("Generation API returned no candidate text")]
    EmptyResponse,

    /// Candidate text did not contain a well-formed JSON object
    #[error("No JSON object in candidate text: {0}")]
    Parse(String),

    /// Parsed object missing a required idiom field
    #[error("Generated idiom is missing required field '{field}'")]
    Validation { field: &'static str },

    /// Transport-level failure (offline, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),
}

impl GenerateError {
    /// Short user-facing notice for this failure.
    ///
    /// Auth failures get specific, actionable wording; everything else maps
    /// to a generic notice with the upstream message when one exists.
    pub fn notice(&self) -> String {
        match self {
            GenerateError::Auth { .. } => {
                "Generation API key was rejected - check it in settings".to_string()
            }
            GenerateError::Api { message, .. } if !message.is_empty() => {
                format!("Couldn't fetch a new idiom: {message}")
            }
            _ => "Couldn't fetch a new idiom".to_string(),
        }
    }
}

/// A backend that produces one novel idiom record per call.
#[async_trait]
pub trait IdiomGenerator: Send + Sync {
    /// Backend identifier (e.g., model name).
    fn id(&self) -> &str;

    /// Generate one idiom record for the given target language.
    ///
    /// A single attempt: implementations issue exactly one request and map
    /// every failure into the [`GenerateError`] taxonomy.
    async fn generate(&self, language: &Language) -> Result<IdiomRecord, GenerateError>;

    /// Issue the minimal connection-test request.
    ///
    /// Used by the settings surface to verify a credential; must not touch
    /// any idiom state.
    async fn probe(&self) -> Result<(), GenerateError>;
}

//! Internal error types for Gemini operations.
//!
//! These errors are internal to `narrator-gemini` and are mapped to core port
//! errors at the boundary.

use thiserror::Error;

/// Result type alias for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors related to Gemini API operations.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The provider reported rate or usage limits (HTTP 429 or
    /// `RESOURCE_EXHAUSTED`).
    #[error("Gemini quota exhausted after {attempts} attempt(s): {message}")]
    QuotaExhausted {
        /// Number of attempts made before giving up
        attempts: u32,
        /// Message reported by the provider
        message: String,
    },

    /// API request failed with a non-quota HTTP error status.
    #[error("Gemini API request failed with status {status}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// Message reported by the provider, or the raw body
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from Gemini API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// No API key was configured.
    #[error("No Gemini API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl GeminiError {
    /// Whether this failure is a usage-limit error worth backing off for.
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExhausted { .. })
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

//! Public configuration for the Gemini client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Default endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for text-to-speech.
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default model for page analysis.
pub const DEFAULT_VISION_MODEL: &str = "gemini-3-flash-preview";

/// Default language for narration text.
pub const DEFAULT_LANGUAGE: &str = "Brazilian Portuguese (PT-BR)";

/// Configuration for the Gemini client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use narrator_gemini::GeminiClientConfig;
/// use std::time::Duration;
///
/// let config = GeminiClientConfig::new()
///     .with_api_key("secret")
///     .with_timeout(Duration::from_secs(90))
///     .with_language("English");
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// Base URL for the Gemini API
    pub(crate) base_url: String,
    /// API key sent as `x-goog-api-key`
    pub(crate) api_key: Option<String>,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Model used for speech synthesis
    pub(crate) speech_model: String,
    /// Model used for page analysis
    pub(crate) vision_model: String,
    /// Backoff for quota errors
    pub(crate) retry: RetryPolicy,
    /// Language the narration is written in
    pub(crate) language: String,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            user_agent: concat!("narrator-gemini/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(60),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            retry: RetryPolicy::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl GeminiClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the Gemini API.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an optional API key. Blank keys count as absent.
    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 60 seconds; analysis of a dense page can be slow.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the speech synthesis model.
    #[must_use]
    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    /// Set the page analysis model.
    #[must_use]
    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    /// Set the quota backoff policy.
    ///
    /// Defaults to 3 attempts starting at 1 second.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the narration language, as a phrase the model understands.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether an API key is present.
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

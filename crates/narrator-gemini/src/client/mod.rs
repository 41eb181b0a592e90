//! Gemini client for speech synthesis and page analysis.

mod speech;
mod vision;

use crate::config::GeminiClientConfig;
use crate::error::GeminiResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::GeminiConfig;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default Gemini client using the reqwest HTTP backend.
pub type DefaultGeminiClient = GeminiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the Gemini `generateContent` API.
///
/// Generic over an HTTP backend so tests can script responses. Use
/// `DefaultGeminiClient` in production, through the core ports. The client
/// holds no per-request state and is safe to share across tasks.
pub struct GeminiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: GeminiConfig,
}

impl DefaultGeminiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when no API key is configured or the base URL is invalid.
    pub fn new(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let internal = GeminiConfig::from_public(config)?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self {
            backend,
            config: internal,
        })
    }
}

impl<B: HttpBackend> GeminiClient<B> {
    /// Create a new client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: GeminiConfig, backend: B) -> Self {
        Self { backend, config }
    }
}

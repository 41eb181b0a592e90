//! HTTP backend abstraction for the Gemini API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. Retrying is not done here; the
//! backend only classifies failures so callers can decide.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::GeminiClientConfig;
use crate::error::{GeminiError, GeminiResult};
use crate::models::ApiErrorEnvelope;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can POST JSON and decode a JSON reply.
///
/// This is an implementation detail - external code should use the core
/// ports implemented by `DefaultGeminiClient`.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` to `url` and deserialize the response.
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> GeminiResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: String,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let api_key = config.api_key.clone().ok_or(GeminiError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> GeminiResult<T> {
        let response = self
            .client
            .post(url.as_str())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %url, "Gemini request failed");
        Err(classify_failure(status.as_u16(), &text))
    }
}

/// Turn a non-2xx response into an error, separating quota exhaustion.
pub fn classify_failure(status: u16, body: &str) -> GeminiError {
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let exhausted = status == 429
        || envelope
            .as_ref()
            .is_some_and(|e| e.error.status == "RESOURCE_EXHAUSTED");

    if exhausted {
        GeminiError::QuotaExhausted {
            attempts: 1,
            message,
        }
    } else {
        GeminiError::ApiRequestFailed { status, message }
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

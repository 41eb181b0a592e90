//! Internal API types for the Gemini `generateContent` endpoint.
//!
//! These types are internal to `narrator-gemini` and are not exposed to
//! consumers, who see only core domain types.

use serde::Deserialize;
use url::Url;

use crate::config::GeminiClientConfig;
use crate::error::GeminiResult;
use crate::retry::RetryPolicy;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration, validated from [`GeminiClientConfig`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    pub speech_model: String,
    pub vision_model: String,
    pub retry: RetryPolicy,
    pub language: String,
}

impl GeminiConfig {
    pub fn from_public(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&base)?,
            speech_model: config.speech_model.clone(),
            vision_model: config.vision_model.clone(),
            retry: config.retry,
            language: config.language.clone(),
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map_or(&[], |c| c.parts.as_slice())
    }

    /// First inline audio payload of the first candidate.
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .filter(|d| !d.data.is_empty())
    }

    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// Why the first candidate stopped, for diagnostics.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

/// Error envelope the API returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

/// One unit as the analysis model returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUnit {
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub combined_narrative: String,
    #[serde(default)]
    pub voice_preference: Option<String>,
}

//! Core port implementations for `GeminiClient`.
//!
//! Internal `GeminiError`s are mapped to the core's domain errors here; the
//! controller and shells never see HTTP details.

use async_trait::async_trait;
use narrator_core::ports::{NarrationError, NarrationPort, SpeechSynthesizerPort, SynthesisError};
use narrator_core::{NarrativeUnit, PageImage, Voice};

use crate::client::GeminiClient;
use crate::error::GeminiError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

fn to_synthesis_error(err: GeminiError) -> SynthesisError {
    match err {
        GeminiError::QuotaExhausted { attempts, message } => {
            SynthesisError::QuotaExhausted { attempts, message }
        }
        other => SynthesisError::Failed(other.to_string()),
    }
}

fn to_narration_error(err: GeminiError) -> NarrationError {
    match err {
        GeminiError::QuotaExhausted { message, .. } => NarrationError::QuotaExhausted(message),
        GeminiError::JsonParse(e) => NarrationError::Unreadable(e.to_string()),
        GeminiError::InvalidResponse { message } => NarrationError::Unreadable(message),
        other => NarrationError::Failed(other.to_string()),
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> SpeechSynthesizerPort for GeminiClient<B> {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<String, SynthesisError> {
        self.synthesize_speech(text, voice)
            .await
            .map_err(to_synthesis_error)
    }
}

#[async_trait]
impl<B: HttpBackend> NarrationPort for GeminiClient<B> {
    async fn analyze(
        &self,
        image: &PageImage,
        page_context: Option<&str>,
    ) -> Result<Vec<NarrativeUnit>, NarrationError> {
        let units = self
            .analyze_page(image, page_context)
            .await
            .map_err(to_narration_error)?;

        if units.is_empty() {
            return Err(NarrationError::Empty);
        }
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_config;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;

    #[test]
    fn test_quota_maps_to_port_quota() {
        let err = to_synthesis_error(GeminiError::QuotaExhausted {
            attempts: 3,
            message: "exhausted".to_string(),
        });
        assert!(matches!(err, SynthesisError::QuotaExhausted { attempts: 3, .. }));

        let err = to_narration_error(GeminiError::QuotaExhausted {
            attempts: 3,
            message: "exhausted".to_string(),
        });
        assert!(matches!(err, NarrationError::QuotaExhausted(_)));
    }

    #[test]
    fn test_http_failure_maps_to_failed() {
        let err = to_synthesis_error(GeminiError::ApiRequestFailed {
            status: 403,
            message: "denied".to_string(),
        });
        assert!(matches!(err, SynthesisError::Failed(ref m) if m.contains("denied")));
    }

    #[tokio::test]
    async fn test_empty_analysis_is_an_error() {
        let backend = FakeBackend::new().then(CannedResponse::Json(json!({
            "candidates": [{"content": {"parts": [{"text": "[]"}]}}]
        })));
        let client = GeminiClient::with_backend(test_config(), backend);
        let image = PageImage::new("image/jpeg", vec![0xff, 0xd8]).unwrap();

        let err = client.analyze(&image, None).await.unwrap_err();
        assert!(matches!(err, NarrationError::Empty));
    }

    #[tokio::test]
    async fn test_unparseable_analysis_is_unreadable() {
        let backend = FakeBackend::new().then(CannedResponse::Json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"oops\": true}"}]}}]
        })));
        let client = GeminiClient::with_backend(test_config(), backend);
        let image = PageImage::new("image/jpeg", vec![0xff, 0xd8]).unwrap();

        let err = client.analyze(&image, None).await.unwrap_err();
        assert!(matches!(err, NarrationError::Unreadable(_)));
        assert_eq!(
            err.user_message(),
            "The narrator lost track of the story. Please try again."
        );
    }
}

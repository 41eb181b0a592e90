//! Text-to-speech through `generateContent` with an audio response.

use narrator_core::Voice;
use serde_json::json;

use super::GeminiClient;
use crate::error::{GeminiError, GeminiResult};
use crate::http::HttpBackend;
use crate::models::GenerateContentResponse;
use crate::prompts::speech_prompt;
use crate::retry::with_backoff;
use crate::url::generate_content_url;

impl<B: HttpBackend> GeminiClient<B> {
    /// Synthesize `text` with a prebuilt voice.
    ///
    /// Returns the base64 payload exactly as the API sends it: raw 16-bit
    /// little-endian PCM, mono, 24 kHz. Quota errors are retried per the
    /// configured policy.
    pub async fn synthesize_speech(&self, text: &str, voice: Voice) -> GeminiResult<String> {
        let url = generate_content_url(&self.config, &self.config.speech_model)?;
        let body = json!({
            "contents": [{ "parts": [{ "text": speech_prompt(text) }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice.name() }
                    }
                }
            }
        });

        tracing::debug!(voice = voice.name(), chars = text.len(), "Requesting speech");

        let response: GenerateContentResponse = with_backoff(self.config.retry, "speech", || {
            self.backend.post_json::<GenerateContentResponse>(&url, &body)
        })
        .await?;

        response
            .inline_data()
            .map(|d| d.data.clone())
            .ok_or_else(|| {
                GeminiError::invalid_response(format!(
                    "response contained no audio (finish reason: {})",
                    response.finish_reason().unwrap_or("unknown")
                ))
            })
    }
}

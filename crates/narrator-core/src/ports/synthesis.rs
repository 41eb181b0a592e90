//! Speech synthesis port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Voice;

/// Errors returned by [`SpeechSynthesizerPort::synthesize`].
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    /// The provider kept reporting rate or usage limits until retries ran out.
    #[error("speech quota exhausted after {attempts} attempt(s): {message}")]
    QuotaExhausted {
        /// How many attempts were made in total.
        attempts: u32,
        /// Last message reported by the provider.
        message: String,
    },

    /// Any other failure (network, malformed response, missing audio).
    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Turns narration text into speech.
///
/// Implementations return standard base64 of raw PCM: 16-bit signed
/// little-endian, mono, at the provider's fixed sample rate. They must be
/// safe to call concurrently for overlapping requests.
///
/// # Design Rules
///
/// - Transient quota failures are retried inside the implementation
/// - Non-quota failures surface on the first attempt
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// Synthesize `text` with `voice`, returning base64-encoded PCM.
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<String, SynthesisError>;
}

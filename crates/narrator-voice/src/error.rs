//! Playback error types.

use crate::decoder::DecodeError;

/// Errors raised by audio output and decoding.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Failed to open the audio output stream.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// The dedicated audio thread exited or could not be spawned.
    #[error("Audio thread is not running")]
    AudioThreadDied,

    /// Synthesized audio could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

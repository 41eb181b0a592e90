//! Raw PCM decoding.
//!
//! The speech provider returns headerless 16-bit signed little-endian PCM.
//! Decoding is pure and deterministic: the same bytes always produce the
//! same buffer.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Errors raised while decoding synthesized audio.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload was not valid base64.
    #[error("audio payload is not valid base64: {0}")]
    Base64(String),

    /// 16-bit samples need an even number of bytes.
    #[error("PCM payload has an odd byte length ({0})")]
    OddLength(usize),

    /// A buffer needs at least one channel.
    #[error("channel count must be at least 1")]
    NoChannels,

    /// A buffer needs a non-zero sample rate.
    #[error("sample rate must be non-zero")]
    NoSampleRate,
}

/// Decoded audio, normalized to `[-1.0, 1.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples, `frames() * channels` long.
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Playback length at normal speed.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.frames() as f64 / f64::from(self.sample_rate);
        Duration::from_secs_f64(seconds)
    }

    /// De-interleaved samples of one channel.
    pub fn channel(&self, index: u16) -> Option<Vec<f32>> {
        if index >= self.channels {
            return None;
        }
        Some(
            self.samples
                .iter()
                .skip(usize::from(index))
                .step_by(usize::from(self.channels))
                .copied()
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decode interleaved 16-bit little-endian PCM.
///
/// Each sample is divided by 32768. A trailing partial frame (fewer
/// samples than `channels`) is dropped.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<AudioBuffer, DecodeError> {
    if channels == 0 {
        return Err(DecodeError::NoChannels);
    }
    if sample_rate == 0 {
        return Err(DecodeError::NoSampleRate);
    }
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength(bytes.len()));
    }

    let total = bytes.len() / 2;
    let usable = total - total % usize::from(channels);

    let samples = bytes
        .chunks_exact(2)
        .take(usable)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();

    Ok(AudioBuffer {
        sample_rate,
        channels,
        samples,
    })
}

/// Decode a standard base64 string, then its PCM content.
pub fn decode_base64_pcm(
    payload: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<AudioBuffer, DecodeError> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    decode_pcm16(&bytes, sample_rate, channels)
}

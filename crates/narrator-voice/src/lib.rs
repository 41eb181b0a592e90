#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

mod audio_thread;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod output;
mod playback;

pub use controller::{
    ControllerConfig, DEFAULT_ADVANCE_DELAY, PlaybackController, SPEECH_SAMPLE_RATE,
};
pub use decoder::{AudioBuffer, DecodeError, decode_base64_pcm, decode_pcm16};
pub use error::VoiceError;
pub use output::{AudioOutput, DeviceOutput, PlaybackDoneCallback};

// Silence unused dev-dependency warnings
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tokio_test as _;

#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use domain::{
    DEFAULT_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, NarrativeUnit, PageImage,
    PageImageError, PlaybackError, PlaybackErrorKind, PlaybackSnapshot, PlaybackStatus,
    PlaybackToken, SPEED_PRESETS, UnknownVoice, Voice, clamp_speed, effective_voice,
    mime_for_path,
};
pub use paths::{DATA_DIR_ENV, PathError, data_root};
pub use ports::{
    KeyValueStore, NarrationError, NarrationPort, SpeechSynthesizerPort, StorageError,
    SynthesisError,
};
pub use session::{SESSION_KEY, SaveOutcome, SessionStore, spawn_autosave};
pub use storage::{DEFAULT_QUOTA_BYTES, FileKeyValueStore, MemoryKeyValueStore};

#[cfg(test)]
use tokio_test as _;

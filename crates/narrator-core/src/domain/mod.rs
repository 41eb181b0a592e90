//! Domain types for narration and playback.
//!
//! These types are pure data: no I/O, no async, no adapter types.

mod page;
mod playback;
mod unit;
mod voice;

pub use page::{PageImage, PageImageError, mime_for_path};
pub use playback::{
    DEFAULT_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, PlaybackError,
    PlaybackErrorKind, PlaybackSnapshot, PlaybackStatus, PlaybackToken, SPEED_PRESETS,
    clamp_speed,
};
pub use unit::NarrativeUnit;
pub use voice::{UnknownVoice, Voice, effective_voice};

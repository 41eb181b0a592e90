//! Playback state shared between the controller, the session store and shells.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::unit::NarrativeUnit;
use super::voice::Voice;

/// Slowest playback rate accepted by the controller.
pub const MIN_PLAYBACK_SPEED: f32 = 0.5;

/// Fastest playback rate accepted by the controller.
pub const MAX_PLAYBACK_SPEED: f32 = 2.0;

/// Default playback rate.
pub const DEFAULT_PLAYBACK_SPEED: f32 = 1.0;

/// Speed presets offered to listeners, with their labels.
pub const SPEED_PRESETS: [(f32, &str); 5] = [
    (0.75, "slow"),
    (1.0, "normal"),
    (1.25, "brisk"),
    (1.5, "fast"),
    (2.0, "berserk"),
];

/// Clamp a requested rate into the accepted range.
///
/// Non-finite or non-positive requests fall back to the default rate.
pub fn clamp_speed(rate: f32) -> f32 {
    if !rate.is_finite() || rate <= 0.0 {
        return DEFAULT_PLAYBACK_SPEED;
    }
    rate.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED)
}

/// What the system is currently doing about the active unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// Synthesis or decoding in flight.
    Processing,
    /// Audio actively scheduled on the output.
    Playing,
    /// Explicitly halted by the listener.
    Paused,
    /// The last operation failed; see [`PlaybackSnapshot::error`].
    Error,
}

impl PlaybackStatus {
    /// Short announcement for screen readers.
    pub const fn announcement(self) -> &'static str {
        match self {
            Self::Idle => "Ready.",
            Self::Processing => "Preparing voice and interpretation...",
            Self::Playing => "Narrating.",
            Self::Paused => "Paused.",
            Self::Error => "Narration failed.",
        }
    }
}

/// Category of a playback failure.
///
/// Quota exhaustion is kept apart so shells can offer a remediation
/// (wait, switch key) instead of a plain retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackErrorKind {
    /// The speech provider's usage limit was hit and retries ran out.
    QuotaExhausted,
    /// Speech synthesis failed for another reason.
    Synthesis,
    /// The returned audio could not be decoded.
    Decode,
    /// The audio output device failed.
    Output,
}

/// A failure recorded on the snapshot when status is [`PlaybackStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackError {
    pub kind: PlaybackErrorKind,
    pub message: String,
}

impl PlaybackError {
    pub fn new(kind: PlaybackErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether the listener should be offered the quota remediation.
    pub const fn is_quota(&self) -> bool {
        matches!(self.kind, PlaybackErrorKind::QuotaExhausted)
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Identifies the current authoritative attempt to play some unit.
///
/// Tokens are issued in strictly increasing order for the lifetime of a
/// controller and are never persisted. A result may be applied only if
/// its token is still the latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaybackToken(pub u64);

impl fmt::Display for PlaybackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Full session state as observed by shells.
///
/// `units` sits behind an `Arc` so snapshots are cheap to publish on
/// every transition, even when units embed page images.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub units: Arc<[NarrativeUnit]>,
    pub current_index: usize,
    pub status: PlaybackStatus,
    pub playback_speed: f32,
    pub selected_voice: Option<Voice>,
    pub error: Option<PlaybackError>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            units: Arc::from(Vec::new()),
            current_index: 0,
            status: PlaybackStatus::Idle,
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            selected_voice: None,
            error: None,
        }
    }
}

impl PlaybackSnapshot {
    /// The unit at `current_index`, if any.
    pub fn current_unit(&self) -> Option<&NarrativeUnit> {
        self.units.get(self.current_index)
    }

    /// Whether a unit exists after the current one.
    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.units.len()
    }

    /// Whether a unit exists before the current one.
    pub const fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Whether the fields that get persisted differ between two snapshots.
    ///
    /// Units are compared by pointer: they are replaced wholesale, never
    /// edited in place.
    pub fn persisted_fields_differ(&self, other: &Self) -> bool {
        !Arc::ptr_eq(&self.units, &other.units)
            || self.current_index != other.current_index
            || self.playback_speed.to_bits() != other.playback_speed.to_bits()
            || self.selected_voice != other.selected_voice
    }
}

//! Session persistence: the last loaded units, position, speed and voice.
//!
//! The session is one JSON blob in a [`KeyValueStore`]. Status and error are
//! never persisted; a restored session always starts `Idle`.

mod autosave;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    DEFAULT_PLAYBACK_SPEED, NarrativeUnit, PlaybackSnapshot, PlaybackStatus, Voice, clamp_speed,
};
use crate::ports::{KeyValueStore, StorageError};

pub use autosave::spawn_autosave;

/// Storage key of the session blob.
pub const SESSION_KEY: &str = "manga-narrator.session";

/// What a [`SessionStore::save`] call ended up writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Units, index, speed and voice were all written.
    Full,
    /// The full blob did not fit; only speed and voice were kept.
    Degraded,
    /// Even the reduced blob did not fit; nothing was written.
    Skipped,
}

/// On-disk shape of the session blob.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    #[serde(default)]
    units: Vec<NarrativeUnit>,
    #[serde(default)]
    current_index: usize,
    #[serde(default = "default_speed")]
    playback_speed: f32,
    #[serde(default)]
    selected_voice: Option<Voice>,
}

const fn default_speed() -> f32 {
    DEFAULT_PLAYBACK_SPEED
}

impl PersistedSession {
    fn from_snapshot(snapshot: &PlaybackSnapshot) -> Self {
        Self {
            units: snapshot.units.to_vec(),
            current_index: snapshot.current_index,
            playback_speed: snapshot.playback_speed,
            selected_voice: snapshot.selected_voice,
        }
    }

    /// The form written when the full session exceeds storage capacity.
    fn degraded(snapshot: &PlaybackSnapshot) -> Self {
        Self {
            units: Vec::new(),
            current_index: 0,
            playback_speed: snapshot.playback_speed,
            selected_voice: snapshot.selected_voice,
        }
    }

    fn into_snapshot(self) -> PlaybackSnapshot {
        let current_index = match self.units.len() {
            0 => 0,
            len if self.current_index < len => self.current_index,
            len => {
                tracing::warn!(
                    index = self.current_index,
                    units = len,
                    "Persisted index out of range, starting from the first unit"
                );
                0
            }
        };

        PlaybackSnapshot {
            units: Arc::from(self.units),
            current_index,
            status: PlaybackStatus::Idle,
            playback_speed: clamp_speed(self.playback_speed),
            selected_voice: self.selected_voice,
            error: None,
        }
    }
}

/// Loads and saves the session blob through a [`KeyValueStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Restore the last session.
    ///
    /// Never fails: a missing, unreadable or malformed blob yields the
    /// default snapshot. Status is always `Idle` and the error is cleared.
    pub async fn load(&self) -> PlaybackSnapshot {
        let raw = match self.store.get(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return PlaybackSnapshot::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved session");
                return PlaybackSnapshot::default();
            }
        };

        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(persisted) => {
                let snapshot = persisted.into_snapshot();
                tracing::debug!(
                    units = snapshot.units.len(),
                    index = snapshot.current_index,
                    "Restored session"
                );
                snapshot
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding malformed saved session");
                PlaybackSnapshot::default()
            }
        }
    }

    /// Persist the snapshot's units, index, speed and voice.
    ///
    /// When the store reports its quota is exceeded the units are dropped and
    /// a reduced blob is written instead. Other storage failures propagate.
    pub async fn save(&self, snapshot: &PlaybackSnapshot) -> Result<SaveOutcome, StorageError> {
        let full = serde_json::to_string(&PersistedSession::from_snapshot(snapshot))?;
        match self.store.set(SESSION_KEY, &full).await {
            Ok(()) => return Ok(SaveOutcome::Full),
            Err(e) if e.is_quota() => {
                tracing::warn!(
                    error = %e,
                    units = snapshot.units.len(),
                    "Session too large to persist, saving preferences only"
                );
            }
            Err(e) => return Err(e),
        }

        let reduced = serde_json::to_string(&PersistedSession::degraded(snapshot))?;
        match self.store.set(SESSION_KEY, &reduced).await {
            Ok(()) => Ok(SaveOutcome::Degraded),
            Err(e) if e.is_quota() => {
                tracing::warn!(error = %e, "Reduced session still exceeds storage quota");
                Ok(SaveOutcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the saved session.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(SESSION_KEY).await
    }
}

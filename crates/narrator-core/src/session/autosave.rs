//! Background persistence driven by controller snapshots.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{SaveOutcome, SessionStore};
use crate::domain::PlaybackSnapshot;

/// Save the session whenever a persisted field changes.
///
/// Status-only transitions are ignored. The task ends when the sender side
/// of the watch channel is dropped, after a final save if anything changed
/// since the last write.
pub fn spawn_autosave(
    store: SessionStore,
    mut snapshots: watch::Receiver<PlaybackSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut saved = snapshots.borrow_and_update().clone();

        while snapshots.changed().await.is_ok() {
            let current = snapshots.borrow_and_update().clone();
            if !current.persisted_fields_differ(&saved) {
                continue;
            }

            match store.save(&current).await {
                Ok(SaveOutcome::Full) => {
                    tracing::trace!(index = current.current_index, "Session saved");
                }
                Ok(outcome) => {
                    tracing::debug!(?outcome, "Session saved without units");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to save session");
                }
            }
            saved = current;
        }

        tracing::debug!("Autosave stopped");
    })
}

//! Playback request tokens.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use narrator_core::PlaybackToken;

/// Issues strictly increasing [`PlaybackToken`]s and answers whether a
/// token is still the latest.
///
/// Clones share the counter, so spawned synthesis tasks can drop stale
/// results before they ever reach the controller.
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer {
    latest: Arc<AtomicU64>,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, invalidating every earlier one.
    pub fn issue(&self) -> PlaybackToken {
        PlaybackToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` is still authoritative.
    pub fn is_current(&self, token: PlaybackToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

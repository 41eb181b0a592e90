//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure: the generative AI provider and persistent storage.
//!
//! # Design Rules
//!
//! - No HTTP, audio-device or filesystem types in any signature
//! - Errors are domain-level and distinguish quota exhaustion from other failures

pub mod narration;
pub mod storage;
pub mod synthesis;

pub use narration::{NarrationError, NarrationPort};
pub use storage::{KeyValueStore, StorageError};
pub use synthesis::{SpeechSynthesizerPort, SynthesisError};

#[cfg(test)]
pub use storage::MockKeyValueStore;

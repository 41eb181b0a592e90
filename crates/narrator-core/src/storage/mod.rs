//! [`KeyValueStore`](crate::ports::KeyValueStore) adapters.

mod file;
mod memory;

pub use file::{DEFAULT_QUOTA_BYTES, FileKeyValueStore};
pub use memory::MemoryKeyValueStore;

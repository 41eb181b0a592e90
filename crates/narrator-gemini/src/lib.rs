#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]
// DefaultGeminiClient is meant to be used through the core ports, not its
// internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod port;
mod prompts;
mod retry;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultGeminiClient;

// Configuration
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_SPEECH_MODEL, DEFAULT_VISION_MODEL,
    GeminiClientConfig,
};
pub use retry::RetryPolicy;

// Errors surfaced by construction
pub use error::GeminiError;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

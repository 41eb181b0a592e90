//! CLI-specific error types and exit codes.

use narrator_core::{NarrationError, PageImageError, PathError, StorageError};
use narrator_gemini::GeminiError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// No API key in the flags or the environment.
    #[error("No Gemini API key. Set GEMINI_API_KEY or pass --api-key.")]
    MissingApiKey,

    /// The page image could not be used.
    #[error("{0}")]
    Image(String),

    /// Page analysis failed; the message is already listener-facing.
    #[error("{0}")]
    Narration(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Terminal or other IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to a sysexits-style exit code.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingApiKey | Self::Config(_) => 78, // EX_CONFIG
            Self::Image(_) => 66,                        // EX_NOINPUT
            Self::Narration(_) => 69,                    // EX_UNAVAILABLE
            Self::Storage(_) => 73,                      // EX_CANTCREAT
            Self::Io(_) => 74,                           // EX_IOERR
        }
    }
}

impl From<PageImageError> for CliError {
    fn from(err: PageImageError) -> Self {
        Self::Image(err.to_string())
    }
}

impl From<NarrationError> for CliError {
    fn from(err: NarrationError) -> Self {
        Self::Narration(err.user_message().to_string())
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<GeminiError> for CliError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingApiKey => Self::MissingApiKey,
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

//! Page analysis port: one image in, an ordered list of units out.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NarrativeUnit, PageImage};

/// Errors returned by [`NarrationPort::analyze`].
#[derive(Debug, Clone, Error)]
pub enum NarrationError {
    /// Provider usage limits were hit and retries ran out.
    #[error("analysis quota exhausted: {0}")]
    QuotaExhausted(String),

    /// The model answered, but the answer could not be read as units.
    #[error("unreadable analysis: {0}")]
    Unreadable(String),

    /// The page produced no units at all.
    #[error("the page produced no narration")]
    Empty,

    /// Any other failure (network, HTTP status).
    #[error("analysis failed: {0}")]
    Failed(String),
}

impl NarrationError {
    /// Single message suitable for showing or speaking to the listener.
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::QuotaExhausted(_) => {
                "The narration service is over its usage limit. Wait a moment or use another API key."
            }
            Self::Unreadable(_) => "The narrator lost track of the story. Please try again.",
            Self::Empty => "No panels or dialogue were found on this page.",
            Self::Failed(_) => "Failed to process the image. Please try again.",
        }
    }
}

/// Turns a page image into narration units.
///
/// Results are all-or-nothing: an implementation never returns a partial
/// list.
#[async_trait]
pub trait NarrationPort: Send + Sync {
    /// Analyze one page. `page_context` optionally describes what came before.
    async fn analyze(
        &self,
        image: &PageImage,
        page_context: Option<&str>,
    ) -> Result<Vec<NarrativeUnit>, NarrationError>;
}

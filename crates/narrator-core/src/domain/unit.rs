//! Narrative units produced by page analysis.

use serde::{Deserialize, Serialize};

use super::voice::Voice;

/// One discrete panel or segment of a page, with its own spoken line.
///
/// Units are immutable once the narration pipeline produces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeUnit {
    /// Opaque unique identifier.
    pub id: String,

    /// Verbatim dialogue from the panel; empty when the panel has none.
    #[serde(default)]
    pub original_text: String,

    /// Description of the scene.
    #[serde(default)]
    pub description: String,

    /// The line that is actually spoken.
    pub combined_narrative: String,

    /// Voice the analysis cast for this unit.
    #[serde(default)]
    pub voice_preference: Option<Voice>,

    /// Reference to the source page image, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NarrativeUnit {
    /// Create a unit carrying only the narrative line.
    pub fn new(id: impl Into<String>, combined_narrative: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_text: String::new(),
            description: String::new(),
            combined_narrative: combined_narrative.into(),
            voice_preference: None,
            image_url: None,
        }
    }

    /// Set the voice the analysis cast for this unit.
    #[must_use]
    pub const fn with_voice(mut self, voice: Voice) -> Self {
        self.voice_preference = Some(voice);
        self
    }

    /// Whether the panel carries dialogue, as opposed to description only.
    pub fn has_dialogue(&self) -> bool {
        !self.original_text.trim().is_empty()
    }
}

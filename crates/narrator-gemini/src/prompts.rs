//! Prompt text and response schema sent to the models.

use narrator_core::Voice;
use serde_json::{Value, json};

/// Style direction prepended to every line sent for synthesis.
pub const SPEECH_DIRECTION: &str = "Perform this text with emotion and cinematic rhythm";

/// Text part of a speech request.
pub fn speech_prompt(text: &str) -> String {
    format!("{SPEECH_DIRECTION}: {}", text.trim())
}

/// Instruction that turns a page into an audio-drama script.
pub fn narration_prompt(language: &str, page_context: Option<&str>) -> String {
    let casting: String = Voice::ALL
        .iter()
        .map(|v| format!("   - '{}': {}.\n", v.name(), v.archetype()))
        .collect();

    let mut prompt = format!(
        "Act as a dubbing director and master storyteller. Turn this manga page into an \
         immersive audio experience for blind and low-vision listeners.\n\
         \n\
         GOLDEN RULES:\n\
         1. IDENTIFICATION: Identify the gender, age and tone of every character.\n\
         2. VOICE CASTING (MANDATORY):\n\
         {casting}\
         3. NO TECHNICAL LANGUAGE: Never say \"panel\", \"frame\", \"in the image\" or \
         \"it is written\". Narrate the scene like a living audiobook.\n\
         4. TEXT: Write everything in {language}.\n\
         5. ORDER: Follow the page's reading order, one entry per panel or beat.\n"
    );

    if let Some(context) = page_context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str("\nStory so far, for continuity (do not narrate it again):\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nReturn a JSON array whose items have: originalText, description, \
         combinedNarrative, voicePreference.",
    );
    prompt
}

/// JSON schema the analysis model must follow.
pub fn narration_schema() -> Value {
    let voices: Vec<&str> = Voice::ALL.iter().map(|v| v.name()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "originalText": { "type": "STRING" },
                "description": { "type": "STRING" },
                "combinedNarrative": { "type": "STRING" },
                "voicePreference": { "type": "STRING", "enum": voices }
            },
            "required": ["originalText", "description", "combinedNarrative", "voicePreference"]
        }
    })
}

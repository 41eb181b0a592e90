//! Page analysis: one image in, ordered narration units out.

use narrator_core::{NarrativeUnit, PageImage, Voice};
use serde_json::json;

use super::GeminiClient;
use crate::error::{GeminiError, GeminiResult};
use crate::http::HttpBackend;
use crate::models::{GenerateContentResponse, RawUnit};
use crate::prompts::{narration_prompt, narration_schema};
use crate::retry::with_backoff;
use crate::url::generate_content_url;

impl<B: HttpBackend> GeminiClient<B> {
    /// Analyze a page image into narration units, in reading order.
    ///
    /// An empty list means the model found nothing to narrate. Every unit
    /// gets an id of the form `unit-<epoch-ms>-<index>` and the page's
    /// `data:` URL as its image reference.
    pub async fn analyze_page(
        &self,
        image: &PageImage,
        page_context: Option<&str>,
    ) -> GeminiResult<Vec<NarrativeUnit>> {
        let url = generate_content_url(&self.config, &self.config.vision_model)?;
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime_type, "data": image.to_base64() } },
                    { "text": narration_prompt(&self.config.language, page_context) }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": narration_schema()
            }
        });

        tracing::debug!(
            mime = %image.mime_type,
            bytes = image.data.len(),
            has_context = page_context.is_some(),
            "Requesting page analysis"
        );

        let response: GenerateContentResponse = with_backoff(self.config.retry, "analysis", || {
            self.backend
                .post_json::<GenerateContentResponse>(&url, &body)
        })
        .await?;

        let text = response.text().ok_or_else(|| {
            GeminiError::invalid_response(format!(
                "analysis returned no text (finish reason: {})",
                response.finish_reason().unwrap_or("unknown")
            ))
        })?;

        let raw: Vec<RawUnit> = serde_json::from_str(strip_code_fence(&text))?;
        let stamp = chrono::Utc::now().timestamp_millis();
        let image_url = image.data_url();

        let units: Vec<NarrativeUnit> = raw
            .into_iter()
            .filter_map(into_narration)
            .enumerate()
            .map(|(index, mut unit)| {
                unit.id = format!("unit-{stamp}-{index}");
                unit.image_url = Some(image_url.clone());
                unit
            })
            .collect();

        tracing::info!(units = units.len(), "Page analyzed");
        Ok(units)
    }
}

/// Convert one raw item; items with nothing to say are dropped.
fn into_narration(raw: RawUnit) -> Option<NarrativeUnit> {
    let narrative = if raw.combined_narrative.trim().is_empty() {
        raw.description.trim().to_string()
    } else {
        raw.combined_narrative.trim().to_string()
    };
    if narrative.is_empty() {
        tracing::debug!("Dropping analysis item without narration");
        return None;
    }

    let voice_preference = raw
        .voice_preference
        .as_deref()
        .and_then(|name| match name.parse::<Voice>() {
            Ok(voice) => Some(voice),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unknown voice in analysis");
                None
            }
        });

    Some(NarrativeUnit {
        id: String::new(),
        original_text: raw.original_text,
        description: raw.description,
        combined_narrative: narrative,
        voice_preference,
        image_url: None,
    })
}

/// Models occasionally wrap JSON in a Markdown fence despite the MIME type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

//! URL construction for the `generateContent` endpoint.

use url::Url;

use crate::error::GeminiResult;
use crate::models::GeminiConfig;

/// `{base}/models/{model}:generateContent`.
pub fn generate_content_url(config: &GeminiConfig, model: &str) -> GeminiResult<Url> {
    let model = model.trim().trim_start_matches("models/");
    Ok(config
        .base_url
        .join(&format!("models/{model}:generateContent"))?)
}

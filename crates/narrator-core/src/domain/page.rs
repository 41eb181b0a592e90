//! Page images handed to the narration pipeline.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// A single page image in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// MIME type, always `image/*`.
    pub mime_type: String,
    /// Raw encoded image bytes.
    pub data: Vec<u8>,
}

/// Errors raised when building a [`PageImage`].
#[derive(Debug, Error)]
pub enum PageImageError {
    /// The file extension does not name a supported image type.
    #[error("'{0}' is not a supported image (expected jpg, jpeg, png, webp or gif)")]
    UnsupportedType(String),

    /// The image contains no bytes.
    #[error("image is empty")]
    Empty,

    /// Reading the file failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

impl PageImage {
    /// Wrap raw bytes with an explicit MIME type.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Result<Self, PageImageError> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(PageImageError::UnsupportedType(mime_type));
        }
        if data.is_empty() {
            return Err(PageImageError::Empty);
        }
        Ok(Self { mime_type, data })
    }

    /// Load an image file, inferring the MIME type from its extension.
    pub async fn from_path(path: &Path) -> Result<Self, PageImageError> {
        let mime_type = mime_for_path(path)?;
        let data = tokio::fs::read(path).await?;
        Self::new(mime_type, data)
    }

    /// Standard base64 encoding of the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL used as the display reference on each unit.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Map a file extension to an image MIME type.
pub fn mime_for_path(path: &Path) -> Result<&'static str, PageImageError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => Err(PageImageError::UnsupportedType(path.display().to_string())),
    }
}

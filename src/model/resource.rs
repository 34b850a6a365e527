//! Loaded image resources.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Images resolved for one export call, keyed by the exact URL text.
pub type ImageMap = HashMap<String, Arc<LoadedImage>>;

/// A fetched and decoded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedImage {
    /// URL the image was fetched from (map key)
    pub url: String,

    /// Raw binary data, in a format a word processor can embed
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// Natural width in pixels
    pub width: u32,

    /// Natural height in pixels
    pub height: u32,
}

impl LoadedImage {
    /// Create a new loaded image.
    pub fn new(
        url: impl Into<String>,
        data: Vec<u8>,
        mime_type: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            url: url.into(),
            data,
            mime_type: mime_type.into(),
            width,
            height,
        }
    }

    /// Get a suggested media filename for the given index.
    pub fn suggested_filename(&self, index: usize) -> String {
        format!("image{}.{}", index, self.extension())
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpeg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            _ => "bin",
        }
    }

    /// Check whether a MIME type can be embedded in a DOCX package as-is.
    pub fn is_embeddable(mime_type: &str) -> bool {
        matches!(
            mime_type,
            "image/jpeg" | "image/png" | "image/gif" | "image/bmp"
        )
    }
}

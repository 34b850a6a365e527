//! Span-level types produced by line segmentation.

use super::LoadedImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One occurrence of `![alt](url)` markup in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Alternative text between the brackets
    pub alt_text: String,

    /// URL between the parentheses, verbatim
    pub url: String,

    /// Byte offset of the `!` in the source text
    pub source_offset: usize,
}

/// An atomic fragment of one markdown line.
#[derive(Debug, Clone)]
pub enum Span {
    /// Literal text, verbatim
    Text {
        /// Text content
        content: String,
    },

    /// An image reference
    Image {
        /// Alternative text
        alt_text: String,
        /// URL as written in the markup
        url: String,
        /// Resolved image, `None` if fetching or decoding failed
        resolved: Option<Arc<LoadedImage>>,
    },
}

impl Span {
    /// Create a text span.
    pub fn text(content: impl Into<String>) -> Self {
        Span::Text {
            content: content.into(),
        }
    }

    /// Check if this is an image span.
    pub fn is_image(&self) -> bool {
        matches!(self, Span::Image { .. })
    }

    /// Get the resolved image, if any.
    pub fn resolved(&self) -> Option<&Arc<LoadedImage>> {
        match self {
            Span::Image { resolved, .. } => resolved.as_ref(),
            Span::Text { .. } => None,
        }
    }

    /// The source text this span was cut from.
    pub fn markup(&self) -> String {
        match self {
            Span::Text { content } => content.clone(),
            Span::Image { alt_text, url, .. } => format!("![{}]({})", alt_text, url),
        }
    }
}

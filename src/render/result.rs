//! Export statistics.

use serde::{Deserialize, Serialize};

/// Statistics collected while assembling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Number of paragraphs (input lines)
    pub paragraph_count: u32,

    /// Number of image references encountered
    pub image_count: u32,

    /// Number of images embedded successfully
    pub embedded_image_count: u32,

    /// Number of images replaced by a fallback marker
    pub missing_image_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Record an image that was embedded.
    pub fn add_embedded_image(&mut self) {
        self.image_count += 1;
        self.embedded_image_count += 1;
    }

    /// Record an image that fell back to a marker.
    pub fn add_missing_image(&mut self) {
        self.image_count += 1;
        self.missing_image_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

}

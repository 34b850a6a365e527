//! Document-level types.

use super::Paragraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An assembled document ready for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, creation time)
    pub metadata: Metadata,

    /// Paragraphs in input line order
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            paragraphs: Vec::new(),
        }
    }

    /// Get the number of paragraphs in the document.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Add a paragraph to the document.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Check if the document has no paragraphs at all.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Get plain text content of the entire document, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata written into the package properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Creator application
    pub creator: String,

    /// Creation date
    pub created: DateTime<Utc>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: None,
            creator: format!("penpolish {}", env!("CARGO_PKG_VERSION")),
            created: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.paragraph_count(), 0);
        assert!(doc.metadata.creator.starts_with("penpolish"));
    }

    #[test]
    fn test_plain_text_keeps_blank_lines() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("first"));
        doc.add_paragraph(Paragraph::new());
        doc.add_paragraph(Paragraph::with_text("third"));

        assert_eq!(doc.plain_text(), "first\n\nthird");
    }

    #[test]
    fn test_metadata_with_title() {
        let meta = Metadata::with_title("Draft");
        assert_eq!(meta.title.as_deref(), Some("Draft"));
    }
}

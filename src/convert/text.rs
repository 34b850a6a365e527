//! Plain text writer.

use super::DocumentWriter;
use crate::error::Result;
use crate::model::Document;
use crate::render::to_text;

/// Writes documents as UTF-8 plain text.
#[derive(Debug, Clone, Default)]
pub struct TextWriter {
    _private: (),
}

impl TextWriter {
    /// Create a new text writer.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentWriter for TextWriter {
    fn extension(&self) -> &str {
        "txt"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn name(&self) -> &str {
        "text"
    }

    fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        Ok(to_text(doc).into_bytes())
    }
}

//! JSON writer.

use super::DocumentWriter;
use crate::error::Result;
use crate::model::Document;
use crate::render::{to_json, JsonFormat};

/// Writes the document model as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    format: JsonFormat,
}

impl JsonWriter {
    /// Create a new JSON writer producing pretty-printed output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce compact output instead.
    pub fn compact() -> Self {
        Self {
            format: JsonFormat::Compact,
        }
    }
}

impl DocumentWriter for JsonWriter {
    fn extension(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn name(&self) -> &str {
        "json"
    }

    fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        Ok(to_json(doc, self.format)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    #[test]
    fn test_compact_has_no_newlines() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("a"));

        let bytes = JsonWriter::compact().write(&doc).unwrap();
        assert!(!bytes.contains(&b'\n'));
    }
}

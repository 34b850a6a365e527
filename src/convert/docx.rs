//! DOCX writer.

use super::DocumentWriter;
use crate::error::Result;
use crate::model::Document;
use crate::render::{to_docx, DOCX_MIME_TYPE};

/// Writes documents as Office Open XML word processing packages.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    _private: (),
}

impl DocxWriter {
    /// Create a new DOCX writer.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentWriter for DocxWriter {
    fn extension(&self) -> &str {
        "docx"
    }

    fn mime_type(&self) -> &'static str {
        DOCX_MIME_TYPE
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        to_docx(doc)
    }
}

//! Rendering module: document assembly and output formats.

mod assemble;
mod cleanup;
mod docx;
mod json;
mod options;
mod result;
mod text;

pub use assemble::{assemble, assemble_line, assemble_with_stats};
pub use cleanup::{escape_xml, normalize_nfc, strip_invalid_xml_chars};
pub use docx::{to_docx, write_docx, DOCX_MIME_TYPE};
pub use json::{to_json, JsonFormat};
pub use options::{ExportFormat, ExportOptions, DEFAULT_MAX_IMAGE_WIDTH};
pub use result::ExportStats;
pub use text::to_text;

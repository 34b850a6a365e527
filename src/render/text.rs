//! Plain text rendering for assembled documents.

use crate::model::Document;

/// Convert a document to plain text, one newline-terminated line per
/// paragraph.
///
/// Images are written as `[Image: alt]`.
pub fn to_text(doc: &Document) -> String {
    let mut output = String::new();
    for paragraph in &doc.paragraphs {
        output.push_str(&paragraph.plain_text());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Paragraph;

    #[test]
    fn test_to_text() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Hello, world!"));
        doc.add_paragraph(Paragraph::new());
        doc.add_paragraph(Paragraph::with_text("Second paragraph."));

        let result = to_text(&doc);
        assert_eq!(result, "Hello, world!\n\nSecond paragraph.\n");
    }

    #[test]
    fn test_trailing_empty_paragraph_is_kept() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("last"));
        doc.add_paragraph(Paragraph::new());

        assert_eq!(to_text(&doc), "last\n\n");
    }
}

//! Text cleanup applied before text reaches an output format.

use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

/// Normalize text to Unicode NFC form.
pub fn normalize_nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Check whether a character may appear in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Drop characters that are not allowed in XML 1.0.
pub fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

/// Escape text for use in XML content or attribute values.
///
/// Characters not allowed in XML 1.0 are dropped.
pub fn escape_xml(text: &str) -> String {
    let clean = strip_invalid_xml_chars(text);
    let mut out = String::with_capacity(clean.len());
    for c in clean.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

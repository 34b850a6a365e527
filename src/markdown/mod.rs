//! Line segmentation for markdown text.
//!
//! Splits each line of an article into literal text and `![alt](url)` image
//! spans. Only image markup is recognized; everything else (headings,
//! emphasis, links) is carried through as literal text.
//!
//! # Example
//!
//! ```
//! use penpolish::markdown::{reconstruct_line, segment_line};
//! use penpolish::model::ImageMap;
//!
//! let line = "Hello ![x](http://example.com/a.png) World";
//! let spans = segment_line(line, &ImageMap::new());
//! assert_eq!(spans.len(), 3);
//! assert_eq!(reconstruct_line(&spans), line);
//! ```

use crate::model::{ImageMap, ImageReference, Span};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Pattern for inline image markup: `![alt](url)`.
pub const IMAGE_PATTERN: &str = r"!\[([^\]]*)\]\(([^)]+)\)";

fn image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IMAGE_PATTERN).expect("image pattern is a valid regex"))
}

/// Split text into lines on `\n`, dropping a trailing `\r` from each.
///
/// Empty input yields a single empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Find every image reference in the text, in source order.
pub fn find_image_references(text: &str) -> Vec<ImageReference> {
    let mut refs = Vec::new();
    let mut line_start = 0;

    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        for caps in image_regex().captures_iter(line) {
            let (Some(whole), Some(alt), Some(url)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            refs.push(ImageReference {
                alt_text: alt.as_str().to_string(),
                url: url.as_str().to_string(),
                source_offset: line_start + whole.start(),
            });
        }
        line_start += raw.len() + 1;
    }

    refs
}

/// Distinct URLs of the given references, in first-seen order.
pub fn unique_urls(refs: &[ImageReference]) -> Vec<&str> {
    let mut seen = HashSet::new();
    refs.iter()
        .map(|r| r.url.as_str())
        .filter(|url| seen.insert(*url))
        .collect()
}

/// Split one line into text and image spans.
///
/// Image spans are resolved against `images` by exact URL. A line without
/// image markup yields exactly one text span holding the whole line, even
/// when the line is empty.
pub fn segment_line(line: &str, images: &ImageMap) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in image_regex().captures_iter(line) {
        let (Some(whole), Some(alt), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };

        if whole.start() > last {
            spans.push(Span::text(&line[last..whole.start()]));
        }

        spans.push(Span::Image {
            alt_text: alt.as_str().to_string(),
            url: url.as_str().to_string(),
            resolved: images.get(url.as_str()).cloned(),
        });

        last = whole.end();
    }

    if spans.is_empty() {
        return vec![Span::text(line)];
    }

    if last < line.len() {
        spans.push(Span::text(&line[last..]));
    }

    spans
}

/// Rebuild the source line from its spans.
pub fn reconstruct_line(spans: &[Span]) -> String {
    spans.iter().map(Span::markup).collect()
}

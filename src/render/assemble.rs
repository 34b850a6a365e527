//! Document assembly: spans to paragraphs of runs.

use super::cleanup::normalize_nfc;
use super::{ExportOptions, ExportStats};
use crate::markdown::{segment_line, split_lines};
use crate::model::{Document, ImageMap, ImageRun, Metadata, Paragraph, Run, Span, TextRun};

/// Assemble a document from markdown text and resolved images.
///
/// Produces exactly one paragraph per input line, blank lines included.
pub fn assemble(markdown: &str, images: &ImageMap, options: &ExportOptions) -> Document {
    assemble_with_stats(markdown, images, options).0
}

/// Assemble a document and collect statistics along the way.
pub fn assemble_with_stats(
    markdown: &str,
    images: &ImageMap,
    options: &ExportOptions,
) -> (Document, ExportStats) {
    let mut doc = Document::new();
    doc.metadata = match &options.title {
        Some(title) => Metadata::with_title(title.clone()),
        None => Metadata::default(),
    };

    let mut stats = ExportStats::new();
    for line in split_lines(markdown) {
        let spans = segment_line(line, images);
        doc.add_paragraph(assemble_line(&spans, options, &mut stats));
    }

    log::debug!(
        "Assembled {} paragraph(s), {} image(s) embedded, {} missing",
        stats.paragraph_count,
        stats.embedded_image_count,
        stats.missing_image_count
    );

    (doc, stats)
}

/// Convert one line's spans into a paragraph.
pub fn assemble_line(spans: &[Span], options: &ExportOptions, stats: &mut ExportStats) -> Paragraph {
    let mut paragraph = Paragraph::new().with_spacing_after(options.paragraph_spacing_after);
    let size = options.font_size_half_points;

    for span in spans {
        match span {
            Span::Text { content } => {
                if content.is_empty() {
                    continue;
                }
                stats.count_text(content);
                let text = if options.normalize_unicode {
                    normalize_nfc(content)
                } else {
                    content.clone()
                };
                paragraph.add_run(Run::Text(TextRun::sized(text, size)));
            }
            Span::Image {
                alt_text,
                resolved: Some(image),
                ..
            } => {
                stats.add_embedded_image();
                paragraph.add_run(Run::Image(ImageRun::fitted(
                    image.clone(),
                    alt_text.clone(),
                    options.max_image_width,
                )));
            }
            Span::Image {
                alt_text,
                resolved: None,
                ..
            } => {
                stats.add_missing_image();
                paragraph.add_run(Run::Text(TextRun::fallback(alt_text, size)));
            }
        }
    }

    stats.add_paragraph();
    paragraph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoadedImage;
    use std::sync::Arc;

    fn image_map(entries: &[(&str, u32, u32)]) -> ImageMap {
        entries
            .iter()
            .map(|(url, w, h)| {
                (
                    url.to_string(),
                    Arc::new(LoadedImage::new(*url, vec![0], "image/png", *w, *h)),
                )
            })
            .collect()
    }

    fn text_of(run: &Run) -> &str {
        match run {
            Run::Text(t) => &t.text,
            Run::Image(_) => panic!("expected text run"),
        }
    }

    #[test]
    fn test_empty_input_is_one_empty_paragraph() {
        let doc = assemble("", &ImageMap::new(), &ExportOptions::default());
        assert_eq!(doc.paragraph_count(), 1);
        assert!(doc.paragraphs[0].is_empty());
        assert!(doc.paragraphs[0].runs.is_empty());
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let doc = assemble("one\n\n\nfour", &ImageMap::new(), &ExportOptions::default());
        assert_eq!(doc.paragraph_count(), 4);
        assert!(doc.paragraphs[1].is_empty());
        assert!(doc.paragraphs[2].is_empty());
        assert_eq!(doc.paragraphs[3].plain_text(), "four");
    }

    #[test]
    fn test_failed_image_becomes_fallback() {
        let doc = assemble(
            "Hello ![x](http://bad.url/a.png) World",
            &ImageMap::new(),
            &ExportOptions::default(),
        );
        assert_eq!(doc.paragraph_count(), 1);

        let runs = &doc.paragraphs[0].runs;
        assert_eq!(runs.len(), 3);
        assert_eq!(text_of(&runs[0]), "Hello ");
        assert!(runs[1].is_fallback());
        assert!(text_of(&runs[1]).contains('x'));
        assert_eq!(text_of(&runs[2]), " World");
    }

    #[test]
    fn test_wide_image_is_scaled() {
        let images = image_map(&[("wide.png", 1100, 600), ("small.png", 200, 100)]);
        let doc = assemble(
            "![w](wide.png)\n![s](small.png)",
            &images,
            &ExportOptions::default(),
        );

        let wide: Vec<_> = doc.paragraphs[0].images().collect();
        assert_eq!(wide[0].width, 550.0);
        assert!((wide[0].height - 300.0).abs() < 1e-9);
        assert_eq!(wide[0].alt_text, "w");

        let small: Vec<_> = doc.paragraphs[1].images().collect();
        assert_eq!((small[0].width, small[0].height), (200.0, 100.0));
    }

    #[test]
    fn test_text_runs_use_configured_size_and_spacing() {
        let options = ExportOptions::new()
            .with_font_size(28)
            .with_paragraph_spacing(240);
        let doc = assemble("abc", &ImageMap::new(), &options);

        let p = &doc.paragraphs[0];
        assert_eq!(p.spacing_after, 240);
        match &p.runs[0] {
            Run::Text(run) => assert_eq!(run.style.size_half_points, 28),
            Run::Image(_) => panic!("expected text"),
        }
    }

    #[test]
    fn test_stats() {
        let images = image_map(&[("ok.png", 10, 10)]);
        let (_, stats) = assemble_with_stats(
            "two words ![a](ok.png)\n![b](gone.png)",
            &images,
            &ExportOptions::default(),
        );
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.image_count, 2);
        assert_eq!(stats.embedded_image_count, 1);
        assert_eq!(stats.missing_image_count, 1);
        assert_eq!(stats.word_count, 2);
    }

    #[test]
    fn test_unicode_normalization_option() {
        let options = ExportOptions::new().with_unicode_normalization(true);
        let doc = assemble("cafe\u{301}", &ImageMap::new(), &options);
        assert_eq!(doc.plain_text(), "caf\u{e9}");
    }

    #[test]
    fn test_title_in_metadata() {
        let options = ExportOptions::new().with_title("Weekly Notes");
        let doc = assemble("x", &ImageMap::new(), &options);
        assert_eq!(doc.metadata.title.as_deref(), Some("Weekly Notes"));
    }
}

//! Integration tests for the export pipeline.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use penpolish::convert::{export_markdown, export_with_registry, DocumentWriter, WriterRegistry};
use penpolish::error::{Error, Result};
use penpolish::markdown::{find_image_references, segment_line, unique_urls};
use penpolish::model::{Document, Run};
use penpolish::render::{assemble, ExportFormat, ExportOptions};
use penpolish::resolve::{resolve_images, ImageFetcher};

/// In-memory fetcher that records every request.
#[derive(Default)]
struct MockFetcher {
    images: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn with_png(mut self, url: &str, width: u32, height: u32) -> Self {
        self.images.insert(url.to_string(), png(width, height));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ImageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| Error::ImageFetch(format!("404 for {}", url)))
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbImage::new(width, height)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn read_part(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

fn media_count(docx: &[u8]) -> usize {
    let archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    archive
        .file_names()
        .filter(|name| name.starts_with("word/media/"))
        .count()
}

#[tokio::test]
async fn test_failed_image_degrades_to_marker() {
    let fetcher = MockFetcher::default();
    let file = export_markdown(
        "Hello ![x](http://bad.url/a.png) World",
        "report",
        &ExportOptions::default(),
        &fetcher,
    )
    .await
    .unwrap();

    assert_eq!(file.filename, "report.docx");
    assert_eq!(file.stats.paragraph_count, 1);
    assert_eq!(file.stats.missing_image_count, 1);

    let xml = read_part(&file.bytes, "word/document.xml");
    assert!(xml.contains("Hello "));
    assert!(xml.contains(" [Image: x] "));
    assert!(xml.contains(" World"));
    assert!(xml.contains("FF0000"));
    assert_eq!(media_count(&file.bytes), 0);
}

#[tokio::test]
async fn test_duplicate_url_is_fetched_once() {
    let fetcher = MockFetcher::default().with_png("https://cdn.test/a.png", 40, 20);
    let markdown = "![one](https://cdn.test/a.png) and ![two](https://cdn.test/a.png)\n\
                    ![three](https://cdn.test/a.png)";

    let file = export_markdown(markdown, "dup", &ExportOptions::default(), &fetcher)
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), ["https://cdn.test/a.png"]);
    assert_eq!(file.stats.embedded_image_count, 3);
    assert_eq!(media_count(&file.bytes), 1);
}

#[tokio::test]
async fn test_duplicate_spans_share_loaded_image() {
    let fetcher = MockFetcher::default().with_png("a.png", 10, 10);
    let line = "![x](a.png)![y](a.png)";

    let refs = find_image_references(line);
    let images = resolve_images(&fetcher, unique_urls(&refs), 4).await;
    let spans = segment_line(line, &images);

    let first = spans[0].resolved().unwrap();
    let second = spans[1].resolved().unwrap();
    assert!(Arc::ptr_eq(first, second));
}

#[tokio::test]
async fn test_mixed_success_and_failure() {
    let fetcher = MockFetcher::default()
        .with_png("ok.png", 1100, 600)
        .with_png("small.png", 100, 50);
    let markdown = "intro\n![big](ok.png)\n![small](small.png)\n![gone](missing.png)\n";

    let options = ExportOptions::default();
    let refs = find_image_references(markdown);
    let images = resolve_images(&fetcher, unique_urls(&refs), options.fetch_concurrency).await;
    assert_eq!(images.len(), 2);

    let doc = assemble(markdown, &images, &options);
    // Trailing newline yields a final empty paragraph.
    assert_eq!(doc.paragraph_count(), 5);
    assert!(doc.paragraphs[4].is_empty());

    let big: Vec<_> = doc.paragraphs[1].images().collect();
    assert_eq!(big[0].width, 550.0);
    assert!((big[0].height / big[0].width - 600.0 / 1100.0).abs() < 1e-9);

    let small: Vec<_> = doc.paragraphs[2].images().collect();
    assert_eq!((small[0].width, small[0].height), (100.0, 50.0));

    match &doc.paragraphs[3].runs[0] {
        Run::Text(run) => {
            assert!(run.style.is_fallback());
            assert_eq!(run.text, " [Image: gone] ");
        }
        Run::Image(_) => panic!("missing image should fall back to text"),
    }
}

#[tokio::test]
async fn test_image_extent_in_emu() {
    let fetcher = MockFetcher::default().with_png("wide.png", 1100, 600);
    let file = export_markdown("![w](wide.png)", "emu", &ExportOptions::default(), &fetcher)
        .await
        .unwrap();

    let xml = read_part(&file.bytes, "word/document.xml");
    // 550 x 300 px at 9525 EMU per pixel
    assert!(xml.contains("cx=\"5238750\""));
    assert!(xml.contains("cy=\"2857500\""));
}

#[tokio::test]
async fn test_empty_input_exports_single_paragraph() {
    let fetcher = MockFetcher::default();
    let file = export_markdown("", "empty.docx", &ExportOptions::default(), &fetcher)
        .await
        .unwrap();

    assert_eq!(file.filename, "empty.docx");
    assert_eq!(file.stats.paragraph_count, 1);
    assert!(fetcher.calls().is_empty());

    let xml = read_part(&file.bytes, "word/document.xml");
    assert_eq!(xml.matches("<w:p>").count(), 1);
}

#[tokio::test]
async fn test_export_is_repeatable() {
    let fetcher = MockFetcher::default().with_png("a.png", 20, 20);
    let markdown = "a ![i](a.png) b\n\nc";
    let options = ExportOptions::default().with_format(ExportFormat::Text);

    let first = export_markdown(markdown, "x", &options, &fetcher).await.unwrap();
    let second = export_markdown(markdown, "x", &options, &fetcher).await.unwrap();

    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first.stats, second.stats);
    assert_eq!(first.bytes, b"a [Image: i] b\n\nc\n");
}

#[tokio::test]
async fn test_save_to_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MockFetcher::default();
    let file = export_markdown("saved", "out", &ExportOptions::default(), &fetcher)
        .await
        .unwrap();

    let path = file.save_to(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("out.docx"));
    assert_eq!(std::fs::read(path).unwrap(), file.bytes);
}

/// Writer that always fails, to check errors surface as one terminal error.
struct FailingWriter;

impl DocumentWriter for FailingWriter {
    fn extension(&self) -> &str {
        "docx"
    }

    fn mime_type(&self) -> &'static str {
        "application/octet-stream"
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn write(&self, _doc: &Document) -> Result<Vec<u8>> {
        Err(Error::Package("disk full".into()))
    }
}

#[tokio::test]
async fn test_writer_failure_is_terminal() {
    let mut registry = WriterRegistry::new();
    registry.register(Arc::new(FailingWriter));

    let fetcher = MockFetcher::default();
    let result = export_with_registry(
        &registry,
        "text",
        "doc",
        &ExportOptions::default(),
        &fetcher,
    )
    .await;

    assert!(matches!(result, Err(Error::Package(_))));
}

#[tokio::test]
async fn test_crlf_input() {
    let fetcher = MockFetcher::default();
    let options = ExportOptions::default().with_format(ExportFormat::Text);
    let file = export_markdown("one\r\ntwo\r\n", "crlf", &options, &fetcher)
        .await
        .unwrap();

    assert_eq!(file.bytes, b"one\ntwo\n\n");
}

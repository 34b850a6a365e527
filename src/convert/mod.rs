//! Export pipeline and output writers.
//!
//! A [`DocumentWriter`] turns an assembled [`Document`] into the bytes of
//! one downloadable file. Writers are registered in a [`WriterRegistry`]
//! keyed by file extension, and [`export_markdown`] runs the whole
//! pipeline: resolve images, assemble paragraphs, write the artifact.
//!
//! # Example
//!
//! ```no_run
//! use penpolish::convert::export_markdown;
//! use penpolish::render::ExportOptions;
//! use penpolish::resolve::HttpFetcher;
//!
//! # async fn run() -> penpolish::Result<()> {
//! let file = export_markdown(
//!     "Hello ![logo](https://example.com/logo.png)",
//!     "notes",
//!     &ExportOptions::default(),
//!     &HttpFetcher::new(),
//! )
//! .await?;
//! assert_eq!(file.filename, "notes.docx");
//! file.save_to(".")?;
//! # Ok(())
//! # }
//! ```

mod docx;
mod json;
mod text;

pub use docx::DocxWriter;
pub use json::JsonWriter;
pub use text::TextWriter;

use crate::error::{Error, Result};
use crate::markdown::{find_image_references, unique_urls};
use crate::model::Document;
use crate::render::{assemble_with_stats, ExportOptions, ExportStats};
use crate::resolve::{resolve_images, ImageFetcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trait for output writers.
///
/// Implement this trait to add another output format.
pub trait DocumentWriter: Send + Sync {
    /// File extension without the leading dot (e.g. `"docx"`).
    fn extension(&self) -> &str;

    /// MIME type of the produced file.
    fn mime_type(&self) -> &'static str;

    /// Name of this writer.
    fn name(&self) -> &str;

    /// Serialize a document into file bytes.
    fn write(&self, doc: &Document) -> Result<Vec<u8>>;
}

/// Registry of output writers keyed by extension.
pub struct WriterRegistry {
    writers: HashMap<String, Arc<dyn DocumentWriter>>,
}

impl WriterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    /// Create a registry with the built-in writers (docx, txt, json).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxWriter::new()));
        registry.register(Arc::new(TextWriter::new()));
        registry.register(Arc::new(JsonWriter::new()));
        registry
    }

    /// Register a writer under its extension, replacing any previous one.
    pub fn register(&mut self, writer: Arc<dyn DocumentWriter>) {
        self.writers
            .insert(writer.extension().to_lowercase(), writer);
    }

    /// Get a writer by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentWriter>> {
        self.writers
            .get(&ext.trim_start_matches('.').to_lowercase())
            .cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.get_by_extension(ext).is_some()
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.writers.keys().map(|s| s.as_str()).collect()
    }

    /// Write a document with the writer registered for `ext`.
    pub fn write(&self, doc: &Document, ext: &str) -> Result<Vec<u8>> {
        let writer = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::Other(format!("No writer for extension: {}", ext)))?;
        writer.write(doc)
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Append `.ext` to `filename` unless it already ends with it.
///
/// The check ignores ASCII case, so `Report.DOCX` is left alone.
pub fn ensure_extension(filename: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    let suffix = format!(".{}", ext);
    let has_suffix = filename.len() >= suffix.len()
        && filename
            .get(filename.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix));

    if has_suffix {
        filename.to_string()
    } else {
        format!("{}{}", filename, suffix)
    }
}

/// A finished export, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    /// File name including the extension
    pub filename: String,

    /// File contents
    pub bytes: Vec<u8>,

    /// MIME type of the contents
    pub mime_type: &'static str,

    /// Statistics collected during assembly
    pub stats: ExportStats,
}

impl ExportedFile {
    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the file into `dir`, creating the directory if needed.
    ///
    /// Returns the full path of the written file.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::debug!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Run the full export pipeline on a markdown string.
///
/// Images are resolved concurrently through `fetcher`; any image that
/// fails is rendered as a fallback marker instead of failing the export.
/// Only a writer failure aborts the call.
pub async fn export_markdown<F: ImageFetcher>(
    markdown: &str,
    filename: &str,
    options: &ExportOptions,
    fetcher: &F,
) -> Result<ExportedFile> {
    export_with_registry(
        &WriterRegistry::with_defaults(),
        markdown,
        filename,
        options,
        fetcher,
    )
    .await
}

/// Run the export pipeline with writers from a custom registry.
pub async fn export_with_registry<F: ImageFetcher>(
    registry: &WriterRegistry,
    markdown: &str,
    filename: &str,
    options: &ExportOptions,
    fetcher: &F,
) -> Result<ExportedFile> {
    let ext = options.format.extension();
    let writer = registry
        .get_by_extension(ext)
        .ok_or_else(|| Error::Other(format!("No writer for extension: {}", ext)))?;

    let refs = find_image_references(markdown);
    let urls = unique_urls(&refs);
    let images = resolve_images(fetcher, urls, options.fetch_concurrency).await;

    let (doc, stats) = assemble_with_stats(markdown, &images, options);
    let bytes = writer.write(&doc)?;

    Ok(ExportedFile {
        filename: ensure_extension(filename, writer.extension()),
        bytes,
        mime_type: writer.mime_type(),
        stats,
    })
}

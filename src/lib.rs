//! # penpolish
//!
//! Writing-assistant toolkit: export markdown articles with inline images
//! to Word documents, and get a structured critique of an article from a
//! large-language-model provider.
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn run() -> penpolish::Result<()> {
//! let markdown = "Intro\n![diagram](https://example.com/diagram.png)\nOutro";
//!
//! let file = penpolish::export_docx(markdown, "article").await?;
//! file.save_to("./out")?;
//! println!("{} image(s) missing", file.stats.missing_image_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **DOCX export**: one paragraph per line, images scaled to page width
//! - **Concurrent image loading**: each distinct URL fetched once
//! - **Graceful degradation**: failed images become visible markers
//! - **AI analysis**: Gemini and OpenAI-compatible providers, strictly decoded
//! - **Logic trees**: SVG and outline rendering of the article structure

pub mod analysis;
pub mod convert;
pub mod error;
pub mod markdown;
pub mod model;
pub mod render;
pub mod resolve;

// Re-export commonly used types
pub use analysis::{
    analyze_article, AiSettings, AnalysisResult, Analyzer, Provider, SettingsStore,
    StructureNode, TreeLayout,
};
pub use convert::{
    ensure_extension, export_markdown, DocumentWriter, ExportedFile, WriterRegistry,
};
pub use error::{Error, Result};
pub use model::{Document, ImageMap, LoadedImage, Metadata, Paragraph, Run, Span};
pub use render::{ExportFormat, ExportOptions, ExportStats, JsonFormat};
pub use resolve::{HttpFetcher, ImageFetcher};

use std::path::Path;
use std::time::Duration;

/// Export markdown to a `.docx` file with default options.
///
/// Remote images are downloaded; relative paths resolve against the
/// current directory.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> penpolish::Result<()> {
/// let file = penpolish::export_docx("Hello, world", "hello").await?;
/// assert_eq!(file.filename, "hello.docx");
/// # Ok(())
/// # }
/// ```
pub async fn export_docx(markdown: &str, filename: &str) -> Result<ExportedFile> {
    export_with_options(markdown, filename, &ExportOptions::default()).await
}

/// Export markdown with custom options, using the default fetcher.
///
/// # Example
///
/// ```no_run
/// use penpolish::{export_with_options, ExportFormat, ExportOptions};
///
/// # async fn run() -> penpolish::Result<()> {
/// let options = ExportOptions::new()
///     .with_format(ExportFormat::Text)
///     .with_base_dir("./posts");
/// let file = export_with_options("![a](a.png)", "post", &options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn export_with_options(
    markdown: &str,
    filename: &str,
    options: &ExportOptions,
) -> Result<ExportedFile> {
    let mut fetcher = HttpFetcher::new();
    if let Some(dir) = &options.base_dir {
        fetcher = fetcher.with_base_dir(dir);
    }
    export_markdown(markdown, filename, options, &fetcher).await
}

/// Builder for exporting and analyzing articles.
///
/// # Example
///
/// ```no_run
/// use penpolish::{ExportFormat, Penpolish};
///
/// # async fn run() -> penpolish::Result<()> {
/// let file = Penpolish::new()
///     .with_title("Release notes")
///     .with_max_image_width(480)
///     .with_format(ExportFormat::Docx)
///     .export_file("notes.md")
///     .await?;
/// file.save_to(".")?;
/// # Ok(())
/// # }
/// ```
pub struct Penpolish {
    options: ExportOptions,
    timeout: Option<Duration>,
}

impl Penpolish {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExportOptions::default(),
            timeout: None,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Set the maximum displayed image width in pixels.
    pub fn with_max_image_width(mut self, width: u32) -> Self {
        self.options = self.options.with_max_image_width(width);
        self
    }

    /// Normalize text to Unicode NFC.
    pub fn with_nfc(mut self) -> Self {
        self.options = self.options.with_unicode_normalization(true);
        self
    }

    /// Set how many images are fetched concurrently.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.options = self.options.with_fetch_concurrency(concurrency);
        self
    }

    /// Set the directory relative image paths resolve against.
    pub fn with_base_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.options = self.options.with_base_dir(dir);
        self
    }

    /// Apply a timeout to each remote image request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The export options this builder will use.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn fetcher(&self) -> Result<HttpFetcher> {
        let mut fetcher = HttpFetcher::new();
        if let Some(timeout) = self.timeout {
            fetcher = fetcher.with_timeout(timeout)?;
        }
        if let Some(dir) = &self.options.base_dir {
            fetcher = fetcher.with_base_dir(dir);
        }
        Ok(fetcher)
    }

    /// Export a markdown string.
    pub async fn export(&self, markdown: &str, filename: &str) -> Result<ExportedFile> {
        let fetcher = self.fetcher()?;
        export_markdown(markdown, filename, &self.options, &fetcher).await
    }

    /// Export a markdown file.
    ///
    /// The output is named after the file stem. Relative image paths resolve
    /// against the file's directory unless a base directory was set.
    pub async fn export_file<P: AsRef<Path>>(self, path: P) -> Result<ExportedFile> {
        let path = path.as_ref();
        let markdown = tokio::fs::read_to_string(path).await?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let mut builder = self;
        if builder.options.base_dir.is_none() {
            if let Some(parent) = path.parent() {
                builder.options.base_dir = Some(parent.to_path_buf());
            }
        }
        builder.export(&markdown, stem).await
    }

    /// Analyze an article with the given provider settings.
    pub async fn analyze(
        &self,
        title: &str,
        content: &str,
        settings: &AiSettings,
    ) -> Result<AnalysisResult> {
        analyze_article(title, content, settings).await
    }
}

impl Default for Penpolish {
    fn default() -> Self {
        Self::new()
    }
}

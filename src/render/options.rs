//! Export options and configuration.

use crate::model::{DEFAULT_FONT_SIZE, DEFAULT_SPACING_AFTER};
use crate::resolve::DEFAULT_FETCH_CONCURRENCY;
use std::path::PathBuf;

/// Default maximum displayed image width in pixels (about the page width).
pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 550;

/// Options for assembling and writing a document.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Images wider than this (pixels) are scaled down
    pub max_image_width: u32,

    /// Body text size in half-points
    pub font_size_half_points: u32,

    /// Space after each paragraph in twips
    pub paragraph_spacing_after: u32,

    /// Maximum number of image fetches in flight
    pub fetch_concurrency: usize,

    /// Normalize text runs to Unicode NFC
    pub normalize_unicode: bool,

    /// Directory against which relative image paths resolve
    pub base_dir: Option<PathBuf>,

    /// Title recorded in the document properties
    pub title: Option<String>,

    /// Output format
    pub format: ExportFormat,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum displayed image width.
    pub fn with_max_image_width(mut self, width: u32) -> Self {
        self.max_image_width = width.max(1);
        self
    }

    /// Set the body font size in half-points.
    pub fn with_font_size(mut self, half_points: u32) -> Self {
        self.font_size_half_points = half_points;
        self
    }

    /// Set the space after each paragraph.
    pub fn with_paragraph_spacing(mut self, twips: u32) -> Self {
        self.paragraph_spacing_after = twips;
        self
    }

    /// Set how many images may be fetched concurrently.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// Enable or disable Unicode NFC normalization of text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set the base directory for relative image paths.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_image_width: DEFAULT_MAX_IMAGE_WIDTH,
            font_size_half_points: DEFAULT_FONT_SIZE,
            paragraph_spacing_after: DEFAULT_SPACING_AFTER,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            normalize_unicode: false,
            base_dir: None,
            title: None,
            format: ExportFormat::Docx,
        }
    }
}

/// Output format for export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Word processing document
    #[default]
    Docx,

    /// Plain text
    Text,

    /// JSON structure
    Json,
}

impl ExportFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

//! Paragraph and run-level types.

use super::LoadedImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body text size in half-points (24 = 12pt).
pub const DEFAULT_FONT_SIZE: u32 = 24;

/// Space after each paragraph in twentieths of a point.
pub const DEFAULT_SPACING_AFTER: u32 = 120;

/// Color used for missing-image markers.
pub const FALLBACK_COLOR: &str = "FF0000";

/// A paragraph of runs, produced from one input line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Runs in left-to-right order
    pub runs: Vec<Run>,

    /// Space after the paragraph in twips
    pub spacing_after: u32,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            spacing_after: DEFAULT_SPACING_AFTER,
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Set the space after this paragraph.
    pub fn with_spacing_after(mut self, twips: u32) -> Self {
        self.spacing_after = twips;
        self
    }

    /// Add plain text at the default body size.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(Run::Text(TextRun::new(text)));
    }

    /// Add a run.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Iterate over the image runs of this paragraph.
    pub fn images(&self) -> impl Iterator<Item = &ImageRun> {
        self.runs.iter().filter_map(|r| match r {
            Run::Image(img) => Some(img),
            Run::Text(_) => None,
        })
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .map(|r| match r {
                Run::Text(run) => run.text.clone(),
                Run::Image(img) => format!("[Image: {}]", img.alt_text),
            })
            .collect()
    }

    /// Check if the paragraph carries no visible content.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| match r {
            Run::Text(run) => run.is_empty(),
            Run::Image(_) => false,
        })
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

/// A render-ready unit inside a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Run {
    /// Styled text
    Text(TextRun),

    /// Sized image
    Image(ImageRun),
}

impl Run {
    /// Check if this run is a missing-image marker.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Run::Text(run) if run.style.is_fallback())
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a text run at the given size.
    pub fn sized(text: impl Into<String>, size_half_points: u32) -> Self {
        Self {
            text: text.into(),
            style: TextStyle {
                size_half_points,
                ..Default::default()
            },
        }
    }

    /// Create the visible marker for an image that could not be loaded.
    pub fn fallback(alt_text: &str, size_half_points: u32) -> Self {
        Self {
            text: format!(" [Image: {}] ", alt_text),
            style: TextStyle {
                bold: true,
                color: Some(FALLBACK_COLOR.to_string()),
                size_half_points,
                ..Default::default()
            },
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Text color as RRGGBB hex
    pub color: Option<String>,

    /// Font size in half-points
    pub size_half_points: u32,
}

impl TextStyle {
    /// Check if this is the missing-image marker style.
    pub fn is_fallback(&self) -> bool {
        self.bold && self.color.as_deref() == Some(FALLBACK_COLOR)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            bold: false,
            color: None,
            size_half_points: DEFAULT_FONT_SIZE,
        }
    }
}

/// An embedded image displayed at a computed size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRun {
    /// The decoded image
    pub image: Arc<LoadedImage>,

    /// Displayed width in pixels
    pub width: f64,

    /// Displayed height in pixels
    pub height: f64,

    /// Alternative text
    pub alt_text: String,
}

impl ImageRun {
    /// Create an image run displayed at `max_width` or less.
    ///
    /// Images wider than `max_width` are scaled down with their aspect ratio
    /// preserved; narrower images keep their natural size.
    pub fn fitted(image: Arc<LoadedImage>, alt_text: impl Into<String>, max_width: u32) -> Self {
        let (width, height) = fit_to_width(image.width, image.height, max_width);
        Self {
            image,
            width,
            height,
            alt_text: alt_text.into(),
        }
    }
}

/// Compute display dimensions, never exceeding `max_width`.
pub fn fit_to_width(width: u32, height: u32, max_width: u32) -> (f64, f64) {
    let (w, h) = (width as f64, height as f64);
    if width > max_width {
        let scale = max_width as f64 / w;
        (max_width as f64, h * scale)
    } else {
        (w, h)
    }
}

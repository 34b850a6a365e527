//! Document model types for export.
//!
//! This module defines the intermediate representation that bridges
//! markdown segmentation and document serialization. A [`Document`] is a
//! flat list of [`Paragraph`]s, one per input line, each holding styled
//! [`Run`]s.

mod document;
mod paragraph;
mod resource;
mod span;

pub use document::{Document, Metadata};
pub use paragraph::{
    fit_to_width, ImageRun, Paragraph, Run, TextRun, TextStyle, DEFAULT_FONT_SIZE,
    DEFAULT_SPACING_AFTER, FALLBACK_COLOR,
};
pub use resource::{ImageMap, LoadedImage};
pub use span::{ImageReference, Span};

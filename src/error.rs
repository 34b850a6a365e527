//! Error types for penpolish library.

use std::io;
use thiserror::Error;

/// Result type alias for penpolish operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during export and analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An image could not be fetched.
    #[error("Image fetch error: {0}")]
    ImageFetch(String),

    /// Fetched bytes could not be decoded as an image.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// Error packing the document container.
    #[error("Packaging error: {0}")]
    Package(String),

    /// Error during rendering (DOCX, text, JSON, SVG).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The article body is empty.
    #[error("Article content must not be empty")]
    EmptyContent,

    /// No API key is configured for the selected provider.
    #[error("API key is not configured. Run `penpolish config set --api-key <KEY>` first.")]
    MissingApiKey,

    /// Transport-level failure talking to a remote endpoint.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider rejected the request. The message is the provider's own.
    #[error("{0}")]
    Api(String),

    /// The provider answered without any content.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The provider's content did not match the expected analysis shape.
    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),

    /// Settings could not be stored.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Package(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyContent;
        assert_eq!(err.to_string(), "Article content must not be empty");

        let err = Error::Api("Incorrect API key provided".to_string());
        assert_eq!(err.to_string(), "Incorrect API key provided");

        let err = Error::EmptyResponse("openai".to_string());
        assert_eq!(err.to_string(), "Empty response from openai");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_io_error_conversion() {
        let zip_err = zip::result::ZipError::Io(io::Error::new(io::ErrorKind::Other, "disk"));
        let err: Error = zip_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

//! Error types for pdfknife library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfknife operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a run.
///
/// Expected misses (no PDF link, no page images, malformed structured data,
/// a single undecodable image) are not errors and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A page or candidate address could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Raster decoding or JPEG encoding failed.
    #[error("Image error: {0}")]
    Image(String),

    /// The PDF document could not be built or serialized.
    #[error("PDF write error: {0}")]
    PdfWrite(String),

    /// The renderer was requested from an origin outside the allow-list.
    #[error("Unauthorized renderer origin: {0}")]
    UnauthorizedOrigin(String),

    /// The rendering capability could not be loaded.
    #[error("Renderer unavailable: {0}")]
    CapabilityLoad(String),

    /// Settings could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The download collaborator refused or failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfWrite(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

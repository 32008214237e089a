//! Error types for sheetflow.

use std::io;
use thiserror::Error;

/// Result type alias for sheetflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering or exporting a document.
///
/// Classification and tokenizing never fail; every line falls through to a
/// paragraph at worst. Errors only arise on the export paths.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The environment cannot capture the rendered element as a bitmap.
    #[error("Bitmap capture is not supported: {0}")]
    UnsupportedCapability(String),

    /// The asynchronous capture step failed.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// The capture produced a bitmap with no pixels.
    #[error("Capture produced an empty bitmap")]
    EmptyCapture,

    /// Error serializing the paginated document to PDF.
    #[error("PDF writing error: {0}")]
    Pdf(String),

    /// Error decoding or transforming a bitmap.
    #[error("Image error: {0}")]
    Image(String),

    /// Error during rendering (HTML, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Export or capture options are out of range.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
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

//! Error types for uncal library.

use std::io;
use thiserror::Error;

/// Result type alias for uncal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting calendar events.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The buffer is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The document could not be parsed into text fragments.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid configuration (bad pattern, malformed alias).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error rendering events (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error writing the inspection export.
    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Whether this error means the uploaded document itself was unusable.
    ///
    /// These are the errors that abort the pipeline before any event
    /// assembly happens. Callers should report them as an invalid upload,
    /// unlike an empty event list which only asks for a clearer document.
    pub fn is_document_parse(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat
                | Error::UnsupportedVersion(_)
                | Error::DocumentParse(_)
                | Error::Encrypted
                | Error::PageOutOfRange(..)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::DocumentParse(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

//! Error types for mindmark operations.

use thiserror::Error;

/// Errors that can occur while converting a mind map.
///
/// [`Error::Parse`] and [`Error::File`] are the two fatal conditions of the
/// pipeline; the remaining variants wrap lower-level failures that surface
/// around them (a broken ZIP container, unreadable input, JSON output).
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("File error: {0}")]
    File(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the document rather than the archive.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

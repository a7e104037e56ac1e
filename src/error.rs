use crate::formats::Format;
use thiserror::Error;

/// Errors that abort the extraction of a whole file.
///
/// Per-entry problems inside an EPUB spine never surface here; the spine
/// walk logs and skips them.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Extension not in the registry, or an EPUB-only operation was asked of
    /// another format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// ZIP container unreadable, a required entry missing, or a format that
    /// needs at least one content unit found none.
    #[error("bad archive: {0}")]
    BadArchive(String),

    /// Recognised format without an extractor yet.
    #[error("{0} documents are not supported yet")]
    NotYetSupported(Format),

    #[error("{format} document could not be parsed: {reason}")]
    Malformed { format: Format, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("chapter serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractError {
    pub(crate) fn bad_archive(message: impl Into<String>) -> Self {
        Self::BadArchive(message.into())
    }

    pub(crate) fn malformed(format: Format, reason: impl std::fmt::Display) -> Self {
        Self::Malformed {
            format,
            reason: reason.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::BadArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(err: quick_xml::Error) -> Self {
        Self::BadArchive(format!("XML: {err}"))
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

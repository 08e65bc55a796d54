//! Unified error type for mediabrowse.
//!
//! Path resolution, directory listing, and file streaming all funnel their
//! failures into [`Error`], which carries enough context for API handlers to
//! derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in mediabrowse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested path does not exist beneath the media root.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "directory", "file").
        entity: String,
        /// The root-relative path that was looked up.
        id: String,
    },

    /// The requested path resolves outside the media root.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The `Range` header could not be satisfied for a file of `size` bytes.
    #[error("Range not satisfiable: {range}")]
    RangeNotSatisfiable {
        /// The offending header value.
        range: String,
        /// Total size of the file in bytes.
        size: u64,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Forbidden(_) => 403,
            Error::Validation(_) => 400,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::RangeNotSatisfiable`].
    pub fn range_not_satisfiable(range: impl Into<String>, size: u64) -> Self {
        Error::RangeNotSatisfiable {
            range: range.into(),
            size,
        }
    }

    /// Classify an I/O error raised while touching `path`.
    ///
    /// Any error meaning "no such path" becomes [`Error::NotFound`]: a missing
    /// entry, a parent that is a regular file, or a name the filesystem cannot
    /// hold. Everything else stays an [`Error::Io`] and surfaces as a 500.
    pub fn from_io(err: std::io::Error, entity: &str, path: impl fmt::Display) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidFilename => {
                Error::not_found(entity, path)
            }
            _ => Error::Io { source: err },
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

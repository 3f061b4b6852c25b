//! Error types for bloomdiff.

use std::io;
use thiserror::Error;

/// The result type used throughout bloomdiff.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for bloomdiff operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred while reading a record file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A requested resource was not found.
    ///
    /// A key missing from both tiers is not an error: it is reported as
    /// [`Lookup::NotFound`](crate::lookup::Lookup::NotFound).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record line had fewer than four key tokens.
    #[error("Malformed record at line {line}: expected 4 key tokens, found {tokens}")]
    MalformedRecord {
        /// 1-based line number, or 0 when the line was parsed outside a file.
        line: usize,
        /// Number of whitespace-separated tokens on the line.
        tokens: usize,
    },

    /// An invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Creates a new not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Creates a new malformed record error.
    pub fn malformed(line: usize, tokens: usize) -> Self {
        Error::MalformedRecord { line, tokens }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

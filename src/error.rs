//! Error types for sqlengine_dedup.
//!
//! All errors are represented by [`DedupSqlError`]. Query rendering itself
//! cannot fail; errors only arise at the boundaries where requests and
//! configuration are constructed or loaded.
//!
//! # Error Classification
//!
//! - **User** — degenerate requests, bad aliases, malformed job documents.
//! - **System** — I/O failures while reading a job document.

use std::fmt;

/// Primary error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum DedupSqlError {
    // ── User errors ──────────────────────────────────────────────────────
    /// An invalid argument was provided while building a request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The same output alias was selected more than once.
    #[error("duplicate select alias: {0}")]
    DuplicateAlias(String),

    /// An alias cannot be embedded in the generated SQL as-is.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A job document could not be deserialized.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    // ── System errors ────────────────────────────────────────────────────
    /// Reading a job document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of error kind for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupSqlErrorKind {
    User,
    System,
}

impl fmt::Display for DedupSqlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupSqlErrorKind::User => write!(f, "USER"),
            DedupSqlErrorKind::System => write!(f, "SYSTEM"),
        }
    }
}

impl DedupSqlError {
    /// Classify the error.
    pub fn kind(&self) -> DedupSqlErrorKind {
        match self {
            DedupSqlError::InvalidArgument(_)
            | DedupSqlError::DuplicateAlias(_)
            | DedupSqlError::InvalidIdentifier(_)
            | DedupSqlError::ConfigParse(_) => DedupSqlErrorKind::User,

            DedupSqlError::Io(_) => DedupSqlErrorKind::System,
        }
    }
}

//! Error types for project synchronization.
//!
//! Errors are categorized so callers can decide whether a failure skips a
//! single step (missing input) or aborts processing of a whole document
//! (parse failure).

use std::path::PathBuf;
use thiserror::Error;

/// Categories of synchronization errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// An input file or directory does not exist
    MissingInput,
    /// A structured document could not be parsed
    Parse,
    /// Reading or writing the filesystem failed
    Io,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether processing of independent steps may continue after this error.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::MissingInput)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingInput => "Input not found",
            Self::Parse => "Malformed document",
            Self::Io => "Filesystem error",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors that can occur while synchronizing project documents.
#[derive(Debug, Error)]
pub enum Error {
    /// File or directory does not exist
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Document on disk is not well-formed XML
    #[error("failed to parse {}: {message}", .path.display())]
    Parse {
        /// Document that failed to parse
        path: PathBuf,
        /// Description of the syntax error
        message: String,
    },

    /// Document text is not well-formed XML (no file associated yet)
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Field pattern could not be compiled
    #[error("invalid field pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound(_) => ErrorCategory::MissingInput,
            Error::Parse { .. } | Error::Malformed(_) => ErrorCategory::Parse,
            Error::Io(_) => ErrorCategory::Io,
            Error::InvalidPattern(_) => ErrorCategory::Other,
        }
    }

    /// Whether independent steps may continue after this error.
    pub fn is_skippable(&self) -> bool {
        self.category().is_skippable()
    }

    /// Attach a path to a parse error raised from in-memory text.
    pub(crate) fn at_path(self, path: &std::path::Path) -> Self {
        match self {
            Error::Malformed(message) => Error::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        }
    }
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, Error>;

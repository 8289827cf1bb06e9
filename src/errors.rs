/*!
 * Error types for the nextol application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while parsing a tolino notebook file
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The input contains no record separator at all, so it cannot be a
    /// tolino notes export. Recoverable by choosing a different file.
    #[error("no record separator found - this does not look like a tolino notes file")]
    MissingSeparator,

    /// A record does not fit the expected schema (blank line, title line,
    /// content, date footer)
    #[error("malformed annotation record: {reason}")]
    MalformedRecord {
        /// What did not match the schema
        reason: String,
    },

    /// An empty or whitespace-only title was supplied; it would otherwise
    /// match every record
    #[error("book title must not be empty")]
    EmptyTitle,

    /// A title used in pattern match mode failed to compile as a regex
    #[error("invalid title pattern '{pattern}': {reason}")]
    InvalidTitlePattern {
        /// The title as entered
        pattern: String,
        /// Regex compile error
        reason: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from notebook parsing
    #[error("Notebook error: {0}")]
    Notebook(#[from] NotebookError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

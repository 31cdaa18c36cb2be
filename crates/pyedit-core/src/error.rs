//! Error types.
//!
//! Only caller bugs are errors. A search miss, an undo on an empty history or a dedent at
//! column 0 are ordinary outcomes and are reported through return values instead.

use thiserror::Error;

/// Errors produced by the editing engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An offset lies past the end of the buffer.
    #[error("invalid offset {0}")]
    InvalidOffset(usize),

    /// A range does not fit inside the buffer.
    #[error("invalid range {start}..{end} (buffer length {len})")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Buffer length in characters at the time of the call.
        len: usize,
    },

    /// A line/column pair does not exist.
    #[error("invalid position: line {line}, column {column}")]
    InvalidPosition {
        /// Zero-based line.
        line: usize,
        /// Zero-based column.
        column: usize,
    },

    /// A search query could not be compiled.
    #[error("invalid search query: {0}")]
    InvalidSearch(String),
}

/// Result alias used throughout the crate.
pub type EditResult<T> = Result<T, EditError>;

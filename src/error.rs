//! Error types for the section tree and the layers wrapped around it.
//!
//! `TreeError` covers the recoverable conditions of the tree operations themselves.
//! `Error` covers everything that touches the outside world: files, JSON, markdown parsing
//! and configuration.

use crate::section::{SectionId, TableId, MAX_TABLE_COLS, MAX_TABLE_ROWS};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The table dimension bound that a rejected `add_table` call violated.
pub enum DimensionBound {
    /// Fewer than one row was requested.
    TooFewRows,
    /// More than [`MAX_TABLE_ROWS`] rows were requested.
    TooManyRows,
    /// Fewer than one column was requested.
    TooFewColumns,
    /// More than [`MAX_TABLE_COLS`] columns were requested.
    TooManyColumns,
}

impl fmt::Display for DimensionBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRows => write!(f, "a table needs at least 1 row"),
            Self::TooManyRows => write!(f, "a table may have at most {MAX_TABLE_ROWS} rows"),
            Self::TooFewColumns => write!(f, "a table needs at least 1 column"),
            Self::TooManyColumns => {
                write!(f, "a table may have at most {MAX_TABLE_COLS} columns")
            }
        }
    }
}

/// Recoverable conditions raised by section tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No section with this id exists in the forest.
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),

    /// The section exists but holds no table with this id.
    #[error("table {table} not found in section {section}")]
    TableNotFound {
        /// Section that was searched.
        section: SectionId,
        /// Table id that was not found.
        table: TableId,
    },

    /// Requested table dimensions fall outside 1..=20 rows or 1..=10 columns.
    #[error("invalid table dimensions {rows}x{cols}: {bound}")]
    InvalidDimensions {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
        /// First bound found to be violated.
        bound: DimensionBound,
    },

    /// Deleting this section would leave the document without a top-level section.
    #[error("cannot delete {0}: it is the only top-level section")]
    LastTopLevelSection(SectionId),

    /// A cell edit addressed a position outside the table grid.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} table")]
    CellOutOfRange {
        /// Requested row (0-indexed).
        row: usize,
        /// Requested column (0-indexed).
        col: usize,
        /// Row count of the table.
        rows: usize,
        /// Column count of the table.
        cols: usize,
    },
}

/// Errors from persistence, parsing and configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be encoded or decoded as JSON.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file exists but could not be parsed.
    #[error("invalid configuration in {}: {message}", .path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A decoded document breaks a structural invariant.
    #[error("invalid document: {0}")]
    Invalid(String),

    /// The file extension does not name a document format this crate reads.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A markdown source could not be turned into sections.
    #[error("markdown import failed: {0}")]
    Markdown(String),

    /// A tree operation was rejected.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result alias for operations that can fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

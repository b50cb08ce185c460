//! Errors reported while building or solving an exact cover matrix.

use std::io;
use thiserror::Error;

/// Errors produced by the [`Solver`](crate::Solver).
///
/// Construction errors are only returned when the solver is in strict mode
/// (the default). With [`Config::permissive`](crate::Config::permissive) set,
/// the offending call is ignored instead and `Ok(())` is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The column named or indexed does not exist.
    #[error("Unknown column [{0}]")]
    UnknownColumn(String),

    /// The row index is past the end of the stored rows.
    #[error("Row index [{index}] out of range for [{count}] rows")]
    RowIndexOutOfRange {
        /// The requested row index
        index: usize,
        /// Number of rows currently stored
        count: usize,
    },

    /// A column with the same name was already added.
    #[error("Duplicate column name [{0}]")]
    DuplicateColumnName(String),

    /// The row being built already has an entry in this column.
    #[error("Row [{row}] already has an entry in column [{column}]")]
    DuplicateEntry {
        /// Index of the row being built
        row: usize,
        /// Name of the repeated column
        column: String,
    },

    /// Writing to a text sink failed.
    #[error("Failed to write solver output: {0}")]
    Io(#[from] io::Error),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

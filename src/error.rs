//! Error types for spmatrix

use crate::matrix::SparseFormat;
use std::collections::TryReserveError;
use thiserror::Error;

/// Result type alias using spmatrix's error
pub type Result<T> = std::result::Result<T, SparseError>;

/// Errors that can occur in sparse matrix operations
#[derive(Error, Debug)]
pub enum SparseError {
    /// Backing storage could not be allocated
    #[error("Out of memory: failed to reserve storage for {requested} entries")]
    OutOfMemory {
        /// Number of entries requested
        requested: usize,
    },

    /// Operation invoked on a matrix stored in the wrong format
    #[error("Format mismatch: '{op}' is not valid for a {found} matrix")]
    FormatMismatch {
        /// The operation name
        op: &'static str,
        /// Format of the offending operand
        found: SparseFormat,
    },

    /// Operand shapes disagree
    #[error("Dimension mismatch: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        /// Left-hand side (rows, cols)
        lhs: (usize, usize),
        /// Right-hand side (rows, cols)
        rhs: (usize, usize),
    },

    /// Persisted data does not fit the preallocated matrix
    #[error("Length mismatch: {needed} entries do not fit in capacity {capacity}")]
    LengthMismatch {
        /// Entries in the stream
        needed: usize,
        /// Capacity of the destination
        capacity: usize,
    },

    /// Stream read or write failure
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Coordinate outside the matrix
    #[error("Index ({row}, {col}) out of bounds for {n_rows}×{n_cols} matrix")]
    IndexOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows
        n_rows: usize,
        /// Number of columns
        n_cols: usize,
    },

    /// Malformed input data or invalid argument
    #[error("Domain error: {0}")]
    Domain(String),

    /// Operation needs at least one stored entry
    #[error("'{0}' requires at least one stored entry")]
    EmptyMatrix(&'static str),
}

impl SparseError {
    pub(crate) fn out_of_memory(requested: usize) -> impl FnOnce(TryReserveError) -> Self {
        move |_| SparseError::OutOfMemory { requested }
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        SparseError::Domain(msg.into())
    }
}

//! Error types for the metric repair operators.

use thiserror::Error;

/// Errors raised before any computation starts. No partial output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    /// A row list or host array does not describe a square matrix.
    #[error("matrix is not square: {rows} rows, found a row of {cols} columns")]
    NotSquare {
        /// Number of rows supplied.
        rows: usize,
        /// Offending column count.
        cols: usize,
    },

    /// A flat row-major buffer cannot hold `dim × dim` entries.
    #[error("buffer of length {len} cannot hold a {dim}x{dim} matrix")]
    BufferLength {
        /// Requested dimension.
        dim: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// The initial and target matrices differ in dimension.
    #[error("dimension mismatch: initial matrix is {initial}x{initial}, target is {target}x{target}")]
    DimensionMismatch {
        /// Dimension of the initial matrix X0.
        initial: usize,
        /// Dimension of the target matrix D.
        target: usize,
    },

    /// The projection operator needs at least one iteration.
    #[error("iteration count must be at least 1, got {count}")]
    InvalidIterationCount {
        /// The rejected count.
        count: usize,
    },
}

/// Result type for metric repair operations.
pub type MetricResult<T> = Result<T, MetricError>;

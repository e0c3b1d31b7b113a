//! Error types for the roster layer.
//!
//! [`RowShapeError`] is the recoverable failure raised while reassembling a
//! student from table rows; the caller skips one row and keeps going.
//! [`CoreError`] covers everything else the core can reject.

use thiserror::Error;

/// A table row could not be interpreted during record reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed row at offset {offset}: {reason}")]
pub struct RowShapeError {
    /// Offset of the offending row relative to the start row of the record.
    pub offset: usize,
    /// Human-readable description of the problem.
    pub reason: String,
}

impl RowShapeError {
    pub fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

/// Error type for core roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A row could not be reconstructed into a record.
    #[error(transparent)]
    RowShape(#[from] RowShapeError),

    /// A deployment setting holds a value the pipeline cannot use.
    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

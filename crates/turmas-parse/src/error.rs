//! Error types for the extraction layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Each variant keeps the
//! backend's own message so the CLI can print the full chain.

use thiserror::Error;

/// Error type for PDF and CSV extraction.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The PDF structure could not be parsed.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading source data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV source could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// The chosen strategy produced nothing usable.
    #[error("no tables found with the {0} strategy")]
    NoTables(&'static str),
}

//! Error type for the report pipeline.

use std::path::PathBuf;

use thiserror::Error;
use turmas_core::CoreError;
use turmas_parse::{BackendError, Strategy};

/// Any failure that aborts a run. Nothing is written when one occurs.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is neither `.pdf` nor `.csv`.
    #[error("unsupported source format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Table extraction failed and no fallback was left.
    #[error("table extraction failed with the {strategy} strategy")]
    Extraction {
        strategy: Strategy,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to serialize JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),

    /// A setting failed validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

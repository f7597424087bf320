//! Export error types.

use std::path::PathBuf;
use thiserror::Error;

/// Export operation error.
///
/// A failed export never leaves a partial file at the target path.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Building a partition frame failed.
    #[error("failed to build export table: {message}")]
    Frame { message: String },

    /// Workbook serialization failed.
    #[error("failed to write workbook: {message}")]
    Workbook { message: String },

    /// CSV serialization failed.
    #[error("failed to write CSV: {message}")]
    Csv { message: String },

    /// Zip serialization failed.
    #[error("failed to write zip archive: {message}")]
    Zip { message: String },

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temp file couldn't be renamed into place.
    #[error("failed to complete export to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Frame {
            message: err.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ReportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Zip {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ReportError>;

//! Error types for table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an input table.
///
/// Every variant names the offending file so the operator knows which
/// upload to fix.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// The file extension selects no known parser.
    #[error("unsupported file type for {file}: expected .csv, .tsv, .txt, .xlsx, .xlsm, .xls or .ods")]
    UnsupportedFormat { file: String },

    /// Text could not be decoded in any supported encoding.
    #[error("could not decode {file} as {encoding}")]
    UnsupportedEncoding {
        file: String,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    /// Delimited text is malformed.
    #[error("failed to parse {file}: {message}")]
    CsvParse { file: String, message: String },

    /// Spreadsheet could not be opened.
    #[error("failed to open spreadsheet {file}: {message}")]
    SpreadsheetOpen { file: String, message: String },

    /// Spreadsheet has no worksheets.
    #[error("spreadsheet {file} contains no worksheets")]
    EmptyWorkbook { file: String },

    /// No header row, or nothing left after dropping empty columns and rows.
    #[error("{file} contains no data")]
    EmptyTable { file: String },

    // === DataFrame Errors ===
    /// Failed to build the in-memory table.
    #[error("failed to build table for {file}: {message}")]
    DataFrame { file: String, message: String },
}

impl IngestError {
    /// Name of the file the error refers to.
    pub fn file(&self) -> String {
        match self {
            IngestError::FileNotFound { path } | IngestError::FileRead { path, .. } => {
                path.display().to_string()
            }
            IngestError::UnsupportedFormat { file }
            | IngestError::UnsupportedEncoding { file, .. }
            | IngestError::CsvParse { file, .. }
            | IngestError::SpreadsheetOpen { file, .. }
            | IngestError::EmptyWorkbook { file }
            | IngestError::EmptyTable { file }
            | IngestError::DataFrame { file, .. } => file.clone(),
        }
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/siga.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/siga.csv");
    }

    #[test]
    fn test_error_names_file() {
        let err = IngestError::EmptyTable {
            file: "form.xlsx".to_string(),
        };
        assert_eq!(err.file(), "form.xlsx");
        assert_eq!(err.to_string(), "form.xlsx contains no data");
    }
}

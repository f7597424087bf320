use std::fmt;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Parser family selected from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Delimited,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(TableFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat {
                file: file_name.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Delimited => "delimited",
            TableFormat::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

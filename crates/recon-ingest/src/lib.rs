//! Table loading for inventory reconciliation.
//!
//! Uploaded files arrive as a name plus bytes. The file extension selects the
//! parser: delimited text (`.csv`, `.tsv`, `.txt`) or a spreadsheet
//! (`.xlsx`, `.xlsm`, `.xls`, `.ods`). Every cell is kept as text so that
//! identifiers like `0012` survive untouched.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use recon_ingest::load_table_from_path;
//!
//! let registry = load_table_from_path(Path::new("siga.csv"))?;
//! println!("{} rows, {:?}", registry.height(), registry.column_names());
//! ```

mod csv;
mod error;
mod format;
mod raw;
mod spreadsheet;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use format::TableFormat;
pub use raw::{PLACEHOLDER_PREFIX, RawTable};

use std::path::Path;

use recon_model::SourceTable;
use tracing::{debug, info};

/// Load a named byte stream into a normalized text table.
///
/// Placeholder columns (blank headers) and columns empty in every row are
/// removed. Fails without producing a partial table.
pub fn load_table(file_name: &str, bytes: &[u8]) -> Result<SourceTable> {
    let format = TableFormat::from_file_name(file_name)?;
    debug!(file = file_name, format = %format, bytes = bytes.len(), "loading table");

    let raw = match format {
        TableFormat::Delimited => csv::read_delimited(file_name, bytes)?,
        TableFormat::Spreadsheet => spreadsheet::read_first_sheet(file_name, bytes)?,
    };
    let table = raw.into_source_table(file_name)?;

    info!(
        file = file_name,
        rows = table.height(),
        columns = table.width(),
        "table loaded"
    );
    Ok(table)
}

/// Read a file from disk and load it with [`load_table`].
pub fn load_table_from_path(path: &Path) -> Result<SourceTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_table(&file_name, &bytes)
}

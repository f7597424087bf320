//! Spreadsheet loading via `calamine` (first worksheet only).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use recon_common::format_numeric;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::raw::RawTable;

/// Read the first worksheet of a workbook into a header row and data rows.
pub(crate) fn read_first_sheet(file: &str, bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
        IngestError::SpreadsheetOpen {
            file: file.to_string(),
            message: e.to_string(),
        }
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::EmptyWorkbook {
            file: file.to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::SpreadsheetOpen {
            file: file.to_string(),
            message: format!("worksheet '{sheet_name}': {e}"),
        })?;
    debug!(file, sheet = %sheet_name, "reading first worksheet");

    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|cell| cell_to_string(cell).is_empty()));
    let Some(header_row) = rows_iter.next() else {
        return Err(IngestError::EmptyTable {
            file: file.to_string(),
        });
    };

    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(RawTable::new(headers, rows))
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a cell as text; whole numbers lose their `.0`, dates are written
/// as `YYYY-MM-DD HH:MM:SS`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) => format_numeric(*value),
        Data::Int(value) => value.to_string(),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
            None => format_numeric(value.as_f64()),
        },
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.trim().to_string(),
        _ => cell.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(12.0)), "12");
        assert_eq!(cell_to_string(&Data::Float(1.25)), "1.25");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::String(" 0012 ".to_string())), "0012");
    }

    #[test]
    fn test_datetime_cells_render_as_dates() {
        let midnight = ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_string(&Data::DateTime(midnight)), "2024-01-01 00:00:00");

        let afternoon = ExcelDateTime::new(45292.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_string(&Data::DateTime(afternoon)), "2024-01-01 18:00:00");

        let iso = Data::DateTimeIso("2024-03-05T10:20:00".to_string());
        assert_eq!(cell_to_string(&iso), "2024-03-05T10:20:00");
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let err = read_first_sheet("broken.xlsx", b"not a workbook").unwrap_err();
        assert!(matches!(err, IngestError::SpreadsheetOpen { .. }));
    }
}

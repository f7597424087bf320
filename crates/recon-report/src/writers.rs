//! Serializers for export partitions.

use std::io::{Cursor, Write};

use polars::prelude::DataFrame;
use recon_common::{column_names, row_values};
use recon_model::ExportSet;
use rust_xlsxwriter::{Format, Workbook};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{ReportError, Result};
use crate::options::ExportOptions;
use crate::partition::ExportPartition;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialize one frame as CSV, UTF-8 with a byte-order mark.
pub fn csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(column_names(df))?;
        for idx in 0..df.height() {
            writer.write_record(row_values(df, idx))?;
        }
        writer.flush().map_err(|e| ReportError::Csv {
            message: e.to_string(),
        })?;
    }
    Ok(buffer)
}

fn row_index(idx: usize) -> Result<u32> {
    u32::try_from(idx).map_err(|_| ReportError::Workbook {
        message: format!("row {idx} exceeds the worksheet limit"),
    })
}

fn col_index(idx: usize) -> Result<u16> {
    u16::try_from(idx).map_err(|_| ReportError::Workbook {
        message: format!("column {idx} exceeds the worksheet limit"),
    })
}

/// Serialize the partition as a workbook with one sheet per set.
///
/// Sheets are named after the set labels, in Paired / Registry-only /
/// Survey-only order. The header row is bold.
pub fn workbook_bytes(partition: &ExportPartition, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for set in ExportSet::ALL {
        let df = partition.set(set);
        let sheet = workbook.add_worksheet();
        sheet.set_name(options.label(set))?;

        for (col, name) in column_names(df).iter().enumerate() {
            sheet.write_string_with_format(0, col_index(col)?, name, &header_format)?;
        }
        for idx in 0..df.height() {
            let row = row_index(idx + 1)?;
            for (col, value) in row_values(df, idx).iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet.write_string(row, col_index(col)?, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Serialize the partition as a zip of one CSV per set.
pub fn zip_bytes(partition: &ExportPartition) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let file_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for set in ExportSet::ALL {
        let bytes = csv_bytes(partition.set(set))?;
        zip.start_file(set.file_name(), file_options)?;
        zip.write_all(&bytes).map_err(|e| ReportError::Zip {
            message: e.to_string(),
        })?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_common::rows_frame;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_csv_bytes_has_bom_and_quotes() {
        let df = rows_frame(
            &strings(&["SIGA__Nome", "status"]),
            vec![strings(&["Mesa, madeira", "Paired"])],
        )
        .unwrap();
        let bytes = csv_bytes(&df).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "SIGA__Nome,status\n\"Mesa, madeira\",Paired\n");
    }

    #[test]
    fn test_csv_bytes_empty_frame_writes_header() {
        let df = rows_frame(&strings(&["a", "b"]), Vec::new()).unwrap();
        let bytes = csv_bytes(&df).unwrap();
        assert_eq!(&bytes[UTF8_BOM.len()..], b"a,b\n");
    }
}

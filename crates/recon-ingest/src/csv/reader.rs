//! Delimited text reading via the `csv` crate.

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::raw::RawTable;

use super::decode::{decode_text, detect_delimiter};

/// Parse a delimited-text upload into a header row and data rows.
pub(crate) fn read_delimited(file: &str, bytes: &[u8]) -> Result<RawTable> {
    let (text, encoding) = decode_text(file, bytes)?;
    let delimiter = detect_delimiter(&text);
    debug!(
        file,
        encoding = encoding.as_str(),
        delimiter = %char::from(delimiter).escape_default(),
        "decoded delimited text"
    );

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IngestError::CsvParse {
            file: file.to_string(),
            message: e.to_string(),
        })?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        // Blank lines before the header are not a header.
        if records.is_empty() && row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(row);
    }

    let mut iter = records.into_iter();
    let Some(headers) = iter.next() else {
        return Err(IngestError::EmptyTable {
            file: file.to_string(),
        });
    };
    Ok(RawTable::new(headers, iter.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_semicolon_file() {
        let raw = read_delimited("siga.csv", "Código;Nome\n0012;Mesa\n0013;Cadeira\n".as_bytes())
            .unwrap();
        assert_eq!(raw.headers, vec!["Código", "Nome"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0], vec!["0012", "Mesa"]);
    }

    #[test]
    fn test_quoted_fields_keep_delimiters() {
        let raw = read_delimited("form.csv", b"ID,Nome\n1,\"Mesa, madeira\"\n").unwrap();
        assert_eq!(raw.rows[0][1], "Mesa, madeira");
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = read_delimited("empty.csv", b"").unwrap_err();
        assert!(matches!(err, IngestError::EmptyTable { .. }));
    }
}

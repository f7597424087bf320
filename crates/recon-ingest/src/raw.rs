//! Header and cell normalization shared by every parser.

use std::collections::HashSet;

use recon_common::string_frame;
use recon_model::SourceTable;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Prefix given to columns whose header cell is blank.
///
/// Such columns are export artifacts (trailing delimiters, unnamed index
/// columns) and are removed before the table is handed downstream.
pub const PLACEHOLDER_PREFIX: &str = "Unnamed: ";

/// Parsed header row and data rows, before cleanup.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Normalize and convert into a text-only table.
    ///
    /// Rows are padded to the widest line, fully empty rows are skipped,
    /// placeholder and all-empty columns are dropped.
    pub fn into_source_table(self, file: &str) -> Result<SourceTable> {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        if width == 0 {
            return Err(IngestError::EmptyTable {
                file: file.to_string(),
            });
        }

        let mut raw_headers = self.headers;
        raw_headers.resize(width, String::new());
        let headers = normalize_headers(&raw_headers);

        let rows: Vec<Vec<String>> = self
            .rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(|cell| normalize_cell(cell)).collect();
                cells.resize(width, String::new());
                cells
            })
            .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
            .collect();

        let keep: Vec<usize> = (0..width)
            .filter(|&idx| !headers[idx].starts_with(PLACEHOLDER_PREFIX))
            .filter(|&idx| rows.iter().any(|row| !row[idx].is_empty()))
            .collect();

        let dropped: Vec<&str> = (0..width)
            .filter(|idx| !keep.contains(idx))
            .map(|idx| headers[idx].as_str())
            .collect();
        if !dropped.is_empty() {
            debug!(file, dropped = ?dropped, "dropped placeholder or empty columns");
        }

        if keep.is_empty() || rows.is_empty() {
            return Err(IngestError::EmptyTable {
                file: file.to_string(),
            });
        }

        let kept_headers: Vec<String> = keep.iter().map(|&idx| headers[idx].clone()).collect();
        let columns: Vec<Vec<String>> = keep
            .iter()
            .map(|&idx| rows.iter().map(|row| row[idx].clone()).collect())
            .collect();

        let data = string_frame(&kept_headers, columns).map_err(|e| IngestError::DataFrame {
            file: file.to_string(),
            message: e.to_string(),
        })?;
        Ok(SourceTable::new(file, data))
    }
}

/// Normalizes a header value: BOM stripped and surrounding whitespace trimmed.
/// Inner spacing is kept so exported names match the source headers.
pub(crate) fn normalize_header(raw: &str) -> String {
    normalize_cell(raw)
}

pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Normalize a header row into distinct column names.
///
/// Blank headers become `Unnamed: N` (N = 0-based position); repeated names
/// get a `.1`, `.2`, ... suffix.
pub(crate) fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, value) in raw.iter().enumerate() {
        let base = normalize_header(value);
        let base = if base.is_empty() {
            format!("{PLACEHOLDER_PREFIX}{idx}")
        } else {
            base
        };
        let mut name = base.clone();
        let mut counter = 1usize;
        while used.contains(&name) {
            name = format!("{base}.{counter}");
            counter += 1;
        }
        used.insert(name.clone());
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_common::{column_names, column_value_string};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Cód.   Item "), "Cód.   Item");
        assert_eq!(normalize_header("\tNome / Tipo de Bens\n"), "Nome / Tipo de Bens");
        assert_eq!(normalize_header("\u{feff}Código"), "Código");
    }

    #[test]
    fn test_normalize_headers_placeholders_and_duplicates() {
        let headers = normalize_headers(&strings(&["Nome", "", "Nome", " Nome ", "ID"]));
        assert_eq!(headers, vec!["Nome", "Unnamed: 1", "Nome.1", "Nome.2", "ID"]);
    }

    #[test]
    fn test_duplicate_suffix_skips_existing_name() {
        let headers = normalize_headers(&strings(&["A", "A.1", "A"]));
        assert_eq!(headers, vec!["A", "A.1", "A.2"]);
    }

    #[test]
    fn test_into_source_table_drops_placeholder_and_empty_columns() {
        let raw = RawTable::new(
            strings(&["Código", "", "Nome", "Vazio"]),
            vec![
                strings(&["0012", "x", "Mesa", ""]),
                strings(&["", "", "", ""]),
                strings(&[" 0013 ", "", "Cadeira"]),
            ],
        );
        let table = raw.into_source_table("siga.csv").unwrap();

        assert_eq!(table.label, "siga.csv");
        assert_eq!(table.column_names(), vec!["Código", "Nome"]);
        assert_eq!(table.height(), 2);
        assert_eq!(column_value_string(&table.data, "Código", 1), "0013");
    }

    #[test]
    fn test_rows_wider_than_header_are_kept_aligned() {
        let raw = RawTable::new(
            strings(&["A", "B"]),
            vec![strings(&["1", "2", "extra"]), strings(&["3", "4"])],
        );
        let table = raw.into_source_table("wide.csv").unwrap();
        assert_eq!(column_names(&table.data), vec!["A", "B"]);
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let raw = RawTable::new(strings(&["A", "B"]), Vec::new());
        let err = raw.into_source_table("empty.csv").unwrap_err();
        assert!(matches!(err, IngestError::EmptyTable { .. }));
    }
}

//! Polars helpers for text-only tables.
//!
//! Source tables are loaded with every cell as text so identifiers such as
//! `0012` survive untouched. These helpers keep that contract when frames are
//! built, read back, and rendered for searching.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use recon_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("0012")), "0012");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros after decimal.
///
/// Spreadsheet readers hand back every number as a float; this keeps `12.0`
/// rendered as `12` while leaving integer digits alone.
///
/// # Examples
///
/// ```
/// use recon_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(40.0), "40");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Builds a frame of text columns.
///
/// `columns` holds one vector of cells per header, in header order. Every
/// vector must have the same length.
pub fn string_frame(headers: &[String], columns: Vec<Vec<String>>) -> PolarsResult<DataFrame> {
    let cols: Vec<Column> = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();
    DataFrame::new(cols)
}

/// Builds a frame of text columns from rows.
///
/// Each row must hold one cell per header; short rows leave their columns
/// shorter and fail frame construction.
pub fn rows_frame<I>(headers: &[String], rows: I) -> PolarsResult<DataFrame>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }
    string_frame(headers, columns)
}

/// Column names of a frame, in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Get a string value from a DataFrame column at the given row index.
///
/// Missing columns and out-of-range rows read as empty.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// Extract every value of a column as text.
///
/// Returns `None` when the column does not exist.
pub fn column_values(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Some(values)
}

/// Every cell of one row as text, in column order.
pub fn row_values(df: &DataFrame, idx: usize) -> Vec<String> {
    df.get_columns()
        .iter()
        .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Renders every cell of one row, lowercased and joined by a single space.
///
/// Used for case-insensitive substring search across all columns.
pub fn render_row(df: &DataFrame, idx: usize) -> String {
    let mut parts = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        if !value.is_empty() {
            parts.push(value.to_lowercase());
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(10.5), "10.5");
    }

    #[test]
    fn test_string_frame_keeps_leading_zeros() {
        let df = string_frame(
            &headers(&["Código", "Nome"]),
            vec![cells(&["0012", "0013"]), cells(&["Mesa", "Cadeira"])],
        )
        .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(column_names(&df), vec!["Código", "Nome"]);
        assert_eq!(column_value_string(&df, "Código", 0), "0012");
        assert_eq!(
            column_values(&df, "Nome"),
            Some(vec!["Mesa".to_string(), "Cadeira".to_string()])
        );
    }

    #[test]
    fn test_column_value_missing_column() {
        let df = string_frame(&headers(&["A"]), vec![cells(&["x"])]).unwrap();
        assert_eq!(column_value_string(&df, "B", 0), "");
        assert!(column_values(&df, "B").is_none());
    }

    #[test]
    fn test_rows_frame_round_trips_rows() {
        let df = rows_frame(
            &headers(&["A", "B"]),
            vec![cells(&["1", "x"]), cells(&["2", ""])],
        )
        .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(row_values(&df, 1), cells(&["2", ""]));
    }

    #[test]
    fn test_rows_frame_without_rows_keeps_headers() {
        let df = rows_frame(&headers(&["A", "B"]), Vec::new()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(column_names(&df), vec!["A", "B"]);
    }

    #[test]
    fn test_render_row_lowercases_and_skips_empty() {
        let df = string_frame(
            &headers(&["A", "B", "C"]),
            vec![cells(&["Banco"]), cells(&[""]), cells(&["FORM-00001"])],
        )
        .unwrap();
        assert_eq!(render_row(&df, 0), "banco form-00001");
    }
}

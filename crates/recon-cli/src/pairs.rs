//! Scripted pairings: a delimited file of `registry_id,unique_key` lines.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// One pairing request. `unique_key` is `None` to clear a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairLine {
    /// 1-based line number in the source file.
    pub line: usize,
    pub registry_id: String,
    pub unique_key: Option<String>,
}

pub fn read_pairs(path: &Path) -> Result<Vec<PairLine>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read pairs file {}", path.display()))?;
    parse_pairs(&bytes).with_context(|| format!("parse pairs file {}", path.display()))
}

/// Parse comma or semicolon separated pairs.
///
/// A first line whose first cell is `registry_id` is treated as a header.
/// Blank lines are skipped.
pub fn parse_pairs(bytes: &[u8]) -> Result<Vec<PairLine>> {
    let text = std::str::from_utf8(bytes).context("pairs file is not UTF-8")?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = if text.lines().next().is_some_and(|line| line.contains(';')) {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut pairs = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(idx + 1, |pos| pos.line() as usize);
        let registry_id = record.get(0).unwrap_or("").trim();
        let unique_key = record.get(1).unwrap_or("").trim();
        if registry_id.is_empty() && unique_key.is_empty() {
            continue;
        }
        if idx == 0 && registry_id.eq_ignore_ascii_case("registry_id") {
            continue;
        }
        if registry_id.is_empty() {
            bail!("line {line}: missing registry id");
        }
        pairs.push(PairLine {
            line,
            registry_id: registry_id.to_string(),
            unique_key: (!unique_key.is_empty()).then(|| unique_key.to_string()),
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_blank_key() {
        let pairs = parse_pairs(b"registry_id,unique_key\n100,X-01\n\n200,\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].registry_id, "100");
        assert_eq!(pairs[0].unique_key.as_deref(), Some("X-01"));
        assert_eq!(pairs[1].unique_key, None);
    }

    #[test]
    fn test_semicolon_without_header() {
        let pairs = parse_pairs("\u{feff}100;Y\n".as_bytes()).unwrap();
        assert_eq!(pairs[0].unique_key.as_deref(), Some("Y"));
        assert_eq!(pairs[0].line, 1);
    }

    #[test]
    fn test_missing_registry_id() {
        let err = parse_pairs(b"100,X\n,Y\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}

//! SQLite-backed pairing history.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, Row, params};
use tracing::{debug, info};

use crate::error::{PersistenceError, Result};
use crate::schema::{SCHEMA, SCHEMA_VERSION};
use crate::types::{HistoryEntry, PairingRecord};

const INSERT_SQL: &str = "
INSERT INTO pairings (
    project, registry_id, registry_name, registry_note, registry_location,
    survey_key, survey_name, survey_note, survey_location, operator, saved_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

const SELECT_SQL: &str = "
SELECT id, project, registry_id, registry_name, registry_note, registry_location,
       survey_key, survey_name, survey_note, survey_location, operator, saved_at
FROM pairings
WHERE project = ?1
ORDER BY id";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Handle to a history database file.
///
/// Holds only the path; each operation opens its own connection.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Open (creating if needed) the database at `path` and ensure its schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        if let Some(parent) = store.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path).map_err(|source| PersistenceError::Open {
            path: self.path.clone(),
            source,
        })
    }

    /// Create the table and index if they are missing.
    ///
    /// Rejects databases stamped with a newer schema version.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        let found: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|source| PersistenceError::Schema { source })?;
        if found > SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedSchema {
                found,
                max_supported: SCHEMA_VERSION,
            });
        }
        conn.execute_batch(SCHEMA)
            .map_err(|source| PersistenceError::Schema { source })?;
        debug!(path = %self.path.display(), "history schema ready");
        Ok(())
    }

    /// Append one row per record in a single transaction.
    ///
    /// Every row of one call shares the same timestamp. Returns the number
    /// of rows written.
    pub fn append_records(
        &self,
        project: &str,
        records: &[PairingRecord],
        operator: &str,
    ) -> Result<usize> {
        let project = validate_project(project)?;
        let saved_at = format_timestamp(Utc::now());
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .map_err(PersistenceError::query("save"))?;
        {
            let mut stmt = tx
                .prepare(INSERT_SQL)
                .map_err(PersistenceError::query("save"))?;
            for record in records {
                stmt.execute(params![
                    project,
                    record.registry_id,
                    record.registry_name,
                    record.registry_note,
                    record.registry_location,
                    record.survey_key,
                    record.survey_name,
                    record.survey_note,
                    record.survey_location,
                    operator,
                    saved_at,
                ])
                .map_err(PersistenceError::query("save"))?;
            }
        }
        tx.commit().map_err(PersistenceError::query("save"))?;
        info!(project, rows = records.len(), operator, "pairings saved");
        Ok(records.len())
    }

    /// All rows for `project`, in insertion order.
    pub fn load_records(&self, project: &str) -> Result<Vec<HistoryEntry>> {
        let project = validate_project(project)?;
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(SELECT_SQL)
            .map_err(PersistenceError::query("load"))?;
        let raw = stmt
            .query_map(params![project], raw_entry)
            .map_err(PersistenceError::query("load"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(PersistenceError::query("load"))?;

        let entries = raw
            .into_iter()
            .map(|(mut entry, saved_at)| {
                entry.saved_at = parse_timestamp(&saved_at)?;
                Ok(entry)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(project, rows = entries.len(), "history loaded");
        Ok(entries)
    }

    /// Distinct project names, sorted.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT project FROM pairings ORDER BY project")
            .map_err(PersistenceError::query("list projects in"))?;
        stmt.query_map([], |row| row.get::<_, String>(0))
            .map_err(PersistenceError::query("list projects in"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(PersistenceError::query("list projects in"))
    }

    /// Delete every row for `project`. Returns the number of rows removed.
    pub fn clear_project(&self, project: &str) -> Result<usize> {
        let project = validate_project(project)?;
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM pairings WHERE project = ?1", params![project])
            .map_err(PersistenceError::query("clear"))?;
        info!(project, removed, "project history cleared");
        Ok(removed)
    }
}

fn validate_project(project: &str) -> Result<&str> {
    let trimmed = project.trim();
    if trimmed.is_empty() {
        return Err(PersistenceError::EmptyProjectName);
    }
    Ok(trimmed)
}

fn raw_entry(row: &Row<'_>) -> rusqlite::Result<(HistoryEntry, String)> {
    let entry = HistoryEntry {
        id: row.get(0)?,
        project: row.get(1)?,
        record: PairingRecord {
            registry_id: row.get(2)?,
            registry_name: row.get(3)?,
            registry_note: row.get(4)?,
            registry_location: row.get(5)?,
            survey_key: row.get(6)?,
            survey_name: row.get(7)?,
            survey_note: row.get(8)?,
            survey_location: row.get(9)?,
        },
        operator: row.get(10)?,
        saved_at: DateTime::<Utc>::UNIX_EPOCH,
    };
    Ok((entry, row.get(11)?))
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts the stored second-precision form and full RFC 3339.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| PersistenceError::TimestampParse {
            value: value.to_string(),
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let at = parse_timestamp("2024-03-05T14:07:09").unwrap();
        assert_eq!(format_timestamp(at), "2024-03-05T14:07:09");
    }

    #[test]
    fn test_timestamp_accepts_rfc3339() {
        let at = parse_timestamp("2024-03-05T14:07:09+00:00").unwrap();
        assert_eq!(format_timestamp(at), "2024-03-05T14:07:09");
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, PersistenceError::TimestampParse { .. }));
    }

    #[test]
    fn test_validate_project() {
        assert_eq!(validate_project("  inv-2024 ").unwrap(), "inv-2024");
        assert!(validate_project("   ").is_err());
    }
}

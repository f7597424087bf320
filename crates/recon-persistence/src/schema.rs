//! SQL schema for the pairing history.

/// Version stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
-- Strictly append-only: one row per registry record per save.
CREATE TABLE IF NOT EXISTS pairings (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    project           TEXT NOT NULL,
    registry_id       TEXT NOT NULL,
    registry_name     TEXT NOT NULL DEFAULT '',
    registry_note     TEXT NOT NULL DEFAULT '',
    registry_location TEXT NOT NULL DEFAULT '',
    survey_key        TEXT NOT NULL DEFAULT '',  -- empty when the row was pending
    survey_name       TEXT NOT NULL DEFAULT '',
    survey_note       TEXT NOT NULL DEFAULT '',
    survey_location   TEXT NOT NULL DEFAULT '',
    operator          TEXT NOT NULL,
    saved_at          TEXT NOT NULL              -- UTC, second precision
);

CREATE INDEX IF NOT EXISTS pairings_project_idx ON pairings(project);

PRAGMA user_version = 1;
";

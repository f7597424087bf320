use chrono::{DateTime, Utc};
use serde::Serialize;

/// One registry row as saved: its own fields plus the claimed survey row's.
///
/// Survey fields are empty when the registry row had no claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairingRecord {
    pub registry_id: String,
    pub registry_name: String,
    pub registry_note: String,
    pub registry_location: String,
    pub survey_key: String,
    pub survey_name: String,
    pub survey_note: String,
    pub survey_location: String,
}

impl PairingRecord {
    pub fn is_paired(&self) -> bool {
        !self.survey_key.trim().is_empty()
    }
}

/// A persisted record with its save metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub project: String,
    pub record: PairingRecord,
    pub operator: String,
    pub saved_at: DateTime<Utc>,
}

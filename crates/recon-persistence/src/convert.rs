//! Conversions between a live session and persisted records.

use recon_map::{PairingSession, RegistryTable, RestoreReport, SurveyTable};

use crate::types::{HistoryEntry, PairingRecord};

/// One record per registry row, in table order.
///
/// Pending rows are included with empty survey fields so a later save can
/// clear an earlier claim.
pub fn records_from_session(
    registry: &RegistryTable,
    survey: &SurveyTable,
    session: &PairingSession,
) -> Vec<PairingRecord> {
    registry
        .records
        .iter()
        .map(|record| {
            let mut saved = PairingRecord {
                registry_id: record.registry_id.clone(),
                registry_name: record.display_name.clone(),
                registry_note: record.note.clone(),
                registry_location: record.location.clone(),
                ..PairingRecord::default()
            };
            if let Some(target) = session
                .claim_of(&record.registry_id)
                .and_then(|key| survey.record(key))
            {
                saved.survey_key = target.unique_key.clone();
                saved.survey_name = target.display_name.clone();
                saved.survey_note = target.note.clone();
                saved.survey_location = target.location.clone();
            }
            saved
        })
        .collect()
}

/// Rebuild session claims from history entries in insertion order.
pub fn restore_session(session: &mut PairingSession, entries: &[HistoryEntry]) -> RestoreReport {
    session.restore(entries.iter().map(|entry| {
        (
            entry.record.registry_id.as_str(),
            entry.record.survey_key.as_str(),
        )
    }))
}

//! Saving and restoring pairings through a database file.

use recon_common::string_frame;
use recon_map::{ColumnRules, PairingSession, RegistryTable, SurveyTable, map_registry, map_survey};
use recon_model::{PairingStatus, SourceTable};
use recon_persistence::{
    HistoryStore, PairingRecord, PersistenceError, SCHEMA_VERSION, records_from_session,
    restore_session,
};
use tempfile::TempDir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn tables() -> (RegistryTable, SurveyTable) {
    let rules = ColumnRules::default();
    let registry = map_registry(
        SourceTable::new(
            "siga.csv",
            string_frame(
                &strings(&["Código", "Nome", "Dependência"]),
                vec![
                    strings(&["100", "200", "300"]),
                    strings(&["Mesa", "Cadeira", "Armário"]),
                    strings(&["Sala 1", "Sala 2", "Sala 3"]),
                ],
            )
            .unwrap(),
        ),
        &rules,
    );
    let survey = map_survey(
        SourceTable::new(
            "form.csv",
            string_frame(
                &strings(&["Submission ID", "Nome / Tipo de Bens"]),
                vec![strings(&["X", "X", "Y"]), strings(&["Mesa", "Mesa", "Cadeira"])],
            )
            .unwrap(),
        ),
        &rules,
    );
    (registry, survey)
}

fn store(dir: &TempDir) -> HistoryStore {
    HistoryStore::open(dir.path().join("data").join("history.db")).unwrap()
}

#[test]
fn scenario_saved_claims_survive_restart() {
    let dir = TempDir::new().unwrap();
    let (registry, survey) = tables();

    let mut session = PairingSession::for_tables(&registry, &survey);
    session.propose("100", Some("X-02")).unwrap();
    session.propose("200", Some("Y")).unwrap();
    let records = records_from_session(&registry, &survey, &session);
    assert_eq!(records.len(), 3);
    assert!(!records[2].is_paired());

    let written = store(&dir).append_records("inv-2024", &records, "ana").unwrap();
    assert_eq!(written, 3);

    // Fresh handle, fresh session.
    let reopened = store(&dir);
    let entries = reopened.load_records("inv-2024").unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert_eq!(entries[0].operator, "ana");
    assert_eq!(entries[0].record.registry_location, "Sala 1");
    assert_eq!(entries[1].record.survey_name, "Cadeira");

    let mut restored = PairingSession::for_tables(&registry, &survey);
    let report = restore_session(&mut restored, &entries);
    assert_eq!(report.restored, 2);
    assert_eq!(report.cleared, 1);
    assert_eq!(restored.claim_of("100"), Some("X-02"));
    assert_eq!(restored.claim_of("200"), Some("Y"));
    assert_eq!(restored.status("300"), PairingStatus::Pending);
}

#[test]
fn later_save_overrides_earlier_rows() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let (registry, survey) = tables();

    let mut session = PairingSession::for_tables(&registry, &survey);
    session.propose("100", Some("X-01")).unwrap();
    store
        .append_records("p", &records_from_session(&registry, &survey, &session), "a")
        .unwrap();

    session.propose("100", None).unwrap();
    session.propose("300", Some("X-01")).unwrap();
    store
        .append_records("p", &records_from_session(&registry, &survey, &session), "b")
        .unwrap();

    let entries = store.load_records("p").unwrap();
    assert_eq!(entries.len(), 6);

    let mut restored = PairingSession::for_tables(&registry, &survey);
    restore_session(&mut restored, &entries);
    assert_eq!(restored.claim_of("100"), None);
    assert_eq!(restored.claim_of("300"), Some("X-01"));
}

#[test]
fn projects_are_isolated_and_listed_sorted() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let record = PairingRecord {
        registry_id: "1".into(),
        survey_key: "K".into(),
        ..PairingRecord::default()
    };

    store.append_records("zeta", &[record.clone()], "op").unwrap();
    store.append_records("alpha", &[record.clone(), record], "op").unwrap();

    assert_eq!(store.list_projects().unwrap(), strings(&["alpha", "zeta"]));
    assert_eq!(store.load_records("zeta").unwrap().len(), 1);
    assert!(store.load_records("missing").unwrap().is_empty());

    assert_eq!(store.clear_project("alpha").unwrap(), 2);
    assert_eq!(store.list_projects().unwrap(), strings(&["zeta"]));
    assert_eq!(store.clear_project("alpha").unwrap(), 0);
}

#[test]
fn unknown_ids_in_history_are_reported() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let (registry, survey) = tables();
    let records = vec![
        PairingRecord {
            registry_id: "999".into(),
            survey_key: "Y".into(),
            ..PairingRecord::default()
        },
        PairingRecord {
            registry_id: "100".into(),
            survey_key: "GONE".into(),
            ..PairingRecord::default()
        },
    ];
    store.append_records("p", &records, "op").unwrap();

    let mut session = PairingSession::for_tables(&registry, &survey);
    let report = restore_session(&mut session, &store.load_records("p").unwrap());
    assert_eq!(report.restored, 0);
    assert_eq!(report.unknown_registry, strings(&["999"]));
    assert_eq!(report.unknown_survey, strings(&["GONE"]));
    assert_eq!(session.paired_count(), 0);
}

#[test]
fn blank_project_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = store(&dir).append_records("  ", &[], "op").unwrap_err();
    assert!(matches!(err, PersistenceError::EmptyProjectName));
}

#[test]
fn newer_schema_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION + 1))
            .unwrap();
    }
    let err = HistoryStore::open(&path).unwrap_err();
    assert!(matches!(err, PersistenceError::UnsupportedSchema { .. }));
}

#[test]
fn open_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.db");
    HistoryStore::open(&path).unwrap();
    let store = HistoryStore::open(&path).unwrap();
    assert!(store.list_projects().unwrap().is_empty());
    assert_eq!(store.path(), path.as_path());
}

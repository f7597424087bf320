use recon_model::{ExportSet, MatchRule, PairingStatus, Role, RoleResolution, Side, SurveyRecord};

fn survey(key: &str, name: &str, note: &str, location: &str) -> SurveyRecord {
    SurveyRecord {
        row: 0,
        unique_key: key.to_string(),
        raw_id: key.to_string(),
        display_name: name.to_string(),
        note: note.to_string(),
        location: location.to_string(),
    }
}

#[test]
fn internal_names_are_fixed_per_side() {
    assert_eq!(Role::Identifier.internal_name(Side::Registry), "registry_id");
    assert_eq!(Role::Identifier.internal_name(Side::Survey), "raw_id");
    assert_eq!(Role::Name.internal_name(Side::Survey), "display_name");
    assert_eq!(Role::Location.internal_name(Side::Registry), "location");
    assert_eq!(Side::Survey.key_column(), "unique_key");
}

#[test]
fn role_parses_case_insensitively() {
    assert_eq!("Identifier".parse::<Role>(), Ok(Role::Identifier));
    assert_eq!(" notes ".parse::<Role>(), Ok(Role::Note));
    assert!("price".parse::<Role>().is_err());
}

#[test]
fn fallback_resolution_has_no_column() {
    let resolution = RoleResolution::fallback(Role::Location);
    assert!(resolution.is_fallback());
    assert!(resolution.column.is_none());
    assert_eq!(resolution.rule, MatchRule::Fallback);
}

#[test]
fn survey_labels_include_note_and_location_only_when_present() {
    let bare = survey("X-01", "Banco", "", "");
    assert_eq!(bare.option_label(), "X-01 — Banco");
    assert_eq!(bare.match_text(), "X-01 | Banco");

    let full = survey("X-02", "Banco", "madeira", "Sala 2");
    assert_eq!(full.option_label(), "X-02 — Banco — madeira  |  Dep: Sala 2");
    assert_eq!(full.match_text(), "X-02 | Banco (madeira)");
}

#[test]
fn export_set_labels_and_files() {
    let labels: Vec<&str> = ExportSet::ALL.iter().map(ExportSet::label).collect();
    assert_eq!(labels, vec!["Paired", "Somente-Registry", "Somente-Survey"]);
    assert_eq!(ExportSet::SurveyOnly.file_name(), "survey_only.csv");
    assert_eq!(PairingStatus::Pending.to_string(), "Pending");
}

#[test]
fn side_serializes_lowercase() {
    let json = serde_json::to_string(&Side::Registry).unwrap();
    assert_eq!(json, "\"registry\"");
}

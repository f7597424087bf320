//! Column detection and record construction.
//!
//! Roles are resolved by case-insensitive exact match over the candidate list
//! in priority order, then by case-insensitive substring match in the same
//! order (candidates shorter than three characters, such as `ID`, only match
//! exactly), then by a fixed fallback: the 0-based row index for the identifier
//! and an empty column for every other role.

use std::collections::HashMap;

use polars::prelude::{DataFrame, PolarsResult};
use recon_common::{column_value_string, column_values, render_row, rows_frame};
use recon_model::{
    MatchRule, RegistryRecord, Role, RoleResolution, Side, SourceTable, SurveyRecord,
};
use tracing::{debug, info, warn};

use crate::keys::{KeyStats, dedupe_keys};
use crate::rules::{ColumnRules, SideRules};
use crate::utils::fold;

/// Candidates shorter than this never take part in substring matching.
const MIN_SUBSTRING_CHARS: usize = 3;

/// Resolve one role against a table's column names.
///
/// Deterministic: the first candidate (in list order) that matches any column
/// (in column order) wins, exact matches before substring matches.
pub fn find_column(role: Role, columns: &[String], candidates: &[String]) -> RoleResolution {
    let folded: Vec<String> = columns.iter().map(|column| fold(column)).collect();

    for candidate in candidates {
        let needle = fold(candidate);
        if needle.is_empty() {
            continue;
        }
        if let Some(idx) = folded.iter().position(|column| *column == needle) {
            return RoleResolution {
                role,
                column: Some(columns[idx].clone()),
                candidate: Some(candidate.clone()),
                rule: MatchRule::Exact,
            };
        }
    }

    for candidate in candidates {
        let needle = fold(candidate);
        if needle.chars().count() < MIN_SUBSTRING_CHARS {
            continue;
        }
        if let Some(idx) = folded.iter().position(|column| column.contains(&needle)) {
            return RoleResolution {
                role,
                column: Some(columns[idx].clone()),
                candidate: Some(candidate.clone()),
                rule: MatchRule::Substring,
            };
        }
    }

    RoleResolution::fallback(role)
}

/// Resolved role columns of one table.
struct ResolvedColumns {
    resolutions: Vec<RoleResolution>,
    values: HashMap<Role, Vec<String>>,
}

impl ResolvedColumns {
    fn take(&mut self, role: Role) -> Vec<String> {
        self.values.remove(&role).unwrap_or_default()
    }
}

fn resolve(table: &SourceTable, rules: &SideRules, side: Side) -> ResolvedColumns {
    let columns = table.column_names();
    let height = table.height();
    let mut resolutions = Vec::with_capacity(side.roles().len());
    let mut values = HashMap::new();

    for role in side.roles() {
        let resolution = find_column(*role, &columns, rules.candidates(*role));
        let role_values = match &resolution.column {
            Some(column) => {
                debug!(
                    file = %table.label,
                    side = %side,
                    role = %role,
                    column = %column,
                    rule = %resolution.rule,
                    "resolved column"
                );
                column_values(&table.data, column).unwrap_or_else(|| vec![String::new(); height])
            }
            None => {
                warn!(
                    file = %table.label,
                    side = %side,
                    role = %role,
                    "no column matched, applying fallback"
                );
                match role {
                    Role::Identifier => (0..height).map(|idx| idx.to_string()).collect(),
                    _ => vec![String::new(); height],
                }
            }
        };
        values.insert(*role, role_values);
        resolutions.push(resolution);
    }

    ResolvedColumns {
        resolutions,
        values,
    }
}

/// Original headers followed by the internal columns.
///
/// An original header equal to an internal name is renamed `<name>.source`.
fn export_headers(original: &[String], internal: &[&str]) -> Vec<String> {
    let mut headers: Vec<String> = original
        .iter()
        .map(|name| {
            let mut renamed = name.clone();
            while internal.contains(&renamed.as_str()) || original_taken(original, name, &renamed)
            {
                renamed.push_str(".source");
            }
            renamed
        })
        .collect();
    headers.extend(internal.iter().map(|name| (*name).to_string()));
    headers
}

/// Whether a renamed header would collide with another original header.
fn original_taken(original: &[String], own: &str, renamed: &str) -> bool {
    renamed != own && original.iter().any(|other| other == renamed)
}

const REGISTRY_INTERNAL: [&str; 4] = ["registry_id", "display_name", "note", "location"];
const SURVEY_INTERNAL: [&str; 5] = ["unique_key", "raw_id", "display_name", "note", "location"];

/// Registry table with resolved roles and deduplicated ids.
#[derive(Debug, Clone)]
pub struct RegistryTable {
    pub source: SourceTable,
    pub resolutions: Vec<RoleResolution>,
    pub records: Vec<RegistryRecord>,
    pub key_stats: KeyStats,
    index: HashMap<String, usize>,
}

impl RegistryTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, registry_id: &str) -> Option<&RegistryRecord> {
        self.index.get(registry_id).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, registry_id: &str) -> bool {
        self.index.contains_key(registry_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.registry_id.as_str())
    }

    pub fn resolution(&self, role: Role) -> Option<&RoleResolution> {
        self.resolutions.iter().find(|resolution| resolution.role == role)
    }

    /// Export column names: originals (source order) then internal columns.
    pub fn export_headers(&self) -> Vec<String> {
        export_headers(&self.source.column_names(), &REGISTRY_INTERNAL)
    }

    /// Export values for one row, aligned with [`Self::export_headers`].
    pub fn export_values(&self, row: usize) -> Vec<String> {
        let mut values: Vec<String> = self
            .source
            .column_names()
            .iter()
            .map(|column| column_value_string(&self.source.data, column, row))
            .collect();
        if let Some(record) = self.records.get(row) {
            values.extend([
                record.registry_id.clone(),
                record.display_name.clone(),
                record.note.clone(),
                record.location.clone(),
            ]);
        } else {
            values.extend(REGISTRY_INTERNAL.iter().map(|_| String::new()));
        }
        values
    }

    /// Full table with the internal columns appended.
    pub fn frame(&self) -> PolarsResult<DataFrame> {
        rows_frame(&self.export_headers(), (0..self.len()).map(|row| self.export_values(row)))
    }
}

/// Survey table with resolved roles and unique keys.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    pub source: SourceTable,
    pub resolutions: Vec<RoleResolution>,
    pub records: Vec<SurveyRecord>,
    pub key_stats: KeyStats,
    index: HashMap<String, usize>,
    search_text: Vec<String>,
}

impl SurveyTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, unique_key: &str) -> Option<&SurveyRecord> {
        self.index.get(unique_key).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, unique_key: &str) -> bool {
        self.index.contains_key(unique_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.unique_key.as_str())
    }

    pub fn resolution(&self, role: Role) -> Option<&RoleResolution> {
        self.resolutions.iter().find(|resolution| resolution.role == role)
    }

    /// Lowercased text of every column of a row, including the unique key.
    pub fn search_text(&self, row: usize) -> &str {
        self.search_text.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn export_headers(&self) -> Vec<String> {
        export_headers(&self.source.column_names(), &SURVEY_INTERNAL)
    }

    pub fn export_values(&self, row: usize) -> Vec<String> {
        let mut values: Vec<String> = self
            .source
            .column_names()
            .iter()
            .map(|column| column_value_string(&self.source.data, column, row))
            .collect();
        if let Some(record) = self.records.get(row) {
            values.extend([
                record.unique_key.clone(),
                record.raw_id.clone(),
                record.display_name.clone(),
                record.note.clone(),
                record.location.clone(),
            ]);
        } else {
            values.extend(SURVEY_INTERNAL.iter().map(|_| String::new()));
        }
        values
    }

    pub fn frame(&self) -> PolarsResult<DataFrame> {
        rows_frame(&self.export_headers(), (0..self.len()).map(|row| self.export_values(row)))
    }
}

/// Resolve the registry table's roles and build one record per row.
///
/// Registry ids go through the key deduplicator with the `SIGA` placeholder
/// prefix so that every row stays individually addressable.
pub fn map_registry(table: SourceTable, rules: &ColumnRules) -> RegistryTable {
    let side = Side::Registry;
    let mut resolved = resolve(&table, rules.side(side), side);
    let raw_ids = resolved.take(Role::Identifier);
    let names = resolved.take(Role::Name);
    let notes = resolved.take(Role::Note);
    let locations = resolved.take(Role::Location);
    let assignment = dedupe_keys(&raw_ids, side.placeholder_prefix());

    let records: Vec<RegistryRecord> = assignment
        .keys
        .into_iter()
        .enumerate()
        .map(|(row, registry_id)| RegistryRecord {
            row,
            registry_id,
            raw_id: raw_ids.get(row).cloned().unwrap_or_default(),
            display_name: names.get(row).cloned().unwrap_or_default(),
            note: notes.get(row).cloned().unwrap_or_default(),
            location: locations.get(row).cloned().unwrap_or_default(),
        })
        .collect();
    let index = records
        .iter()
        .map(|record| (record.registry_id.clone(), record.row))
        .collect();

    info!(
        file = %table.label,
        rows = records.len(),
        duplicate_groups = assignment.stats.duplicate_groups,
        placeholders = assignment.stats.placeholders,
        "registry mapped"
    );

    RegistryTable {
        source: table,
        resolutions: resolved.resolutions,
        records,
        key_stats: assignment.stats,
        index,
    }
}

/// Resolve the survey table's roles, derive unique keys, build records.
pub fn map_survey(table: SourceTable, rules: &ColumnRules) -> SurveyTable {
    let side = Side::Survey;
    let mut resolved = resolve(&table, rules.side(side), side);
    let raw_ids = resolved.take(Role::Identifier);
    let names = resolved.take(Role::Name);
    let notes = resolved.take(Role::Note);
    let locations = resolved.take(Role::Location);
    let assignment = dedupe_keys(&raw_ids, side.placeholder_prefix());

    let records: Vec<SurveyRecord> = assignment
        .keys
        .into_iter()
        .enumerate()
        .map(|(row, unique_key)| SurveyRecord {
            row,
            unique_key,
            raw_id: raw_ids.get(row).cloned().unwrap_or_default(),
            display_name: names.get(row).cloned().unwrap_or_default(),
            note: notes.get(row).cloned().unwrap_or_default(),
            location: locations.get(row).cloned().unwrap_or_default(),
        })
        .collect();
    let index = records
        .iter()
        .map(|record| (record.unique_key.clone(), record.row))
        .collect();
    let search_text = records
        .iter()
        .map(|record| {
            let rendered = render_row(&table.data, record.row);
            format!("{} {}", record.unique_key.to_lowercase(), rendered)
        })
        .collect();

    info!(
        file = %table.label,
        rows = records.len(),
        duplicate_groups = assignment.stats.duplicate_groups,
        suffixed_rows = assignment.stats.suffixed_rows,
        placeholders = assignment.stats.placeholders,
        "survey mapped"
    );

    SurveyTable {
        source: table,
        resolutions: resolved.resolutions,
        records,
        key_stats: assignment.stats,
        index,
        search_text,
    }
}

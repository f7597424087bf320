//! Terminal tables for command output.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use recon_map::{KeyStats, PairingSession, PairingSummary, RestoreReport, Suggestion};
use recon_model::{ExportSet, PairingStatus, RegistryRecord, Role, RoleResolution, Side, SurveyRecord};
use recon_persistence::HistoryEntry;
use recon_report::{ExportOptions, PartitionCounts};

/// One-line status for prompts and logs.
pub fn status_line(summary: &PairingSummary) -> String {
    format!(
        "paired {}/{} · pending {} · survey claimed {}/{}",
        summary.paired,
        summary.registry_total,
        summary.pending,
        summary.claimed,
        summary.survey_total
    )
}

/// Resolved column per role, with the rule that picked it.
pub fn resolution_table(resolutions: &[RoleResolution], stats: &KeyStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("Column"),
        header_cell("Rule"),
    ]);
    apply_table_style(&mut table);
    for resolution in resolutions {
        let column = match &resolution.column {
            Some(column) => Cell::new(column),
            None => dim_cell(fallback_note(resolution)),
        };
        let rule = if resolution.is_fallback() {
            Cell::new(resolution.rule.as_str()).fg(Color::Yellow)
        } else {
            Cell::new(resolution.rule.as_str())
        };
        table.add_row(vec![Cell::new(resolution.role.as_str()), column, rule]);
    }
    table.add_row(vec![
        dim_cell("keys"),
        Cell::new(format!(
            "{} duplicate groups, {} suffixed, {} placeholders",
            stats.duplicate_groups, stats.suffixed_rows, stats.placeholders
        )),
        dim_cell("-"),
    ]);
    table
}

fn fallback_note(resolution: &RoleResolution) -> String {
    match resolution.role {
        Role::Identifier => "(row index)".to_string(),
        _ => "(empty)".to_string(),
    }
}

/// Counts of paired / pending registry rows and claimed survey rows.
pub fn summary_table(summary: &PairingSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Side"),
        header_cell("Total"),
        header_cell("Paired"),
        header_cell("Open"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(Side::Registry.as_str()),
        Cell::new(summary.registry_total),
        count_cell(summary.paired, Color::Green),
        count_cell(summary.pending, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new(Side::Survey.as_str()),
        Cell::new(summary.survey_total),
        count_cell(summary.claimed, Color::Green),
        count_cell(summary.unclaimed, Color::Yellow),
    ]);
    table
}

/// Registry rows with their status and current claim.
pub fn registry_rows_table(records: &[&RegistryRecord], session: &PairingSession) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Registry id"),
        header_cell("Name"),
        header_cell("Location"),
        header_cell("Status"),
        header_cell("Claim"),
    ]);
    apply_table_style(&mut table);
    for record in records {
        let status = session.status(&record.registry_id);
        table.add_row(vec![
            Cell::new(&record.registry_id).add_attribute(Attribute::Bold),
            Cell::new(&record.display_name),
            Cell::new(&record.location),
            status_cell(status),
            match session.claim_of(&record.registry_id) {
                Some(key) => Cell::new(key),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

/// Numbered survey options; `current` marks the row already claimed.
pub fn options_table(options: &[&SurveyRecord], current: Option<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Option")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, record) in options.iter().enumerate() {
        let label = record.option_label();
        let option = if current == Some(record.unique_key.as_str()) {
            Cell::new(format!("{label}  (current)"))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(label)
        };
        table.add_row(vec![Cell::new(idx + 1), option]);
    }
    table
}

pub fn suggestions_table(suggestions: &[Suggestion<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Score"),
        header_cell("Key"),
        header_cell("Survey row"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for suggestion in suggestions {
        table.add_row(vec![
            score_cell(suggestion.score),
            Cell::new(&suggestion.record.unique_key).add_attribute(Attribute::Bold),
            Cell::new(suggestion.record.visual_name()),
        ]);
    }
    table
}

pub fn partition_table(counts: &PartitionCounts, options: &ExportOptions) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Set"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for set in ExportSet::ALL {
        let rows = match set {
            ExportSet::Paired => counts.paired,
            ExportSet::RegistryOnly => counts.registry_only,
            ExportSet::SurveyOnly => counts.survey_only,
        };
        table.add_row(vec![Cell::new(options.label(set)), Cell::new(rows)]);
    }
    table
}

pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Saved at (UTC)"),
        header_cell("Operator"),
        header_cell("Registry id"),
        header_cell("Survey key"),
        header_cell("Survey name"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for entry in entries {
        let key = if entry.record.is_paired() {
            Cell::new(&entry.record.survey_key)
        } else {
            dim_cell("(cleared)")
        };
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.saved_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&entry.operator),
            Cell::new(&entry.record.registry_id),
            key,
            Cell::new(&entry.record.survey_name),
        ]);
    }
    table
}

pub fn projects_table(projects: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Project")]);
    apply_table_style(&mut table);
    for project in projects {
        table.add_row(vec![Cell::new(project)]);
    }
    table
}

/// Plain-text account of a history restore.
pub fn restore_lines(report: &RestoreReport) -> Vec<String> {
    let mut lines = vec![format!(
        "restored {} claims ({} cleared, {} superseded)",
        report.restored, report.cleared, report.superseded
    )];
    if !report.unknown_registry.is_empty() {
        lines.push(format!(
            "skipped unknown registry ids: {}",
            report.unknown_registry.join(", ")
        ));
    }
    if !report.unknown_survey.is_empty() {
        lines.push(format!(
            "skipped unknown survey keys: {}",
            report.unknown_survey.join(", ")
        ));
    }
    lines
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: PairingStatus) -> Cell {
    match status {
        PairingStatus::Paired => Cell::new(status.as_str()).fg(Color::Green),
        PairingStatus::Pending => Cell::new(status.as_str()).fg(Color::Yellow),
    }
}

fn score_cell(score: f64) -> Cell {
    let color = if score >= 80.0 {
        Color::Green
    } else if score >= 50.0 {
        Color::Yellow
    } else {
        Color::DarkGrey
    };
    Cell::new(format!("{score:.1}")).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(mut table: Table) -> String {
        table.force_no_tty();
        table.to_string()
    }

    fn summary() -> PairingSummary {
        PairingSummary {
            registry_total: 3,
            paired: 2,
            pending: 1,
            survey_total: 4,
            claimed: 2,
            unclaimed: 2,
        }
    }

    #[test]
    fn test_status_line() {
        insta::assert_snapshot!(
            status_line(&summary()),
            @"paired 2/3 · pending 1 · survey claimed 2/4"
        );
    }

    #[test]
    fn test_summary_table_lists_both_sides() {
        let rendered = plain(summary_table(&summary()));
        assert!(rendered.contains("registry"));
        assert!(rendered.contains("survey"));
        assert!(rendered.contains("Open"));
    }

    #[test]
    fn test_partition_table_uses_labels() {
        let options = ExportOptions {
            survey_only_label: "Survey-only".to_string(),
            ..ExportOptions::default()
        };
        let counts = PartitionCounts {
            paired: 1,
            registry_only: 2,
            survey_only: 3,
        };
        let rendered = plain(partition_table(&counts, &options));
        assert!(rendered.contains("Somente-Registry"));
        assert!(rendered.contains("Survey-only"));
    }

    #[test]
    fn test_restore_lines() {
        let report = RestoreReport {
            restored: 2,
            cleared: 1,
            unknown_registry: vec!["999".to_string()],
            unknown_survey: Vec::new(),
            superseded: 0,
        };
        insta::assert_debug_snapshot!(restore_lines(&report), @r#"
        [
            "restored 2 claims (1 cleared, 0 superseded)",
            "skipped unknown registry ids: 999",
        ]
        "#);
    }
}

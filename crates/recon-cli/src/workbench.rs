//! Loaded tables plus the live pairing session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recon_ingest::load_table_from_path;
use recon_map::{
    ColumnRules, PairingSession, PairingSummary, ProposeOutcome, RegistryTable, RestoreReport,
    Suggestion, SuggestionParams, SurveyTable, map_registry, map_survey, suggest,
};
use recon_model::{PairingStatus, RegistryRecord, SourceTable};
use recon_persistence::{HistoryStore, records_from_session, restore_session};
use recon_report::{
    ExportFormat, ExportOptions, ExportPartition, PartitionCounts, build_partition, export_to_dir,
};
use tracing::{info, info_span, trace, warn};

use crate::logging::redact_value;
use crate::pairs::PairLine;

/// Everything one reconciliation run works on.
#[derive(Debug, Clone)]
pub struct Workbench {
    pub registry: RegistryTable,
    pub survey: SurveyTable,
    pub session: PairingSession,
}

/// Files written by [`Workbench::export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub counts: PartitionCounts,
    pub paths: Vec<PathBuf>,
}

/// Outcome of applying a pairs file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub claimed: usize,
    pub cleared: usize,
    pub unchanged: usize,
    /// `(line, message)` for every rejected pair.
    pub rejected: Vec<(usize, String)>,
}

impl Workbench {
    /// Load and map both files.
    pub fn load(registry_path: &Path, survey_path: &Path, rules: &ColumnRules) -> Result<Self> {
        let span = info_span!("load");
        let _guard = span.enter();
        let registry = load_table_from_path(registry_path)
            .with_context(|| format!("load registry table {}", registry_path.display()))?;
        let survey = load_table_from_path(survey_path)
            .with_context(|| format!("load survey table {}", survey_path.display()))?;
        Ok(Self::from_tables(registry, survey, rules))
    }

    pub fn from_tables(registry: SourceTable, survey: SourceTable, rules: &ColumnRules) -> Self {
        let registry = map_registry(registry, rules);
        let survey = map_survey(survey, rules);
        let session = PairingSession::for_tables(&registry, &survey);
        info!(
            registry_rows = registry.len(),
            survey_rows = survey.len(),
            "workbench ready"
        );
        Self {
            registry,
            survey,
            session,
        }
    }

    pub fn summary(&self) -> PairingSummary {
        self.session.summary()
    }

    /// Registry rows with the given status, in table order.
    pub fn registry_rows(&self, status: Option<PairingStatus>) -> Vec<&RegistryRecord> {
        self.registry
            .records
            .iter()
            .filter(|record| status.is_none_or(|want| self.session.status(&record.registry_id) == want))
            .collect()
    }

    /// First pending registry row after `after` (wrapping), or the first pending row.
    pub fn next_pending(&self, after: Option<&str>) -> Option<&RegistryRecord> {
        let start = after
            .and_then(|id| {
                self.registry
                    .records
                    .iter()
                    .position(|record| record.registry_id == id)
            })
            .map_or(0, |idx| idx + 1);
        let total = self.registry.records.len();
        (0..total)
            .map(|offset| &self.registry.records[(start + offset) % total])
            .find(|record| self.session.status(&record.registry_id) == PairingStatus::Pending)
    }

    /// Ranked unclaimed survey rows for one registry row.
    ///
    /// The query is the registry row's name and note.
    pub fn suggestions_for(
        &self,
        registry_id: &str,
        params: &SuggestionParams,
    ) -> Vec<Suggestion<'_>> {
        let Some(record) = self.registry.record(registry_id) else {
            return Vec::new();
        };
        let query = format!("{} {}", record.display_name, record.note);
        trace!(registry_id, query = redact_value(&query), "ranking suggestions");
        suggest(&query, self.session.unclaimed(&self.survey), params)
    }

    /// Apply `registry_id,unique_key` lines in order; blank keys clear.
    pub fn apply_pairs(&mut self, pairs: &[PairLine]) -> ApplyReport {
        let mut report = ApplyReport::default();
        for pair in pairs {
            let key = pair.unique_key.as_deref();
            match self.session.propose(&pair.registry_id, key) {
                Ok(ProposeOutcome::Claimed { .. }) => report.claimed += 1,
                Ok(ProposeOutcome::Cleared { .. }) => report.cleared += 1,
                Ok(ProposeOutcome::Unchanged) => report.unchanged += 1,
                Err(err) => {
                    warn!(line = pair.line, error = %err, "pair rejected");
                    report.rejected.push((pair.line, err.to_string()));
                }
            }
        }
        report
    }

    /// Replace the session claims with the project's saved history.
    pub fn restore(&mut self, store: &HistoryStore, project: &str) -> Result<RestoreReport> {
        let entries = store
            .load_records(project)
            .with_context(|| format!("load history for project '{project}'"))?;
        let report = restore_session(&mut self.session, &entries);
        info!(project, history_rows = entries.len(), restored = report.restored, "session restored");
        Ok(report)
    }

    /// Append one history row per registry row.
    pub fn save(&self, store: &HistoryStore, project: &str, operator: &str) -> Result<usize> {
        let records = records_from_session(&self.registry, &self.survey, &self.session);
        store
            .append_records(project, &records, operator)
            .with_context(|| format!("save pairings for project '{project}'"))
    }

    pub fn partition(&self, options: &ExportOptions) -> Result<ExportPartition> {
        build_partition(&self.registry, &self.survey, &self.session, options)
            .context("build export partition")
    }

    /// Build the partition and write the requested formats.
    pub fn export(
        &self,
        options: &ExportOptions,
        out_dir: &Path,
        base_name: &str,
        formats: &[ExportFormat],
    ) -> Result<ExportSummary> {
        let partition = self.partition(options)?;
        let paths = export_to_dir(&partition, options, out_dir, base_name, formats)
            .with_context(|| format!("export to {}", out_dir.display()))?;
        Ok(ExportSummary {
            counts: partition.counts(),
            paths,
        })
    }
}

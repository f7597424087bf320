//! Partition of a reconciliation result into three disjoint sets.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use recon_common::rows_frame;
use recon_map::{PairingSession, RegistryTable, SurveyTable};
use recon_model::ExportSet;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::options::ExportOptions;

/// Row counts per set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    pub paired: usize,
    pub registry_only: usize,
    pub survey_only: usize,
}

/// The three export frames. All share the same columns.
#[derive(Debug, Clone)]
pub struct ExportPartition {
    pub paired: DataFrame,
    pub registry_only: DataFrame,
    pub survey_only: DataFrame,
}

impl ExportPartition {
    pub fn set(&self, set: ExportSet) -> &DataFrame {
        match set {
            ExportSet::Paired => &self.paired,
            ExportSet::RegistryOnly => &self.registry_only,
            ExportSet::SurveyOnly => &self.survey_only,
        }
    }

    pub fn counts(&self) -> PartitionCounts {
        PartitionCounts {
            paired: self.paired.height(),
            registry_only: self.registry_only.height(),
            survey_only: self.survey_only.height(),
        }
    }

    /// Paired, then registry-only, then survey-only rows in one frame.
    pub fn flat(&self) -> Result<DataFrame> {
        let mut flat = self.paired.clone();
        flat.vstack_mut(&self.registry_only)?;
        flat.vstack_mut(&self.survey_only)?;
        Ok(flat)
    }
}

/// Compute the three sets from the mapped tables and the session claims.
///
/// Every registry row lands in exactly one of Paired / Registry-only and
/// every survey row in exactly one of Paired / Survey-only. Columns: all
/// registry columns prefixed, all survey columns prefixed, then the status.
pub fn build_partition(
    registry: &RegistryTable,
    survey: &SurveyTable,
    session: &PairingSession,
    options: &ExportOptions,
) -> Result<ExportPartition> {
    let registry_headers = registry.export_headers();
    let survey_headers = survey.export_headers();

    let mut headers: Vec<String> = registry_headers
        .iter()
        .map(|name| format!("{}{name}", options.registry_prefix))
        .collect();
    headers.extend(
        survey_headers
            .iter()
            .map(|name| format!("{}{name}", options.survey_prefix)),
    );
    headers.push(options.status_column.clone());

    let empty_registry = vec![String::new(); registry_headers.len()];
    let empty_survey = vec![String::new(); survey_headers.len()];
    let row = |registry_values: Vec<String>, survey_values: Vec<String>, set: ExportSet| {
        let mut values = registry_values;
        values.extend(survey_values);
        values.push(options.label(set).to_string());
        values
    };

    let mut paired = Vec::new();
    let mut registry_only = Vec::new();
    let mut paired_keys: HashSet<&str> = HashSet::new();

    for record in &registry.records {
        let target = session
            .claim_of(&record.registry_id)
            .and_then(|key| survey.record(key));
        match target {
            Some(target) => {
                paired_keys.insert(target.unique_key.as_str());
                paired.push(row(
                    registry.export_values(record.row),
                    survey.export_values(target.row),
                    ExportSet::Paired,
                ));
            }
            None => registry_only.push(row(
                registry.export_values(record.row),
                empty_survey.clone(),
                ExportSet::RegistryOnly,
            )),
        }
    }

    let survey_only: Vec<Vec<String>> = survey
        .records
        .iter()
        .filter(|record| !paired_keys.contains(record.unique_key.as_str()))
        .map(|record| {
            row(
                empty_registry.clone(),
                survey.export_values(record.row),
                ExportSet::SurveyOnly,
            )
        })
        .collect();

    let partition = ExportPartition {
        paired: rows_frame(&headers, paired)?,
        registry_only: rows_frame(&headers, registry_only)?,
        survey_only: rows_frame(&headers, survey_only)?,
    };
    let counts = partition.counts();
    info!(
        paired = counts.paired,
        registry_only = counts.registry_only,
        survey_only = counts.survey_only,
        "export partition built"
    );
    Ok(partition)
}

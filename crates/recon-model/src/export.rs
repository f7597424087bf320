use serde::{Deserialize, Serialize};
use std::fmt;

/// The three disjoint partitions of a reconciliation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExportSet {
    /// Registry rows with a claim, joined to the claimed survey row.
    Paired,
    /// Registry rows without a claim.
    RegistryOnly,
    /// Survey rows claimed by no registry row.
    SurveyOnly,
}

impl ExportSet {
    pub const ALL: [ExportSet; 3] = [
        ExportSet::Paired,
        ExportSet::RegistryOnly,
        ExportSet::SurveyOnly,
    ];

    /// Status tag written in the `status` column; also the sheet name.
    pub fn label(&self) -> &'static str {
        match self {
            ExportSet::Paired => "Paired",
            ExportSet::RegistryOnly => "Somente-Registry",
            ExportSet::SurveyOnly => "Somente-Survey",
        }
    }

    /// File name used inside the zip bundle.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportSet::Paired => "paired.csv",
            ExportSet::RegistryOnly => "registry_only.csv",
            ExportSet::SurveyOnly => "survey_only.csv",
        }
    }
}

impl fmt::Display for ExportSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

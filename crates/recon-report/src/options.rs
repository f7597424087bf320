use std::fmt;
use std::str::FromStr;

use recon_model::ExportSet;
use serde::{Deserialize, Serialize};

/// Column naming and labels used by the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Prefix for every registry column.
    pub registry_prefix: String,
    /// Prefix for every survey column.
    pub survey_prefix: String,
    /// Name of the trailing status column.
    pub status_column: String,
    pub paired_label: String,
    pub registry_only_label: String,
    pub survey_only_label: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            registry_prefix: "SIGA__".to_string(),
            survey_prefix: "FORM__".to_string(),
            status_column: "status".to_string(),
            paired_label: ExportSet::Paired.label().to_string(),
            registry_only_label: ExportSet::RegistryOnly.label().to_string(),
            survey_only_label: ExportSet::SurveyOnly.label().to_string(),
        }
    }
}

impl ExportOptions {
    /// Status tag and sheet name for one set.
    pub fn label(&self, set: ExportSet) -> &str {
        match set {
            ExportSet::Paired => &self.paired_label,
            ExportSet::RegistryOnly => &self.registry_only_label,
            ExportSet::SurveyOnly => &self.survey_only_label,
        }
    }
}

/// Output file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One worksheet per set.
    Xlsx,
    /// All sets in one flat file.
    Csv,
    /// One CSV per set.
    Zip,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Zip];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Zip => "zip",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "zip" => Ok(ExportFormat::Zip),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_follow_export_sets() {
        let options = ExportOptions::default();
        assert_eq!(options.label(ExportSet::Paired), "Paired");
        assert_eq!(options.label(ExportSet::SurveyOnly), "Somente-Survey");
        assert_eq!(options.registry_prefix, "SIGA__");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert_eq!(" zip".parse::<ExportFormat>(), Ok(ExportFormat::Zip));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}

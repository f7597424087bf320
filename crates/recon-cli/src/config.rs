//! Optional TOML configuration.
//!
//! Every section is optional; missing keys keep the built-in defaults.
//!
//! ```toml
//! [columns.survey]
//! identifier = ["Submission ID", "Protocolo"]
//!
//! [export]
//! paired_label = "Pareado"
//!
//! [suggestions]
//! top_k = 3
//! min_score = 60.0
//!
//! [history]
//! db_path = "data/history.db"
//! operator = "ana"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use recon_map::{ColumnRules, RulesOverride, SuggestionParams};
use recon_report::ExportOptions;
use serde::Deserialize;

/// Default history database, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "history.db";

/// Operator name used when neither flags, config nor environment give one.
pub const DEFAULT_OPERATOR: &str = "local";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    /// Candidate column names per side and role.
    pub columns: RulesOverride,
    pub export: ExportOptions,
    pub suggestions: SuggestionParams,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub db_path: PathBuf,
    pub operator: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            operator: None,
        }
    }
}

impl ReconConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Defaults when `path` is `None`.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Built-in column rules with the configured overrides applied.
    pub fn rules(&self) -> ColumnRules {
        let mut rules = ColumnRules::default();
        rules.apply(&self.columns);
        rules
    }

    /// Database path: flag, then config.
    pub fn db_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map_or_else(|| self.history.db_path.clone(), Path::to_path_buf)
    }

    /// Operator identity: flag, then config, then `$USER`/`$USERNAME`.
    pub fn operator(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.history.operator.clone())
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_OPERATOR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_model::{Role, Side};

    #[test]
    fn test_empty_config_is_default() {
        let config = ReconConfig::parse("").unwrap();
        assert_eq!(config, ReconConfig::default());
        assert_eq!(config.history.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_partial_overrides() {
        let config = ReconConfig::parse(
            r#"
            [columns.survey]
            identifier = ["Protocolo"]

            [export]
            paired_label = "Pareado"

            [suggestions]
            top_k = 3

            [history]
            operator = "ana"
            "#,
        )
        .unwrap();

        let rules = config.rules();
        assert_eq!(
            rules.side(Side::Survey).candidates(Role::Identifier),
            ["Protocolo".to_string()]
        );
        assert!(!rules.side(Side::Survey).candidates(Role::Name).is_empty());
        assert_eq!(config.export.paired_label, "Pareado");
        assert_eq!(config.export.registry_prefix, "SIGA__");
        assert_eq!(config.suggestions.top_k, 3);
        assert_eq!(config.operator(None), "ana");
        assert_eq!(config.operator(Some("bia")), "bia");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ReconConfig::parse("[export]\nsheet_color = \"red\"\n").is_err());
    }

    #[test]
    fn test_db_path_flag_wins() {
        let config = ReconConfig::default();
        assert_eq!(config.db_path(Some(Path::new("x.db"))), PathBuf::from("x.db"));
        assert_eq!(config.db_path(None), PathBuf::from(DEFAULT_DB_PATH));
    }
}

//! Declarative column detection rules.
//!
//! Each side carries an ordered candidate list per role. Earlier candidates
//! win; the mapper evaluates the lists as pure data.

use recon_model::{Role, Side};
use serde::{Deserialize, Serialize};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Candidate column names for every role of one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideRules {
    pub identifier: Vec<String>,
    pub name: Vec<String>,
    pub note: Vec<String>,
    pub location: Vec<String>,
}

impl SideRules {
    /// Built-in candidates for the asset registry export.
    pub fn registry_defaults() -> Self {
        Self {
            identifier: strings(&["Código", "Codigo", "CODIGO", "Cód. Item", "ID", "Cod"]),
            name: strings(&[
                "Nome",
                "Nome do Bem",
                "Descrição",
                "Descricao",
                "Item",
                "ITEM",
            ]),
            note: strings(&["Observação", "Observacao", "Observações", "Observacoes", "Obs"]),
            location: strings(&["Dependência", "Dependencia", "Localidade", "Local"]),
        }
    }

    /// Built-in candidates for the survey export.
    pub fn survey_defaults() -> Self {
        Self {
            identifier: strings(&[
                "Submission ID",
                "SubmissionID",
                "codigo_form",
                "codigo_formulario",
                "ID",
            ]),
            name: strings(&["Nome / Tipo de Bens", "Nome", "name", "Item", "Tipo"]),
            note: strings(&[
                "Observações",
                "Observacoes",
                "Observacao",
                "Obs",
                "observacao",
            ]),
            location: strings(&[
                "Dependência / Localização",
                "Dependência",
                "Dependencia",
                "Local",
            ]),
        }
    }

    pub fn candidates(&self, role: Role) -> &[String] {
        match role {
            Role::Identifier => &self.identifier,
            Role::Name => &self.name,
            Role::Note => &self.note,
            Role::Location => &self.location,
        }
    }

    /// Replace the lists given in `overrides`, keeping the rest.
    pub fn apply(&mut self, overrides: &SideRulesOverride) {
        if let Some(values) = &overrides.identifier {
            self.identifier = values.clone();
        }
        if let Some(values) = &overrides.name {
            self.name = values.clone();
        }
        if let Some(values) = &overrides.note {
            self.note = values.clone();
        }
        if let Some(values) = &overrides.location {
            self.location = values.clone();
        }
    }
}

/// Column rules for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRules {
    pub registry: SideRules,
    pub survey: SideRules,
}

impl Default for ColumnRules {
    fn default() -> Self {
        Self {
            registry: SideRules::registry_defaults(),
            survey: SideRules::survey_defaults(),
        }
    }
}

impl ColumnRules {
    pub fn side(&self, side: Side) -> &SideRules {
        match side {
            Side::Registry => &self.registry,
            Side::Survey => &self.survey,
        }
    }

    pub fn apply(&mut self, overrides: &RulesOverride) {
        self.registry.apply(&overrides.registry);
        self.survey.apply(&overrides.survey);
    }
}

/// Partial rule lists read from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SideRulesOverride {
    pub identifier: Option<Vec<String>>,
    pub name: Option<Vec<String>>,
    pub note: Option<Vec<String>>,
    pub location: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesOverride {
    pub registry: SideRulesOverride,
    pub survey: SideRulesOverride,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_role() {
        let rules = ColumnRules::default();
        for side in [Side::Registry, Side::Survey] {
            for role in side.roles() {
                assert!(!rules.side(side).candidates(*role).is_empty());
            }
        }
        assert_eq!(rules.survey.identifier[0], "Submission ID");
        assert_eq!(rules.registry.identifier[0], "Código");
    }

    #[test]
    fn test_override_replaces_only_given_lists() {
        let mut rules = ColumnRules::default();
        let overrides: RulesOverride = serde_json::from_str(
            r#"{"survey": {"location": ["Sala"]}}"#,
        )
        .unwrap();
        rules.apply(&overrides);

        assert_eq!(rules.survey.location, vec!["Sala"]);
        assert_eq!(rules.survey.name, SideRules::survey_defaults().name);
        assert_eq!(rules.registry, SideRules::registry_defaults());
    }

    #[test]
    fn test_override_rejects_unknown_roles() {
        let result: Result<RulesOverride, _> =
            serde_json::from_str(r#"{"survey": {"price": ["Valor"]}}"#);
        assert!(result.is_err());
    }
}

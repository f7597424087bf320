use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two input tables a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The authoritative asset registry (SIGA export).
    Registry,
    /// The survey / intake form export (Tally export).
    Survey,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Registry => "registry",
            Side::Survey => "survey",
        }
    }

    /// Prefix for auto-generated keys on blank identifiers.
    pub fn placeholder_prefix(&self) -> &'static str {
        match self {
            Side::Registry => "SIGA",
            Side::Survey => "FORM",
        }
    }

    /// Semantic roles detected on this side, in resolution order.
    pub fn roles(&self) -> &'static [Role] {
        &[Role::Identifier, Role::Name, Role::Note, Role::Location]
    }

    /// Internal column holding the deduplicated key for this side.
    pub fn key_column(&self) -> &'static str {
        match self {
            Side::Registry => "registry_id",
            Side::Survey => "unique_key",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic column roles resolved by the column mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Identifier,
    Name,
    Note,
    Location,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Identifier => "identifier",
            Role::Name => "name",
            Role::Note => "note",
            Role::Location => "location",
        }
    }

    /// Fixed internal column name this role is exposed under.
    ///
    /// The registry identifier is exposed as `registry_id` after
    /// deduplication; the survey identifier keeps its raw value under
    /// `raw_id` and gets its deduplicated value in `unique_key`.
    pub fn internal_name(&self, side: Side) -> &'static str {
        match (self, side) {
            (Role::Identifier, Side::Registry) => "registry_id",
            (Role::Identifier, Side::Survey) => "raw_id",
            (Role::Name, _) => "display_name",
            (Role::Note, _) => "note",
            (Role::Location, _) => "location",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identifier" | "id" => Ok(Role::Identifier),
            "name" => Ok(Role::Name),
            "note" | "notes" => Ok(Role::Note),
            "location" => Ok(Role::Location),
            _ => Err(format!("Unknown column role: {}", s)),
        }
    }
}

/// How a role was resolved to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Case-insensitive equality with a candidate name.
    Exact,
    /// Candidate name contained in the column name, case-insensitive.
    Substring,
    /// No column matched; the role-specific fallback was applied.
    Fallback,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Substring => "substring",
            MatchRule::Fallback => "fallback",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of resolving one role on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResolution {
    pub role: Role,
    /// Source column chosen, `None` when the fallback applied.
    pub column: Option<String>,
    /// Candidate that produced the match, if any.
    pub candidate: Option<String>,
    pub rule: MatchRule,
}

impl RoleResolution {
    pub fn fallback(role: Role) -> Self {
        Self {
            role,
            column: None,
            candidate: None,
            rule: MatchRule::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule == MatchRule::Fallback
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved view of one registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// 0-based position in the source table.
    pub row: usize,
    /// Identifier used for pairing; unique within the table.
    pub registry_id: String,
    /// Identifier as given by the source, before deduplication.
    pub raw_id: String,
    pub display_name: String,
    pub note: String,
    pub location: String,
}

impl RegistryRecord {
    /// Header line shown for the row in pairing lists.
    pub fn header_line(&self) -> String {
        let mut line = format!("{} — {}", self.registry_id, self.display_name);
        if !self.location.trim().is_empty() {
            line.push_str(&format!("  |  Dep: {}", self.location));
        }
        line
    }
}

/// Resolved view of one survey row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// 0-based position in the source table.
    pub row: usize,
    /// Deduplicated key; the only identifier used for pairing.
    pub unique_key: String,
    /// Identifier as given by the source, often duplicated or blank.
    pub raw_id: String,
    pub display_name: String,
    pub note: String,
    pub location: String,
}

impl SurveyRecord {
    /// Name with the note appended when present.
    pub fn visual_name(&self) -> String {
        if self.note.trim().is_empty() {
            self.display_name.clone()
        } else {
            format!("{} — {}", self.display_name, self.note)
        }
    }

    /// Label shown in a candidate list.
    pub fn option_label(&self) -> String {
        let mut label = format!("{} — {}", self.unique_key, self.visual_name());
        if !self.location.trim().is_empty() {
            label.push_str(&format!("  |  Dep: {}", self.location));
        }
        label
    }

    /// Text compared against a query by the suggestion engine:
    /// `key | name (note)`.
    pub fn match_text(&self) -> String {
        if self.note.trim().is_empty() {
            format!("{} | {}", self.unique_key, self.display_name)
        } else {
            format!("{} | {} ({})", self.unique_key, self.display_name, self.note)
        }
    }
}

/// Pairing state of one registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairingStatus {
    Paired,
    Pending,
}

impl PairingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairingStatus::Paired => "Paired",
            PairingStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for PairingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

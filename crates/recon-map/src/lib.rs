#![deny(unsafe_code)]

//! Reconciliation core.
//!
//! - [`rules`]: ordered candidate column names per side and role.
//! - [`mapper`]: resolves roles to columns and builds typed records.
//! - [`keys`]: synthesizes unique keys from non-unique identifiers.
//! - [`session`]: the one-to-one pairing state.
//! - [`suggest`]: advisory fuzzy ranking of survey rows.

pub mod error;
pub mod keys;
pub mod mapper;
pub mod rules;
pub mod session;
pub mod suggest;
mod utils;

pub use error::{PairingError, Result};
pub use keys::{KeyAssignment, KeyStats, dedupe_keys};
pub use mapper::{RegistryTable, SurveyTable, find_column, map_registry, map_survey};
pub use rules::{ColumnRules, RulesOverride, SideRules, SideRulesOverride};
pub use session::{PairingSession, PairingSummary, ProposeOutcome, RestoreReport};
pub use suggest::{Suggestion, SuggestionParams, suggest, token_set_ratio};

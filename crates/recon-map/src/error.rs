//! Error types for pairing operations.

use thiserror::Error;

/// Errors from pairing session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    /// Registry id not present in the loaded registry table.
    #[error("registry id not found: {0}")]
    UnknownRegistryId(String),

    /// Survey key not present in the loaded survey table.
    #[error("survey key not found: {0}")]
    UnknownSurveyKey(String),

    /// Target is already claimed by another registry row.
    #[error("survey key '{key}' is already paired with registry id '{holder}'")]
    TargetClaimed { key: String, holder: String },
}

/// Result type for pairing operations.
pub type Result<T> = std::result::Result<T, PairingError>;

//! Data model for manual inventory reconciliation.
//!
//! Two tables meet here: the authoritative asset registry ("SIGA") and the
//! free-form survey export ("Form"). Each registry row may be paired with at
//! most one survey row; the result is partitioned into three export sets.

pub mod export;
pub mod record;
pub mod side;
pub mod table;

pub use export::ExportSet;
pub use record::{PairingStatus, RegistryRecord, SurveyRecord};
pub use side::{MatchRule, Role, RoleResolution, Side};
pub use table::SourceTable;

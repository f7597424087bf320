//! Pairing history persistence.
//!
//! Saved pairings live in one append-only SQLite table. Each save appends a
//! row per registry record, tagged with project, operator and a UTC
//! timestamp; nothing is updated in place. A session is rebuilt from the
//! latest row per registry id.
//!
//! Every operation opens the database, does its work, and closes it again.

mod convert;
mod error;
mod schema;
mod store;
mod types;

pub use convert::{records_from_session, restore_session};
pub use error::{PersistenceError, Result};
pub use schema::{SCHEMA, SCHEMA_VERSION};
pub use store::HistoryStore;
pub use types::{HistoryEntry, PairingRecord};

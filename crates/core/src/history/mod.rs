//! NAV history ingestion.
//!
//! The primary table's raw records are turned into dated NAV
//! observations and the stored series is replaced wholesale on every
//! run; the source sheet is the system of record for history, so a
//! correction upstream simply flows through on the next sync.

mod ingest;
mod model;
mod store;

pub use ingest::build_history;
pub use model::NavHistoryPoint;
pub use store::NavHistoryStore;

//! Sync orchestration.
//!
//! One sync run walks every configured source table, normalizes and
//! reconciles its records into the fund registry, refreshes the NAV
//! history from the primary table, and recomputes risk metrics from
//! the refreshed series. Failures are isolated at record and table
//! granularity: a bad record or an unreachable table is reported and
//! the run keeps going. Only an authentication failure aborts the run,
//! since nothing downstream can succeed without a token.

mod report;
mod service;

pub use report::{SyncLogEntry, SyncLogStore, SyncReport};
pub use service::SyncService;

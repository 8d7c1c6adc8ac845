//! Fund registry - domain model, store trait, and reconciliation.

mod convert;
mod model;
mod reconciler;
mod store;

pub use convert::convert_record;
pub use model::{Fund, FundDraft, FundStatus};
pub use reconciler::{resolve_match, Reconciler, UpsertOutcome};
pub use store::FundStore;

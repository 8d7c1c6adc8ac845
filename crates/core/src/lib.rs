//! Fundsync Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the fund registry sync
//! pipeline. It is database- and transport-agnostic: persistence goes
//! through the store traits implemented by `fundsync-storage-sqlite`,
//! and the external tabular source is reached through the
//! `BitableSource` trait from `fundsync-bitable`.

pub mod decode;
pub mod errors;
pub mod funds;
pub mod history;
pub mod mapping;
pub mod metrics;
pub mod options;
pub mod sync;

pub use errors::Error;
pub use errors::Result;

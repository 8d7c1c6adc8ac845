//! Bitable open-API client.
//!
//! This crate provides read access to a Bitable-style tabular source
//! (Lark/Feishu open API): tenant access-token management, paginated
//! record listing, and per-table field schema listing. The sync
//! pipeline in `fundsync-core` consumes it through the
//! [`BitableSource`] trait so tests can substitute a mock source.

mod client;
mod errors;
mod models;
mod source;

pub use client::BitableClient;
pub use errors::BitableError;
pub use models::{BitableRecord, FieldOption, FieldProperty, TableField};
pub use source::BitableSource;

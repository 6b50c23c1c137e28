//! `stockcast-core`: shared building blocks.
//!
//! This crate contains **pure** primitives (identifiers and errors)
//! used by the catalog, forecasting and infra crates. No IO.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, SnapshotId, TenantId};

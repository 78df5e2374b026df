//! # metacat-store
//!
//! Relational store access for the Metacat catalogue.
//!
//! The search path treats the relational store as the single source of
//! truth, but only ever reads two things from it:
//!
//! - the set of known platforms, to validate platform filters
//! - one record by identifier, to resolve index hits authoritatively
//!
//! [`ResourceStore`] captures exactly that contract. Two implementations
//! ship with the crate:
//!
//! - [`MemoryStore`]: in-process maps (tests and local development)
//! - [`SqlStore`]: SQLite via `sqlx`, one JSON record per row

use std::collections::BTreeSet;

use async_trait::async_trait;
use metacat_core::{ResourceType, Result};
use serde_json::Value;

pub mod memory;
pub mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

/// Read-only view of the relational store used by the search path.
///
/// Connectivity failures surface as [`metacat_core::Error::Upstream`];
/// implementations do not retry.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Names of every platform currently registered.
    ///
    /// Read fresh on each call; callers must not cache the result across
    /// requests.
    async fn list_platforms(&self) -> Result<BTreeSet<String>>;

    /// Fetch the read representation of one resource.
    ///
    /// Returns `Ok(None)` when no live record has this identifier.
    async fn get_by_identifier(
        &self,
        resource_type: &ResourceType,
        identifier: i64,
    ) -> Result<Option<Value>>;

    /// Store name for diagnostics.
    fn name(&self) -> &str;
}

//! In-memory store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use metacat_core::{ResourceType, Result};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::ResourceStore;

/// Records keyed by `(table, identifier)`, plus the platform set.
///
/// Soft-deleted records are modelled by removing them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    platforms: RwLock<BTreeSet<String>>,
    records: RwLock<HashMap<(String, i64), Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that knows the given platforms.
    pub fn with_platforms<I, S>(platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            platforms: RwLock::new(platforms.into_iter().map(Into::into).collect()),
            records: RwLock::default(),
        }
    }

    /// Register a platform.
    pub async fn add_platform(&self, platform: impl Into<String>) {
        self.platforms.write().await.insert(platform.into());
    }

    /// Insert or replace a record.
    pub async fn insert(&self, resource_type: &ResourceType, identifier: i64, record: Value) {
        self.records
            .write()
            .await
            .insert((resource_type.table().to_string(), identifier), record);
    }

    /// Remove a record, returning it if it existed.
    pub async fn remove(&self, resource_type: &ResourceType, identifier: i64) -> Option<Value> {
        self.records
            .write()
            .await
            .remove(&(resource_type.table().to_string(), identifier))
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_platforms(&self) -> Result<BTreeSet<String>> {
        Ok(self.platforms.read().await.clone())
    }

    async fn get_by_identifier(
        &self,
        resource_type: &ResourceType,
        identifier: i64,
    ) -> Result<Option<Value>> {
        let key = (resource_type.table().to_string(), identifier);
        Ok(self.records.read().await.get(&key).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_platforms_round_trip() {
        let store = MemoryStore::with_platforms(["example"]);
        store.add_platform("zenodo").await;

        let platforms = store.list_platforms().await.unwrap();
        assert_eq!(
            platforms.into_iter().collect::<Vec<_>>(),
            vec!["example".to_string(), "zenodo".to_string()]
        );
    }

    #[tokio::test]
    async fn test_lookup_is_scoped_by_table() {
        let store = MemoryStore::new();
        let datasets = ResourceType::new("dataset", "datasets");
        let events = ResourceType::new("event", "events");

        store.insert(&datasets, 1, json!({"identifier": 1})).await;

        assert!(store.get_by_identifier(&datasets, 1).await.unwrap().is_some());
        assert!(store.get_by_identifier(&events, 1).await.unwrap().is_none());
        assert!(store.get_by_identifier(&datasets, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new();
        let datasets = ResourceType::new("dataset", "datasets");
        store.insert(&datasets, 5, json!({"identifier": 5})).await;

        assert!(store.remove(&datasets, 5).await.is_some());
        assert!(store.get_by_identifier(&datasets, 5).await.unwrap().is_none());
        assert_eq!(store.name(), "memory");
    }
}

//! Common test utilities for the search integration tests.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use metacat_core::{Error, Registry, ResourceType, Result};
use metacat_search::{IndexClient, ScriptedIndex, SearchService};
use metacat_store::{MemoryStore, ResourceStore};
use serde_json::{Value, json};

/// Relational store that fails every call and counts how often it was hit.
#[derive(Debug, Default)]
pub struct RaisingStore {
    calls: AtomicUsize,
}

impl RaisingStore {
    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceStore for RaisingStore {
    async fn list_platforms(&self) -> Result<BTreeSet<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::upstream("relational store unavailable"))
    }

    async fn get_by_identifier(
        &self,
        _resource_type: &ResourceType,
        _identifier: i64,
    ) -> Result<Option<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::upstream("relational store unavailable"))
    }

    fn name(&self) -> &str {
        "raising"
    }
}

/// Test harness wiring a scripted index to a store.
pub struct TestHarness {
    /// Registered resource types.
    pub registry: Registry,
    /// The scripted index behind the client.
    pub index: Arc<ScriptedIndex>,
    /// The facade under test.
    pub service: SearchService,
}

impl TestHarness {
    /// Harness over the default catalogue.
    pub fn new(index: ScriptedIndex, store: Arc<dyn ResourceStore>) -> Self {
        let index = Arc::new(index);
        let client = IndexClient::new(index.clone());
        Self {
            registry: Registry::catalogue().expect("catalogue is valid"),
            index,
            service: SearchService::new(client, store),
        }
    }

    /// Look up a registered type by plural name.
    pub fn resource_type(&self, plural: &str) -> &ResourceType {
        self.registry
            .by_plural(plural)
            .expect("resource type is registered")
    }
}

/// An indexed dataset document.
pub fn dataset_source(identifier: i64) -> Value {
    json!({
        "identifier": identifier,
        "name": "A name.",
        "description_plain": "A plain text description.",
        "description_html": "An html description.",
        "date_modified": "2023-09-01T00:00:00+00:00",
        "issn": "00000000",
        "platform": "example",
        "type": "dataset",
        "@timestamp": "2023-09-01T00:00:05Z",
        "@version": "1",
    })
}

/// A memory store knowing the `example` and `zenodo` platforms.
pub async fn memory_store_with(rt: &ResourceType, identifiers: &[i64]) -> Arc<MemoryStore> {
    let store = MemoryStore::with_platforms(["example", "zenodo"]);
    for &id in identifiers {
        store
            .insert(rt, id, json!({"identifier": id, "name": format!("Dataset {id}")}))
            .await;
    }
    Arc::new(store)
}

//! Index service trait and wire types.
//!
//! This module defines the `IndexService` trait that every full-text index
//! backend must satisfy, plus the request and response shapes exchanged
//! with it.
//!
//! # Backends
//!
//! - `ElasticsearchIndex`: Elasticsearch over HTTP
//! - `ScriptedIndex`: canned responses for tests and local development

use async_trait::async_trait;
use metacat_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured query ready to send to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Target index.
    pub index: String,
    /// Boolean query body.
    pub query: Value,
    /// Hits to skip.
    pub from: usize,
    /// Page size.
    pub size: usize,
    /// Sort clause.
    pub sort: Value,
}

/// One matched document, keyed by index field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexHit {
    source: Map<String, Value>,
}

impl IndexHit {
    /// Wrap a raw `_source` mapping.
    pub fn new(source: Map<String, Value>) -> Self {
        Self { source }
    }

    /// Build a hit from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(source) => Ok(Self { source }),
            _ => Err(Error::invalid_hit("_source")),
        }
    }

    /// The raw attribute mapping.
    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// The document identifier.
    ///
    /// Accepts integers and integer strings; anything else is an invalid hit.
    pub fn identifier(&self) -> Result<i64> {
        match self.source.get("identifier") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => None,
        }
        .ok_or_else(|| Error::invalid_hit("identifier"))
    }

    /// The last-modified timestamp, exactly as indexed.
    pub fn date_modified(&self) -> Result<&Value> {
        self.source
            .get("date_modified")
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::invalid_hit("date_modified"))
    }
}

/// Response to a search call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total matching documents (possibly approximate).
    pub total: u64,
    /// Hits on the requested page.
    pub hits: Vec<IndexHit>,
}

impl SearchResponse {
    /// Create an empty response.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Outcome of an idempotent index creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCreation {
    /// The index did not exist and was created.
    Created,
    /// The index already existed; nothing changed.
    AlreadyExists,
}

/// Abstract full-text index service.
///
/// Implementations are shared by every in-flight request and must be safe
/// for concurrent use. They do not retry: transport failures and timeouts
/// surface as [`Error::Upstream`].
#[async_trait]
pub trait IndexService: Send + Sync {
    /// Execute a search.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Create an index with the given mapping, tolerating "already exists".
    async fn create_index(&self, index: &str, mapping: &Value) -> Result<IndexCreation>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================

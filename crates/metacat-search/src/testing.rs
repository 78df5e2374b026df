//! Scripted index service.
//!
//! Returns a canned [`SearchResponse`] (or a canned failure) and records
//! every request it receives. Used by tests across the workspace and as a
//! stand-in backend when no index is reachable during development.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use metacat_core::{Error, Result};
use serde_json::Value;

use crate::backend::{IndexCreation, IndexHit, IndexService, SearchRequest, SearchResponse};

/// Index service with a fixed answer.
#[derive(Debug, Default)]
pub struct ScriptedIndex {
    response: Option<SearchResponse>,
    requests: Mutex<Vec<SearchRequest>>,
    created: Mutex<Vec<String>>,
}

impl ScriptedIndex {
    /// Answer every search with `response`.
    pub fn new(response: SearchResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// Answer every search with no hits.
    pub fn empty() -> Self {
        Self::new(SearchResponse::empty())
    }

    /// Answer every search with the given `_source` documents.
    ///
    /// Non-object documents are skipped.
    pub fn with_sources<I>(total: u64, sources: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let hits = sources
            .into_iter()
            .filter_map(|s| IndexHit::from_value(s).ok())
            .collect();
        Self::new(SearchResponse { total, hits })
    }

    /// Fail every call as if the index were unreachable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Every search request received so far.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent search request.
    pub fn last_request(&self) -> Option<SearchRequest> {
        self.requests().pop()
    }

    /// Indices created so far, in call order.
    pub fn created_indices(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IndexService for ScriptedIndex {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.response
            .clone()
            .ok_or_else(|| Error::upstream("scripted index is unavailable"))
    }

    async fn create_index(&self, index: &str, _mapping: &Value) -> Result<IndexCreation> {
        if self.response.is_none() {
            return Err(Error::upstream("scripted index is unavailable"));
        }
        let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
        if created.iter().any(|i| i == index) {
            return Ok(IndexCreation::AlreadyExists);
        }
        created.push(index.to_string());
        Ok(IndexCreation::Created)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

//! Search endpoint facade.
//!
//! [`SearchService`] runs one search request end to end:
//!
//! 1. validate limit, offset and search fields (no I/O)
//! 2. validate platform filters against the relational store
//! 3. build the boolean query
//! 4. execute it against the current index service
//! 5. reconcile hits in the requested mode
//! 6. wrap the result in the response envelope
//!
//! Any step may short-circuit with an error; there are no partial results.

use std::sync::Arc;

use metacat_core::{ResourceType, Result};
use metacat_store::ResourceStore;

use crate::client::IndexClient;
use crate::query::{self, QueryBuilder};
use crate::reconcile::Reconciler;
use crate::types::{SearchMode, SearchParams, SearchResult};

/// Orchestrates validation, query execution and reconciliation.
#[derive(Clone)]
pub struct SearchService {
    client: IndexClient,
    store: Arc<dyn ResourceStore>,
}

impl SearchService {
    /// Create a facade over an index client and a relational store.
    pub fn new(client: IndexClient, store: Arc<dyn ResourceStore>) -> Self {
        Self { client, store }
    }

    /// The index client adapter in use.
    pub fn client(&self) -> &IndexClient {
        &self.client
    }

    /// The relational store in use.
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    /// Search resources of one type.
    pub async fn search(
        &self,
        resource_type: &ResourceType,
        params: SearchParams,
    ) -> Result<SearchResult> {
        let query = query::validate(resource_type, &params)?;

        if !query.platforms.is_empty() {
            let available = self.store.list_platforms().await?;
            query::validate_platforms(&query.platforms, &available)?;
        }

        log::debug!(
            "Searching {} for {:?} in {:?} (platforms {:?}, limit {}, offset {}, {:?})",
            resource_type.plural(),
            query.text,
            query.fields,
            query.platforms,
            query.limit,
            query.offset,
            query.mode
        );

        let request = QueryBuilder::new(resource_type).build(&query);
        let mut response = self.client.get().search(&request).await?;
        response.hits.truncate(query.limit);

        let reconciler = Reconciler::new(resource_type);
        let resources = match query.mode {
            SearchMode::IndexOnly => response
                .hits
                .iter()
                .map(|hit| reconciler.from_index(hit))
                .collect::<Result<Vec<_>>>()?,
            SearchMode::Authoritative => {
                reconciler
                    .from_store(self.store.as_ref(), &response.hits)
                    .await?
            }
        };

        Ok(SearchResult {
            total_hits: response.total,
            resources,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("client", &self.client)
            .field("store", &self.store.name())
            .finish()
    }
}

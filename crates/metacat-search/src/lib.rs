//! Search routing and result reconciliation for Metacat.
//!
//! For every registered resource type this crate turns search parameters
//! into a structured full-text query, runs it against the index service,
//! and resolves the hits either authoritatively (from the relational store)
//! or straight from the indexed payload.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      metacat-search                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchService (validate → build → execute → reconcile)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  QueryBuilder (should/must boolean query, identifier sort)  │
//! │  Reconciler   (index-only cast | authoritative lookup)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexClient (swappable handle)                             │
//! │  IndexService trait                                         │
//! │  ├── ElasticsearchIndex (HTTP)                              │
//! │  └── ScriptedIndex (canned responses)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  schema: mapping generation and index provisioning          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use metacat_core::Registry;
//! use metacat_search::{
//!     ElasticsearchIndex, IndexClient, SearchConfig, SearchParams, SearchService,
//! };
//!
//! let registry = Registry::catalogue()?;
//! let index = ElasticsearchIndex::new(&SearchConfig::default())?;
//! let service = SearchService::new(IndexClient::new(Arc::new(index)), store);
//!
//! let datasets = registry.by_plural("datasets").unwrap();
//! let params = SearchParams {
//!     search_query: "robotics".to_string(),
//!     ..Default::default()
//! };
//! let result = service.search(datasets, params).await?;
//! println!("{} hits", result.total_hits);
//! ```

pub mod backend;
pub mod client;
pub mod elastic;
pub mod query;
pub mod reconcile;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;

pub use backend::{IndexCreation, IndexHit, IndexService, SearchRequest, SearchResponse};
pub use client::IndexClient;
pub use elastic::ElasticsearchIndex;
pub use query::QueryBuilder;
pub use reconcile::{Reconciler, prune_empty};
pub use schema::{ProvisionReport, generate_mapping, mapping_covers_contract, provision_indices};
pub use service::SearchService;
pub use testing::ScriptedIndex;
pub use types::{
    DEFAULT_LIMIT, LIMIT_MAX, SearchConfig, SearchMode, SearchParams, SearchQuery, SearchResult,
};

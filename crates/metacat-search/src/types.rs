//! Common types for the search subsystem.
//!
//! Request parameters, the validated query value object, the response
//! envelope, and the index connection configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest page a single request may ask for.
pub const LIMIT_MAX: i64 = 1000;

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 10;

/// How index hits are turned into resource representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Re-fetch every hit from the relational store.
    #[default]
    Authoritative,
    /// Rebuild a partial view straight from the index payload.
    IndexOnly,
}

impl SearchMode {
    /// Map the HTTP `get_all` flag onto a mode.
    pub fn from_get_all(get_all: bool) -> Self {
        if get_all {
            Self::Authoritative
        } else {
            Self::IndexOnly
        }
    }
}

/// Raw search parameters, as supplied by the caller.
///
/// Nothing here is validated yet; see [`SearchQuery`] for the checked form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free text to match. Blank matches everything.
    #[serde(default)]
    pub search_query: String,

    /// Restrict hits to these platforms (any of them).
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Restrict matching to these fields. `None` or empty uses every indexed field.
    #[serde(default)]
    pub search_fields: Option<Vec<String>>,

    /// Page size, `1..=LIMIT_MAX`.
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Number of hits to skip, `>= 0`.
    #[serde(default)]
    pub offset: i64,

    /// Reconciliation strategy.
    #[serde(default)]
    pub mode: SearchMode,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            platforms: Vec::new(),
            search_fields: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            mode: SearchMode::default(),
        }
    }
}

/// A validated search request for one resource type.
///
/// Invariant: every member of `fields` is an indexed field of the resource
/// type, and `limit` is within `1..=LIMIT_MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free text to match.
    pub text: String,
    /// Platform filter (empty means unfiltered).
    pub platforms: Vec<String>,
    /// Fields to match the text against.
    pub fields: Vec<String>,
    /// Page size.
    pub limit: usize,
    /// Hits to skip.
    pub offset: usize,
    /// Reconciliation strategy.
    pub mode: SearchMode,
}

/// Paginated search response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total hits as reported by the index (may lag the database).
    pub total_hits: u64,
    /// Resolved resource representations, at most `limit` of them.
    pub resources: Vec<Value>,
    /// Page size used.
    pub limit: usize,
    /// Offset used.
    pub offset: usize,
}

/// Connection settings for the full-text index service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the index service.
    #[serde(default = "default_url")]
    pub url: String,

    /// Basic-auth user.
    #[serde(default)]
    pub user: Option<String>,

    /// Basic-auth password.
    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

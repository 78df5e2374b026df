//! Elasticsearch backend over HTTP.
//!
//! Talks to the `_search` and index-creation endpoints with `reqwest`.
//! Timeouts come from [`SearchConfig::timeout_secs`] and surface as
//! [`Error::Upstream`], like every other transport failure.

use std::time::Duration;

use async_trait::async_trait;
use metacat_core::{Error, Result};
use serde_json::{Value, json};

use crate::backend::{IndexCreation, IndexHit, IndexService, SearchRequest, SearchResponse};
use crate::types::SearchConfig;

/// Error type Elasticsearch reports when creating an existing index.
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Elasticsearch index service.
#[derive(Debug, Clone)]
pub struct ElasticsearchIndex {
    http: reqwest::Client,
    base_url: String,
    user: Option<String>,
    password: Option<String>,
}

impl ElasticsearchIndex {
    /// Build a client from connection settings.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("cannot build index HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.user {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }
}

#[async_trait]
impl IndexService for ElasticsearchIndex {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}/{}/_search", self.base_url, request.index);
        let body = json!({
            "query": request.query,
            "from": request.from,
            "size": request.size,
            "sort": request.sort,
        });
        log::debug!("POST {url} from={} size={}", request.from, request.size);

        let response = self
            .authorize(self.http.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| {
                Error::upstream_with_source(format!("search on '{}' failed", request.index), e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::error!("Search on '{}' returned HTTP {status}: {text}", request.index);
            return Err(Error::upstream(format!(
                "search on '{}' returned HTTP {status}",
                request.index
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            Error::upstream_with_source(
                format!("unreadable search response from '{}'", request.index),
                e,
            )
        })?;
        parse_search_response(&payload)
    }

    async fn create_index(&self, index: &str, mapping: &Value) -> Result<IndexCreation> {
        let url = format!("{}/{index}", self.base_url);
        log::debug!("PUT {url}");

        let response = self
            .authorize(self.http.put(&url).json(mapping))
            .send()
            .await
            .map_err(|e| {
                Error::upstream_with_source(format!("creating index '{index}' failed"), e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(IndexCreation::Created);
        }
        let text = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST && text.contains(ALREADY_EXISTS) {
            return Ok(IndexCreation::AlreadyExists);
        }
        log::error!("Creating index '{index}' returned HTTP {status}: {text}");
        Err(Error::upstream(format!(
            "creating index '{index}' returned HTTP {status}"
        )))
    }

    fn name(&self) -> &str {
        "elasticsearch"
    }
}

/// Extract the total and `_source` documents from a `_search` response.
///
/// Accepts both `hits.total.value` (7.x+) and a bare numeric
/// `hits.total` (6.x).
pub fn parse_search_response(payload: &Value) -> Result<SearchResponse> {
    let hits = payload
        .get("hits")
        .ok_or_else(|| Error::upstream("search response has no 'hits'"))?;

    let total = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::Object(t)) => t.get("value").and_then(Value::as_u64),
        _ => None,
    }
    .ok_or_else(|| Error::upstream("search response has no hit total"))?;

    let hits = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|docs| {
            docs.iter()
                .map(|doc| {
                    let source = doc.get("_source").cloned().unwrap_or(Value::Null);
                    IndexHit::from_value(source)
                })
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(SearchResponse { total, hits })
}

// ============================================================================
// Tests
// ============================================================================

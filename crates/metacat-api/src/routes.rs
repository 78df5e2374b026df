//! HTTP routes.
//!
//! - `GET {prefix}/search/{plural}/v1`: search one resource type
//! - `GET {prefix}/health`: backend names and registered resource types

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use metacat_core::Registry;
use metacat_search::{SearchMode, SearchParams, SearchResult, SearchService};
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// Shared state for every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registered resource types.
    pub registry: Arc<Registry>,
    /// Search facade.
    pub search: SearchService,
}

impl AppState {
    /// Create handler state.
    pub fn new(registry: Arc<Registry>, search: SearchService) -> Self {
        Self { registry, search }
    }
}

/// Normalise a URL prefix to `""` or `/segment[/segment...]`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Build the router with every route mounted under `url_prefix`.
pub fn router(state: AppState, url_prefix: &str) -> Router {
    let prefix = normalize_prefix(url_prefix);
    Router::new()
        .route(&format!("{prefix}/search/{{plural}}/v1"), get(search_resources))
        .route(&format!("{prefix}/health"), get(health))
        .with_state(state)
}

async fn search_resources(
    State(state): State<AppState>,
    Path(plural): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResult>> {
    let resource_type = state
        .registry
        .by_plural(&plural)
        .ok_or_else(|| Error::UnknownResourceType {
            plural: plural.clone(),
            available: state.registry.iter().map(|rt| rt.plural().to_string()).collect(),
        })?;
    let params = parse_search_params(&pairs)?;
    let result = state.search.search(resource_type, params).await?;
    Ok(Json(result))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let resource_types: Vec<&str> = state.registry.iter().map(|rt| rt.plural()).collect();
    Json(json!({
        "status": "ok",
        "index": state.search.client().get().name(),
        "store": state.search.store().name(),
        "resource_types": resource_types,
    }))
}

/// Collect raw query pairs into search parameters.
///
/// `platforms` and `search_fields` repeat; other parameters take their last
/// occurrence. Unknown parameters are ignored.
pub fn parse_search_params(pairs: &[(String, String)]) -> metacat_core::Result<SearchParams> {
    let mut params = SearchParams::default();
    let mut fields = Vec::new();

    for (key, value) in pairs {
        match key.as_str() {
            "platforms" => params.platforms.push(value.clone()),
            "search_fields" => fields.push(value.clone()),
            "search_query" => params.search_query = value.clone(),
            "limit" => params.limit = parse_integer("limit", value)?,
            "offset" => params.offset = parse_integer("offset", value)?,
            "get_all" => params.mode = SearchMode::from_get_all(parse_bool("get_all", value)?),
            _ => {}
        }
    }

    if !fields.is_empty() {
        params.search_fields = Some(fields);
    }
    Ok(params)
}

fn parse_integer(parameter: &str, value: &str) -> metacat_core::Result<i64> {
    value.trim().parse().map_err(|_| {
        metacat_core::Error::invalid_parameter(
            parameter,
            format!("The {parameter} should be an integer, got '{value}'."),
        )
    })
}

fn parse_bool(parameter: &str, value: &str) -> metacat_core::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(metacat_core::Error::invalid_parameter(
            parameter,
            format!("The {parameter} should be a boolean, got '{value}'."),
        )),
    }
}

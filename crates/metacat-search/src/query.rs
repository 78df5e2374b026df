//! Query building and request validation.
//!
//! Translates a validated [`SearchQuery`] into the boolean query understood
//! by the index service:
//!
//! ```text
//! bool
//! ├── should: match(field, text) for each field   (minimum_should_match = 1)
//! └── must:   bool
//!             └── should: match(platform, p) for each platform
//!                                                 (minimum_should_match = 1)
//! ```
//!
//! Hits are sorted by identifier so pagination stays stable regardless of
//! relevance scores.

use std::collections::BTreeSet;

use metacat_core::{Error, ResourceType, Result};
use serde_json::{Value, json};

use crate::backend::SearchRequest;
use crate::types::{LIMIT_MAX, SearchParams, SearchQuery};

/// Index field holding the platform a resource was imported from.
pub const PLATFORM_FIELD: &str = "platform";

/// Check `limit` and `offset` bounds.
pub fn validate_page(limit: i64, offset: i64) -> Result<(usize, usize)> {
    if !(1..=LIMIT_MAX).contains(&limit) {
        return Err(Error::invalid_parameter(
            "limit",
            format!(
                "The limit should be between 1 and {LIMIT_MAX}. \
                 If you want more results, use pagination."
            ),
        ));
    }
    if offset < 0 {
        return Err(Error::invalid_parameter(
            "offset",
            "The offset should be greater than or equal to 0.",
        ));
    }
    let offset = usize::try_from(offset)
        .map_err(|_| Error::invalid_parameter("offset", "The offset is too large."))?;
    // 1..=LIMIT_MAX always fits in usize
    Ok((limit as usize, offset))
}

/// Resolve the fields to match against.
///
/// `None` or an empty list selects every indexed field. Any requested field
/// that is not indexed rejects the whole request.
pub fn resolve_fields(
    resource_type: &ResourceType,
    requested: Option<&[String]>,
) -> Result<Vec<String>> {
    let requested = match requested {
        Some(fields) if !fields.is_empty() => fields,
        _ => return Ok(resource_type.indexed_fields().iter().cloned().collect()),
    };

    let rejected: Vec<String> = requested
        .iter()
        .filter(|f| !resource_type.is_indexed(f))
        .cloned()
        .collect();
    if !rejected.is_empty() {
        return Err(Error::InvalidSearchField {
            rejected,
            available: resource_type.indexed_fields().iter().cloned().collect(),
        });
    }

    let unique: BTreeSet<&String> = requested.iter().collect();
    Ok(unique.into_iter().cloned().collect())
}

/// Check every requested platform is known.
pub fn validate_platforms(requested: &[String], available: &BTreeSet<String>) -> Result<()> {
    let rejected: Vec<String> = requested
        .iter()
        .filter(|p| !available.contains(*p))
        .cloned()
        .collect();
    if rejected.is_empty() {
        Ok(())
    } else {
        Err(Error::UnknownPlatform {
            rejected,
            available: available.iter().cloned().collect(),
        })
    }
}

/// Validate everything that needs no network access.
///
/// Platforms are checked separately once the platform set is loaded.
pub fn validate(resource_type: &ResourceType, params: &SearchParams) -> Result<SearchQuery> {
    let (limit, offset) = validate_page(params.limit, params.offset)?;
    let fields = resolve_fields(resource_type, params.search_fields.as_deref())?;
    Ok(SearchQuery {
        text: params.search_query.clone(),
        platforms: params.platforms.clone(),
        fields,
        limit,
        offset,
        mode: params.mode,
    })
}

/// Builder for the structured index query of one resource type.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    resource_type: &'a ResourceType,
}

impl<'a> QueryBuilder<'a> {
    /// Create a builder for `resource_type`.
    pub fn new(resource_type: &'a ResourceType) -> Self {
        Self { resource_type }
    }

    /// Build the full search request.
    pub fn build(&self, query: &SearchQuery) -> SearchRequest {
        SearchRequest {
            index: self.resource_type.index_name().to_string(),
            query: self.bool_query(query),
            from: query.offset,
            size: query.limit,
            sort: sort_by_identifier(),
        }
    }

    /// Build only the boolean query body.
    pub fn bool_query(&self, query: &SearchQuery) -> Value {
        let text = query.text.trim();
        let should: Vec<Value> = if text.is_empty() {
            vec![json!({"match_all": {}})]
        } else {
            query
                .fields
                .iter()
                .map(|field| json!({"match": {field.as_str(): text}}))
                .collect()
        };

        let mut clause = json!({
            "should": should,
            "minimum_should_match": 1,
        });

        if !query.platforms.is_empty() {
            let platform_matches: Vec<Value> = query
                .platforms
                .iter()
                .map(|p| json!({"match": {PLATFORM_FIELD: p}}))
                .collect();
            clause["must"] = json!({
                "bool": {
                    "should": platform_matches,
                    "minimum_should_match": 1,
                }
            });
        }

        json!({"bool": clause})
    }
}

/// Deterministic sort by identifier, ascending.
pub fn sort_by_identifier() -> Value {
    json!([{"identifier": "asc"}])
}

// ============================================================================
// Tests
// ============================================================================

//! Index mapping generation and provisioning.
//!
//! Every index starts from [`base_mapping`]: identity, timestamps, platform
//! keys, and the three base text fields. Each resource type then adds its
//! extra indexed fields as `text` with a `keyword` sub-field.
//!
//! A field missing from the mapping is not queryable, so searches against
//! it silently match nothing. [`mapping_covers_contract`] checks that every
//! indexed field of a contract made it into its mapping.

use metacat_core::{BASE_TEXT_FIELDS, Registry, ResourceType, Result};
use serde_json::{Map, Value, json};

use crate::backend::IndexCreation;
use crate::client::IndexClient;

fn text_with_keyword() -> Value {
    json!({
        "type": "text",
        "fields": {"keyword": {"type": "keyword"}},
    })
}

/// Mapping shared by every resource index.
pub fn base_mapping() -> Value {
    let mut properties = Map::new();
    properties.insert("identifier".to_string(), json!({"type": "long"}));
    properties.insert("date_modified".to_string(), json!({"type": "date"}));
    properties.insert("platform".to_string(), json!({"type": "keyword"}));
    properties.insert(
        "platform_resource_identifier".to_string(),
        json!({"type": "keyword"}),
    );
    for field in BASE_TEXT_FIELDS {
        properties.insert(field.to_string(), text_with_keyword());
    }
    json!({"mappings": {"properties": properties}})
}

/// Mapping for one resource type: the base plus its extra fields.
pub fn generate_mapping(resource_type: &ResourceType) -> Value {
    let mut mapping = base_mapping();
    if let Some(properties) = mapping
        .pointer_mut("/mappings/properties")
        .and_then(Value::as_object_mut)
    {
        for field in resource_type.extra_fields() {
            properties.insert(field.to_string(), text_with_keyword());
        }
    }
    mapping
}

/// Indexed fields of `resource_type` absent from `mapping`.
pub fn missing_fields(resource_type: &ResourceType, mapping: &Value) -> Vec<String> {
    let properties = mapping.pointer("/mappings/properties");
    resource_type
        .indexed_fields()
        .iter()
        .filter(|field| properties.and_then(|p| p.get(field.as_str())).is_none())
        .cloned()
        .collect()
}

/// Returns `true` if every indexed field of `resource_type` is mapped.
pub fn mapping_covers_contract(resource_type: &ResourceType, mapping: &Value) -> bool {
    missing_fields(resource_type, mapping).is_empty()
}

/// Outcome of [`provision_indices`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Indices created by this run.
    pub created: Vec<String>,
    /// Indices that already existed and were left untouched.
    pub existing: Vec<String>,
}

/// Create the index of every registered type, ignoring ones that exist.
///
/// Safe to run repeatedly. Stops at the first upstream failure.
pub async fn provision_indices(
    client: &IndexClient,
    registry: &Registry,
) -> Result<ProvisionReport> {
    let service = client.get();
    let mut report = ProvisionReport::default();
    for resource_type in registry.iter() {
        let index = resource_type.index_name();
        let mapping = generate_mapping(resource_type);
        match service.create_index(index, &mapping).await? {
            IndexCreation::Created => {
                log::info!("Created index '{index}'");
                report.created.push(index.to_string());
            }
            IndexCreation::AlreadyExists => {
                log::debug!("Index '{index}' already exists");
                report.existing.push(index.to_string());
            }
        }
    }
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================

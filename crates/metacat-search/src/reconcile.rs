//! Result reconciliation.
//!
//! Turns index hits into resource representations, either straight from the
//! indexed payload ([`Reconciler::from_index`]) or by re-reading every hit
//! from the relational store ([`Reconciler::from_store`]).

use futures::future::try_join_all;
use metacat_core::{Error, ResourceType, Result};
use metacat_store::ResourceStore;
use serde_json::{Map, Value};

use crate::backend::IndexHit;

/// Sigil prefixing index-internal metadata attributes (`@timestamp`, ...).
pub const METADATA_SIGIL: char = '@';

/// Synthetic attribute added by the replication pipeline.
pub const SYNTHETIC_TYPE_KEY: &str = "type";

/// Index keys every document carries and where they land in the output.
const BASE_PROJECTION: [(&str, &str); 9] = [
    ("identifier", "identifier"),
    ("name", "name"),
    ("description_plain", "description.plain"),
    ("description_html", "description.html"),
    ("platform", "platform"),
    ("platform_resource_identifier", "platform_resource_identifier"),
    ("date_modified", "aiod_entry.date_modified"),
    ("date_created", "aiod_entry.date_created"),
    ("status", "aiod_entry.status"),
];

/// Entry metadata keys always present in a reconstructed representation.
const ENTRY_KEYS: [&str; 3] = ["date_modified", "date_created", "status"];

/// Maps index hits of one resource type onto output representations.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    resource_type: &'a ResourceType,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for `resource_type`.
    pub fn new(resource_type: &'a ResourceType) -> Self {
        Self { resource_type }
    }

    /// Output path for an index key, or `None` if the key is not surfaced.
    fn output_path<'s>(&'s self, key: &'s str) -> Option<&'s str> {
        if key == SYNTHETIC_TYPE_KEY || key.starts_with(METADATA_SIGIL) {
            return None;
        }
        if let Some(domain_key) = self.resource_type.key_translations().get(key) {
            return Some(domain_key.as_str());
        }
        if let Some(&(_, path)) = BASE_PROJECTION.iter().find(|&&(k, _)| k == key) {
            return Some(path);
        }
        self.resource_type.is_indexed(key).then_some(key)
    }

    /// Rebuild a partial representation from the hit alone.
    ///
    /// Never touches the relational store. Fields the index does not carry
    /// are simply absent, and empty values are pruned. The `aiod_entry`
    /// block always lists its keys, with `null` for unknown values.
    pub fn from_index(&self, hit: &IndexHit) -> Result<Value> {
        let identifier = hit.identifier()?;
        hit.date_modified()?;

        let mut out = Map::new();
        for (key, value) in hit.source() {
            let Some(path) = self.output_path(key) else {
                continue;
            };
            let value = if key == "identifier" {
                Value::from(identifier)
            } else {
                value.clone()
            };
            insert_path(&mut out, path, value);
        }

        let mut resource = prune_empty(Value::Object(out));
        if let Value::Object(map) = &mut resource {
            let entry = map
                .entry("aiod_entry")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(entry) = entry {
                for key in ENTRY_KEYS {
                    entry.entry(key).or_insert(Value::Null);
                }
            }
        }
        Ok(resource)
    }

    /// Resolve every hit against the relational store, in hit order.
    ///
    /// All lookups complete before consistency is judged, so a
    /// [`Error::NotFound`] names every missing identifier at once.
    pub async fn from_store(
        &self,
        store: &dyn ResourceStore,
        hits: &[IndexHit],
    ) -> Result<Vec<Value>> {
        let identifiers = hits
            .iter()
            .map(IndexHit::identifier)
            .collect::<Result<Vec<i64>>>()?;

        let lookups = identifiers
            .iter()
            .map(|&id| store.get_by_identifier(self.resource_type, id));
        let records = try_join_all(lookups).await?;

        let mut resources = Vec::with_capacity(records.len());
        let mut missing = Vec::new();
        for (id, record) in identifiers.into_iter().zip(records) {
            match record {
                Some(record) => resources.push(record),
                None => missing.push(id),
            }
        }

        if !missing.is_empty() {
            log::warn!(
                "Index '{}' references {} identifier(s) absent from the database: {:?}",
                self.resource_type.index_name(),
                missing.len(),
                missing
            );
            return Err(Error::NotFound {
                identifiers: missing,
            });
        }
        Ok(resources)
    }
}

/// Insert `value` at a dot-separated `path`, creating intermediate objects.
fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_path(map, rest, value);
            }
        }
    }
}

/// Recursively drop null, empty-string, empty-array and empty-object values.
///
/// Numbers and booleans are kept, including `0` and `false`. A container
/// that becomes empty after pruning is dropped from its parent as well.
pub fn prune_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, prune_empty(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(prune_empty)
                .filter(|v| !is_empty(v))
                .collect(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

// ============================================================================
// Tests
// ============================================================================

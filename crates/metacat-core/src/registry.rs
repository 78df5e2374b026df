//! Data-driven registry of searchable resource types.
//!
//! Adding a resource type to search means registering one [`ResourceType`]
//! here; the HTTP surface, query builder, reconciler, and index schema
//! generator all read from the registry.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::resource::{ResourceType, is_plain_identifier};

/// Ordered collection of resource-type contracts.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: Vec<ResourceType>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Add a resource type.
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, resource_type: ResourceType) -> Self {
        self.types.push(resource_type);
        self
    }

    /// The catalogue's built-in resource types, validated.
    pub fn catalogue() -> Result<Self> {
        let registry = Self::new()
            .add(ResourceType::new("dataset", "datasets").with_fields(["issn"]))
            .add(
                ResourceType::new("publication", "publications")
                    .with_fields(["issn", "isbn", "publication_type"])
                    .with_translation("publication_type", "type"),
            )
            .add(ResourceType::new("organisation", "organisations").with_fields(["legal_name"]))
            .add(ResourceType::new("event", "events"))
            .add(ResourceType::new("ml_model", "ml_models"))
            .add(ResourceType::new("project", "projects"))
            .add(ResourceType::new("experiment", "experiments"))
            .add(ResourceType::new("service", "services").with_fields(["slogan"]))
            .add(
                ResourceType::new("news", "news")
                    .with_fields(["headline", "alternative_headline"]),
            )
            .add(ResourceType::new("educational_resource", "educational_resources"));
        registry.validate()?;
        Ok(registry)
    }

    /// Check every contract is well formed and unambiguous.
    ///
    /// Run at startup; a failure here is a configuration error, never a
    /// request-time error.
    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(Error::config("no searchable resource types registered"));
        }

        let mut plurals = BTreeSet::new();
        let mut indices = BTreeSet::new();
        for rt in &self.types {
            if rt.indexed_fields().is_empty() {
                return Err(Error::config(format!(
                    "resource type '{}' declares no indexed fields",
                    rt.name()
                )));
            }
            if let Some(field) = rt.indexed_fields().iter().find(|f| f.trim().is_empty()) {
                return Err(Error::config(format!(
                    "resource type '{}' declares a blank indexed field '{field}'",
                    rt.name()
                )));
            }
            for (label, ident) in [
                ("index name", rt.index_name()),
                ("table", rt.table()),
                ("plural name", rt.plural()),
            ] {
                if !is_plain_identifier(ident) {
                    return Err(Error::config(format!(
                        "resource type '{}' has an invalid {label} '{ident}'",
                        rt.name()
                    )));
                }
            }
            if !plurals.insert(rt.plural()) {
                return Err(Error::config(format!(
                    "plural name '{}' is registered twice",
                    rt.plural()
                )));
            }
            if !indices.insert(rt.index_name()) {
                return Err(Error::config(format!(
                    "index '{}' is registered twice",
                    rt.index_name()
                )));
            }

            let mut targets = BTreeSet::new();
            for domain_key in rt.key_translations().values() {
                if !targets.insert(domain_key.as_str()) {
                    return Err(Error::config(format!(
                        "resource type '{}' translates two index keys onto '{domain_key}'",
                        rt.name()
                    )));
                }
            }
        }

        log::debug!("Validated {} searchable resource types", self.types.len());
        Ok(())
    }

    /// Look up a resource type by its plural display name.
    pub fn by_plural(&self, plural: &str) -> Option<&ResourceType> {
        self.types.iter().find(|rt| rt.plural() == plural)
    }

    /// Iterate over registered resource types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.types.iter()
    }

    /// Number of registered resource types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_is_valid() {
        let registry = Registry::catalogue().unwrap();
        assert_eq!(registry.len(), 10);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_catalogue_lookup() {
        let registry = Registry::catalogue().unwrap();

        let datasets = registry.by_plural("datasets").unwrap();
        assert_eq!(datasets.index_name(), "dataset");
        assert!(datasets.is_indexed("issn"));

        let publications = registry.by_plural("publications").unwrap();
        assert_eq!(publications.name(), "publication");
        assert_eq!(
            publications.key_translations().get("publication_type").map(String::as_str),
            Some("type")
        );

        assert!(registry.by_plural("widgets").is_none());
    }

    #[test]
    fn test_empty_registry_rejected() {
        let err = Registry::new().validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_empty_indexed_fields_rejected() {
        let registry = Registry::new()
            .add(ResourceType::new("dataset", "datasets").with_exact_fields(Vec::<String>::new()));
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("declares no indexed fields"));
    }

    #[test]
    fn test_duplicate_plural_rejected() {
        let registry = Registry::new()
            .add(ResourceType::new("dataset", "datasets"))
            .add(ResourceType::new("dataset_v2", "datasets"));
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let registry = Registry::new()
            .add(ResourceType::new("dataset", "datasets"))
            .add(ResourceType::new("corpus", "corpora").with_index_name("dataset"));
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("index 'dataset'"));
    }

    #[test]
    fn test_unsafe_table_rejected() {
        let registry =
            Registry::new().add(ResourceType::new("dataset", "datasets").with_table("x; drop"));
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("invalid table"));
    }

    #[test]
    fn test_conflicting_translations_rejected() {
        let registry = Registry::new().add(
            ResourceType::new("publication", "publications")
                .with_fields(["publication_type", "kind"])
                .with_translation("publication_type", "type")
                .with_translation("kind", "type"),
        );
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("onto 'type'"));
    }

    #[test]
    fn test_iteration_preserves_registration_order() {
        let registry = Registry::new()
            .add(ResourceType::new("service", "services"))
            .add(ResourceType::new("event", "events"));
        let plurals: Vec<&str> = registry.iter().map(ResourceType::plural).collect();
        assert_eq!(plurals, vec!["services", "events"]);
    }
}

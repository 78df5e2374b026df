//! Integration tests for index provisioning.

use std::sync::Arc;

use metacat_core::Registry;
use metacat_search::{IndexClient, ScriptedIndex, mapping_covers_contract, provision_indices};
use metacat_search::schema::generate_mapping;

#[tokio::test]
async fn test_provision_creates_every_registered_index() {
    let registry = Registry::catalogue().unwrap();
    let index = Arc::new(ScriptedIndex::empty());
    let client = IndexClient::new(index.clone());

    let report = provision_indices(&client, &registry).await.unwrap();

    let expected: Vec<String> = registry.iter().map(|rt| rt.index_name().to_string()).collect();
    assert_eq!(report.created, expected);
    assert_eq!(index.created_indices(), expected);
}

#[tokio::test]
async fn test_provision_twice_reports_existing() {
    let registry = Registry::catalogue().unwrap();
    let client = IndexClient::new(Arc::new(ScriptedIndex::empty()));

    provision_indices(&client, &registry).await.unwrap();
    let report = provision_indices(&client, &registry).await.unwrap();

    assert!(report.created.is_empty());
    assert_eq!(report.existing.len(), registry.len());
}

#[test]
fn test_generated_mappings_cover_contracts() {
    let registry = Registry::catalogue().unwrap();
    for rt in registry.iter() {
        assert!(mapping_covers_contract(rt, &generate_mapping(rt)), "{}", rt.plural());
    }
}

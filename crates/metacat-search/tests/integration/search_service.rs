//! Integration tests for the search request lifecycle.

use std::sync::Arc;

use metacat_core::{Error, Registry};
use metacat_search::{ScriptedIndex, SearchMode, SearchParams};
use metacat_store::MemoryStore;
use serde_json::json;

use crate::common::{RaisingStore, TestHarness, dataset_source, memory_store_with};

fn index_only(query: &str) -> SearchParams {
    SearchParams {
        search_query: query.to_string(),
        mode: SearchMode::IndexOnly,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_index_only_never_reads_the_store() {
    let store = Arc::new(RaisingStore::default());
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(1, [dataset_source(1)]),
        store.clone(),
    );

    let result = harness
        .service
        .search(harness.resource_type("datasets"), index_only("description"))
        .await
        .expect("index-only search should succeed");

    assert_eq!(store.calls(), 0);
    assert_eq!(result.total_hits, 1);
    assert_eq!((result.limit, result.offset), (10, 0));

    let resource = &result.resources[0];
    assert_eq!(resource["identifier"], json!(1));
    assert_eq!(resource["name"], json!("A name."));
    assert_eq!(resource["description"]["plain"], json!("A plain text description."));
    assert_eq!(resource["description"]["html"], json!("An html description."));
    assert_eq!(
        resource["aiod_entry"]["date_modified"],
        json!("2023-09-01T00:00:00+00:00")
    );
    assert_eq!(resource["aiod_entry"]["status"], serde_json::Value::Null);
    assert!(resource["aiod_entry"].as_object().unwrap().contains_key("status"));
    assert_eq!(resource["issn"], json!("00000000"));
    assert!(resource.get("type").is_none());
    assert!(resource.get("@timestamp").is_none());
}

#[tokio::test]
async fn test_query_sent_to_index() {
    let harness = TestHarness::new(ScriptedIndex::empty(), Arc::new(RaisingStore::default()));
    let params = SearchParams {
        search_query: "robots".to_string(),
        search_fields: Some(vec!["issn".to_string()]),
        limit: 3,
        offset: 6,
        mode: SearchMode::IndexOnly,
        ..Default::default()
    };

    harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap();

    let request = harness.index.last_request().expect("index was queried");
    assert_eq!(request.index, "dataset");
    assert_eq!((request.from, request.size), (6, 3));
    assert_eq!(
        request.query,
        json!({"bool": {"should": [{"match": {"issn": "robots"}}], "minimum_should_match": 1}})
    );
    assert_eq!(request.sort, json!([{"identifier": "asc"}]));
}

#[tokio::test]
async fn test_authoritative_returns_store_records() {
    let registry = Registry::catalogue().unwrap();
    let datasets = registry.by_plural("datasets").unwrap();
    let store = memory_store_with(datasets, &[1, 2]).await;
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(2, [dataset_source(1), dataset_source(2)]),
        store,
    );

    let result = harness
        .service
        .search(harness.resource_type("datasets"), SearchParams::default())
        .await
        .unwrap();

    assert_eq!(result.total_hits, 2);
    assert_eq!(
        result.resources,
        vec![
            json!({"identifier": 1, "name": "Dataset 1"}),
            json!({"identifier": 2, "name": "Dataset 2"}),
        ]
    );
}

#[tokio::test]
async fn test_authoritative_missing_identifiers_are_batched() {
    let registry = Registry::catalogue().unwrap();
    let datasets = registry.by_plural("datasets").unwrap();
    let store = memory_store_with(datasets, &[2]).await;
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(
            3,
            [dataset_source(1), dataset_source(2), dataset_source(3)],
        ),
        store,
    );

    let err = harness
        .service
        .search(harness.resource_type("datasets"), SearchParams::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Some resources, with identifiers 1, 3, could not be found in the database."
    );
}

#[tokio::test]
async fn test_repeated_search_is_idempotent() {
    let registry = Registry::catalogue().unwrap();
    let datasets = registry.by_plural("datasets").unwrap();
    let store = memory_store_with(datasets, &[1]).await;
    let harness = TestHarness::new(ScriptedIndex::with_sources(1, [dataset_source(1)]), store);
    let rt = harness.resource_type("datasets");

    let first = harness.service.search(rt, SearchParams::default()).await.unwrap();
    let second = harness.service.search(rt, SearchParams::default()).await.unwrap();
    assert_eq!(first, second);

    let first = harness.service.search(rt, index_only("x")).await.unwrap();
    let second = harness.service.search(rt, index_only("x")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_result_still_has_envelope() {
    let harness = TestHarness::new(ScriptedIndex::empty(), Arc::new(MemoryStore::new()));
    let result = harness
        .service
        .search(harness.resource_type("publications"), SearchParams::default())
        .await
        .unwrap();
    assert_eq!(result.total_hits, 0);
    assert!(result.resources.is_empty());
    assert_eq!(result.limit, 10);
}

#[tokio::test]
async fn test_unknown_platform_rejected_before_index_call() {
    let harness = TestHarness::new(
        ScriptedIndex::empty(),
        Arc::new(MemoryStore::with_platforms(["example", "zenodo"])),
    );
    let params = SearchParams {
        platforms: vec!["bad_platform".to_string()],
        ..Default::default()
    };

    let err = harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownPlatform { .. }));
    assert!(err.to_string().contains("example, zenodo"));
    assert!(harness.index.requests().is_empty());
}

#[tokio::test]
async fn test_known_platform_adds_must_clause() {
    let harness = TestHarness::new(
        ScriptedIndex::empty(),
        Arc::new(MemoryStore::with_platforms(["example", "zenodo"])),
    );
    let params = SearchParams {
        platforms: vec!["zenodo".to_string()],
        mode: SearchMode::IndexOnly,
        ..Default::default()
    };

    harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap();

    let request = harness.index.last_request().unwrap();
    assert_eq!(
        request.query["bool"]["must"]["bool"]["should"],
        json!([{"match": {"platform": "zenodo"}}])
    );
}

#[tokio::test]
async fn test_bad_search_field_rejected() {
    let harness = TestHarness::new(ScriptedIndex::empty(), Arc::new(RaisingStore::default()));
    let params = SearchParams {
        search_fields: Some(vec!["bad_field".to_string()]),
        ..Default::default()
    };

    let err = harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap_err();

    assert!(
        err.to_string()
            .starts_with("The available search fields for this entity are:")
    );
    assert!(harness.index.requests().is_empty());
}

#[tokio::test]
async fn test_page_bounds_rejected() {
    let harness = TestHarness::new(ScriptedIndex::empty(), Arc::new(RaisingStore::default()));
    let rt = harness.resource_type("datasets");

    for (limit, offset) in [(1001, 0), (0, 0), (10, -1)] {
        let params = SearchParams {
            limit,
            offset,
            ..Default::default()
        };
        let err = harness.service.search(rt, params).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }), "{limit}/{offset}");
    }
    assert!(harness.index.requests().is_empty());
}

#[tokio::test]
async fn test_index_outage_is_upstream_error() {
    let harness = TestHarness::new(ScriptedIndex::unavailable(), Arc::new(RaisingStore::default()));
    let err = harness
        .service
        .search(harness.resource_type("datasets"), index_only("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Upstream { .. }));
}

#[tokio::test]
async fn test_oversized_page_from_index_is_truncated() {
    let sources: Vec<_> = (1..=5).map(dataset_source).collect();
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(5, sources),
        Arc::new(RaisingStore::default()),
    );
    let params = SearchParams {
        limit: 2,
        mode: SearchMode::IndexOnly,
        ..Default::default()
    };

    let result = harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap();
    assert_eq!(result.resources.len(), 2);
    assert_eq!(result.total_hits, 5);
}

#[tokio::test]
async fn test_swapped_index_client_is_used_by_existing_service() {
    let harness = TestHarness::new(ScriptedIndex::unavailable(), Arc::new(RaisingStore::default()));
    harness
        .service
        .client()
        .replace(Arc::new(ScriptedIndex::with_sources(1, [dataset_source(7)])));

    let result = harness
        .service
        .search(harness.resource_type("datasets"), index_only(""))
        .await
        .unwrap();
    assert_eq!(result.resources[0]["identifier"], json!(7));
}

#[tokio::test]
async fn test_publication_type_is_translated() {
    let source = json!({
        "identifier": 4,
        "name": "Paper",
        "date_modified": "2024-02-01T00:00:00+00:00",
        "publication_type": "journal",
        "type": "publication",
    });
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(1, [source]),
        Arc::new(RaisingStore::default()),
    );
    let result = harness
        .service
        .search(harness.resource_type("publications"), index_only("paper"))
        .await
        .unwrap();
    assert_eq!(result.resources[0]["type"], json!("journal"));
}

#[tokio::test]
async fn test_store_failure_during_authoritative_lookup_is_upstream_error() {
    let store = Arc::new(RaisingStore::default());
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(1, [dataset_source(1)]),
        store.clone(),
    );
    let params = SearchParams {
        mode: SearchMode::Authoritative,
        ..Default::default()
    };

    let err = harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Upstream { .. }));
    assert!(err.is_retryable());
    assert_eq!(store.calls(), 1);
    assert_eq!(harness.index.requests().len(), 1);
}

#[tokio::test]
async fn test_store_failure_during_platform_check_is_upstream_error() {
    let store = Arc::new(RaisingStore::default());
    let harness = TestHarness::new(
        ScriptedIndex::with_sources(1, [dataset_source(1)]),
        store.clone(),
    );
    let params = SearchParams {
        platforms: vec!["example".to_string()],
        mode: SearchMode::IndexOnly,
        ..Default::default()
    };

    let err = harness
        .service
        .search(harness.resource_type("datasets"), params)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Upstream { .. }));
    assert_eq!(store.calls(), 1);
    assert!(harness.index.requests().is_empty());
}

//! Contract tests for domain and record sync
//!
//! These verify that a sync pulls one page from the API, upserts by natural
//! key and commits the whole batch at once.

mod common;

use common::{MockTransport, ReadOnlyStore, service_with};
use dosync_core::request::Method;
use dosync_core::traits::{ChangeSet, DomainStore};
use dosync_core::{DomainRecord, DomainService, MemoryStore, StaticCredential};
use serde_json::json;
use std::sync::Arc;

fn records_path(domain: &str) -> String {
    format!("/domains/{}/records", domain)
}

#[tokio::test]
async fn test_sync_domains_with_no_remote_domains_leaves_store_untouched() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "/domains", json!({"domains": [], "meta": {"total": 0}}));
    let store = MemoryStore::new();
    let service = service_with(transport.clone(), store.clone());

    let synced = service.sync_domains().await.unwrap();

    assert!(synced.is_empty());
    assert!(store.is_empty().await);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_sync_domains_requests_one_page_of_one_hundred() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "/domains", json!({"domains": []}));
    let service = service_with(transport.clone(), MemoryStore::new());

    service.sync_domains().await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "/domains");
    assert!(request.query.contains(&("page".to_string(), "1".to_string())));
    assert!(request.query.contains(&("per_page".to_string(), "100".to_string())));
    assert_eq!(request.api_key(), Some("test-token"));
}

#[tokio::test]
async fn test_sync_domains_upserts_by_name() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [
            {"name": "example.com", "ttl": 1800, "zone_file": "$ORIGIN example.com."},
            {"name": "example.org", "ttl": "3600"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let synced = service.sync_domains().await.unwrap();
    assert_eq!(synced.len(), 2);

    let domain = store.find_domain_by_name("example.com").await.unwrap().unwrap();
    assert!(domain.id.is_some());
    assert_eq!(domain.ttl.as_deref(), Some("1800"));
    assert_eq!(domain.zone_file.as_deref(), Some("$ORIGIN example.com."));

    let other = store.find_domain_by_name("example.org").await.unwrap().unwrap();
    assert_eq!(other.ttl.as_deref(), Some("3600"));
    assert_eq!(other.zone_file, None);
}

#[tokio::test]
async fn test_sync_domains_normalizes_scalar_ttl() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [
            {"name": "example.com", "ttl": 1800.0},
            {"name": "example.org", "ttl": true},
            {"name": "example.net", "ttl": false}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    service.sync_domains().await.unwrap();

    let ttl = |domain: Option<dosync_core::Domain>| domain.and_then(|d| d.ttl);
    assert_eq!(
        ttl(store.find_domain_by_name("example.com").await.unwrap()).as_deref(),
        Some("1800")
    );
    assert_eq!(
        ttl(store.find_domain_by_name("example.org").await.unwrap()).as_deref(),
        Some("1")
    );
    assert_eq!(
        ttl(store.find_domain_by_name("example.net").await.unwrap()).as_deref(),
        Some("")
    );
}

#[tokio::test]
async fn test_sync_records_rejects_out_of_range_id() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1001, "type": "A", "name": "www", "data": "192.168.1.100"},
            {"id": u64::MAX, "type": "A", "name": "api", "data": "192.168.1.101"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let err = service.sync_records("example.com").await.unwrap_err();

    assert!(err.is_validation());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_sync_domains_twice_does_not_duplicate() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [{"name": "example.com", "ttl": 1800}]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport.clone(), store.clone());

    let first = service.sync_domains().await.unwrap();

    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [{"name": "example.com", "ttl": 600}]}),
    );
    let second = service.sync_domains().await.unwrap();

    assert_eq!(store.domain_count().await, 1);
    assert_eq!(first[0].id, second[0].id);
    assert_eq!(second[0].ttl.as_deref(), Some("600"));
}

#[tokio::test]
async fn test_sync_domains_keeps_fields_absent_from_payload() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [{"name": "example.com", "ttl": 1800, "zone_file": "zone"}]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport.clone(), store.clone());
    service.sync_domains().await.unwrap();

    transport.respond(Method::Get, "/domains", json!({"domains": [{"name": "example.com"}]}));
    service.sync_domains().await.unwrap();

    let domain = store.find_domain_by_name("example.com").await.unwrap().unwrap();
    assert_eq!(domain.ttl.as_deref(), Some("1800"));
    assert_eq!(domain.zone_file.as_deref(), Some("zone"));
}

#[tokio::test]
async fn test_sync_domains_skips_nameless_entries() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [
            {"ttl": 1800},
            {"name": "", "ttl": 1800},
            {"name": null},
            {"name": "example.com"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let synced = service.sync_domains().await.unwrap();

    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].name, "example.com");
    assert_eq!(store.domain_count().await, 1);
}

#[tokio::test]
async fn test_sync_domains_merges_duplicate_names_in_one_page() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        "/domains",
        json!({"domains": [
            {"name": "example.com", "ttl": 1800},
            {"name": "example.com", "zone_file": "zone"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let synced = service.sync_domains().await.unwrap();

    assert_eq!(synced.len(), 1);
    assert_eq!(store.domain_count().await, 1);
    let domain = &synced[0];
    assert_eq!(domain.ttl.as_deref(), Some("1800"));
    assert_eq!(domain.zone_file.as_deref(), Some("zone"));
}

#[tokio::test]
async fn test_sync_domains_propagates_commit_failure() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "/domains", json!({"domains": [{"name": "example.com"}]}));
    let store = ReadOnlyStore::new(MemoryStore::new());
    let service = DomainService::new(
        Box::new(transport),
        Box::new(StaticCredential::new("test-token")),
        Arc::new(store.clone()),
    );

    let result = service.sync_domains().await;

    assert!(result.is_err());
    assert_eq!(store.commit_attempts(), 1);
}

#[tokio::test]
async fn test_sync_domains_rejects_malformed_list() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "/domains", json!({"domains": "oops"}));
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let err = service.sync_domains().await.unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("'domains'"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_sync_records_creates_record_from_payload() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1001, "type": "A", "name": "www", "data": "192.168.1.100", "ttl": 3600}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport.clone(), store.clone());

    let synced = service.sync_records("example.com").await.unwrap();

    assert_eq!(synced.len(), 1);
    let record = store.find_record("example.com", 1001).await.unwrap().unwrap();
    assert_eq!(record.domain_name, "example.com");
    assert_eq!(record.record_type, "A");
    assert_eq!(record.name, "www");
    assert_eq!(record.data, "192.168.1.100");
    assert_eq!(record.ttl, Some(3600));
    assert_eq!(record.priority, None);

    let request = &transport.requests()[0];
    assert!(request.query.contains(&("per_page".to_string(), "100".to_string())));
}

#[tokio::test]
async fn test_sync_records_twice_keeps_one_row() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1001, "type": "A", "name": "www", "data": "192.168.1.100", "ttl": 3600}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    service.sync_records("example.com").await.unwrap();
    service.sync_records("example.com").await.unwrap();

    assert_eq!(store.record_count().await, 1);
}

#[tokio::test]
async fn test_sync_records_merges_onto_existing_record() {
    let store = MemoryStore::new();
    let mut existing = DomainRecord::new("example.com", 2001);
    existing.record_type = "MX".to_string();
    existing.name = "@".to_string();
    existing.data = "old.example.com.".to_string();
    existing.priority = Some(10);
    store
        .commit(ChangeSet {
            domains: Vec::new(),
            records: vec![existing],
        })
        .await
        .unwrap();

    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 2001, "type": "MX", "name": "@", "data": "mail.example.com."}
        ]}),
    );
    let service = service_with(transport, store.clone());

    service.sync_records("example.com").await.unwrap();

    let record = store.find_record("example.com", 2001).await.unwrap().unwrap();
    assert_eq!(record.data, "mail.example.com.");
    assert_eq!(record.priority, Some(10));
    assert_eq!(store.record_count().await, 1);
}

#[tokio::test]
async fn test_sync_records_aborts_batch_on_bad_id() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1001, "type": "A", "name": "www", "data": "192.168.1.100"},
            {"id": "not-a-number", "type": "A", "name": "api", "data": "192.168.1.101"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let err = service.sync_records("example.com").await.unwrap_err();

    assert!(err.is_validation());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_sync_records_aborts_batch_on_missing_required_field() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1001, "type": "A", "name": "www", "data": "192.168.1.100"},
            {"id": 1002, "type": "A", "name": "api"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    assert!(service.sync_records("example.com").await.is_err());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_sync_records_skips_empty_ids() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"type": "A", "name": "a", "data": "10.0.0.1"},
            {"id": null, "type": "A", "name": "b", "data": "10.0.0.2"},
            {"id": 0, "type": "A", "name": "c", "data": "10.0.0.3"},
            {"id": "", "type": "A", "name": "d", "data": "10.0.0.4"},
            {"id": "1005", "type": "A", "name": "e", "data": "10.0.0.5"}
        ]}),
    );
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    let synced = service.sync_records("example.com").await.unwrap();

    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].record_id, 1005);
    assert_eq!(store.record_count().await, 1);
}

#[tokio::test]
async fn test_sync_records_with_empty_remote_list() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, &records_path("example.com"), json!({}));
    let store = MemoryStore::new();
    let service = service_with(transport, store.clone());

    assert!(service.sync_records("example.com").await.unwrap().is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_local_reads_after_sync() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1, "type": "A", "name": "www", "data": "10.0.0.1"},
            {"id": 2, "type": "AAAA", "name": "www", "data": "::1"}
        ]}),
    );
    let service = service_with(transport, MemoryStore::new());
    service.sync_records("example.com").await.unwrap();

    assert_eq!(service.local_records("example.com").await.unwrap().len(), 2);
    assert!(service.local_records("example.org").await.unwrap().is_empty());
    assert!(service.local_record("example.com", 2).await.unwrap().is_some());
    assert!(service.local_record("example.com", 3).await.unwrap().is_none());
    assert!(service.local_domains().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_preserves_account_link_until_detached() {
    let store = MemoryStore::new();
    let mut linked = DomainRecord::new("example.com", 1001);
    linked.record_type = "A".to_string();
    linked.name = "www".to_string();
    linked.data = "10.0.0.1".to_string();
    linked.account_id = Some(42);
    store
        .commit(ChangeSet {
            domains: Vec::new(),
            records: vec![linked],
        })
        .await
        .unwrap();

    let transport = MockTransport::new();
    transport.respond(
        Method::Get,
        &records_path("example.com"),
        json!({"domain_records": [
            {"id": 1001, "type": "A", "name": "www", "data": "10.0.0.2"}
        ]}),
    );
    let service = service_with(transport, store.clone());
    service.sync_records("example.com").await.unwrap();

    let record = store.find_record("example.com", 1001).await.unwrap().unwrap();
    assert_eq!(record.data, "10.0.0.2");
    assert_eq!(record.account_id, Some(42));

    assert_eq!(store.detach_account(42).await.unwrap(), 1);
    let record = store.find_record("example.com", 1001).await.unwrap().unwrap();
    assert_eq!(record.account_id, None);
    assert_eq!(store.record_count().await, 1);
}

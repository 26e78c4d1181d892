//! Test doubles and common utilities for service contract tests
//!
//! This module provides minimal test doubles that record how the service
//! uses its collaborators without talking to a real API or disk.

#![allow(dead_code)]

use dosync_core::error::{Error, Result};
use dosync_core::request::{ApiRequest, Method};
use dosync_core::traits::{ChangeSet, Committed, DomainStore, HttpTransport};
use dosync_core::{Domain, DomainRecord, DomainService, MemoryStore, StaticCredential};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A transport that answers from canned responses and records every request
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<(Method, String), Value>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `body` (query parameters are ignored)
    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), body);
    }

    /// All requests sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());

        self.responses
            .lock()
            .unwrap()
            .get(&(request.method, request.path.clone()))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("{} {}", request.method, request.path)))
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// A transport whose every call fails
#[derive(Clone, Default)]
pub struct FailingTransport {
    call_count: Arc<AtomicUsize>,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpTransport for FailingTransport {
    async fn send(&self, _request: &ApiRequest) -> Result<Value> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::provider("mock", "connection reset by peer"))
    }

    fn transport_name(&self) -> &'static str {
        "failing"
    }
}

/// A store that reads from an inner MemoryStore but refuses to commit
#[derive(Clone, Default)]
pub struct ReadOnlyStore {
    inner: MemoryStore,
    commit_attempts: Arc<AtomicUsize>,
}

impl ReadOnlyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            commit_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn commit_attempts(&self) -> usize {
        self.commit_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DomainStore for ReadOnlyStore {
    async fn find_domain_by_name(&self, name: &str) -> Result<Option<Domain>> {
        self.inner.find_domain_by_name(name).await
    }

    async fn find_record(&self, domain_name: &str, record_id: i64) -> Result<Option<DomainRecord>> {
        self.inner.find_record(domain_name, record_id).await
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        self.inner.list_domains().await
    }

    async fn list_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>> {
        self.inner.list_records(domain_name).await
    }

    async fn commit(&self, _changes: ChangeSet) -> Result<Committed> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::store("store is read-only"))
    }

    async fn detach_account(&self, _account_id: i64) -> Result<usize> {
        Err(Error::store("store is read-only"))
    }
}

/// Build a service over a mock transport and memory store with a credential
pub fn service_with(transport: MockTransport, store: MemoryStore) -> DomainService {
    DomainService::new(
        Box::new(transport),
        Box::new(StaticCredential::new("test-token")),
        Arc::new(store),
    )
}

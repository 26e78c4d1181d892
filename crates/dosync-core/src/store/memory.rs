// # Memory Store
//
// In-memory implementation of DomainStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for testing, one-shot inspection of the remote side, or
// scenarios where a local copy isn't needed afterwards.
//
// ## Crash Behavior
//
// - All rows are lost on restart/crash
// - The next sync repopulates everything from the remote API

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::model::{Domain, DomainRecord};
use crate::store::tables::Tables;
use crate::traits::store::{ChangeSet, Committed, DomainStore};

/// In-memory store implementation
///
/// This implementation keeps both tables behind a single RwLock, so a
/// commit is applied atomically with respect to concurrent readers.
///
/// # Example
///
/// ```rust,no_run
/// use dosync_core::model::Domain;
/// use dosync_core::store::MemoryStore;
/// use dosync_core::traits::{ChangeSet, DomainStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new();
///
///     store
///         .commit(ChangeSet {
///             domains: vec![Domain::new("example.com")],
///             records: vec![],
///         })
///         .await?;
///
///     let domain = store.find_domain_by_name("example.com").await?;
///     assert_eq!(domain.unwrap().id, Some(1));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of domain rows
    pub async fn domain_count(&self) -> usize {
        self.inner.read().await.domains.len()
    }

    /// Number of record rows
    pub async fn record_count(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Check if the store holds no rows
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.domains.is_empty() && guard.records.is_empty()
    }

    /// Clear all rows from the store
    pub async fn clear(&self) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        *guard = Tables::default();
        Ok(())
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn find_domain_by_name(&self, name: &str) -> Result<Option<Domain>, Error> {
        Ok(self.inner.read().await.find_domain_by_name(name))
    }

    async fn find_record(
        &self,
        domain_name: &str,
        record_id: i64,
    ) -> Result<Option<DomainRecord>, Error> {
        Ok(self.inner.read().await.find_record(domain_name, record_id))
    }

    async fn list_domains(&self) -> Result<Vec<Domain>, Error> {
        Ok(self.inner.read().await.list_domains())
    }

    async fn list_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>, Error> {
        Ok(self.inner.read().await.list_records(domain_name))
    }

    async fn commit(&self, changes: ChangeSet) -> Result<Committed, Error> {
        let mut guard = self.inner.write().await;
        guard.apply(changes, chrono::Utc::now())
    }

    async fn detach_account(&self, account_id: i64) -> Result<usize, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.detach_account(account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(record_id: i64) -> DomainRecord {
        let mut record = DomainRecord::new("example.com", record_id);
        record.record_type = "A".to_string();
        record.name = "www".to_string();
        record.data = "192.168.1.100".to_string();
        record
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();

        // Initially empty
        assert!(store.is_empty().await);

        let committed = store
            .commit(ChangeSet {
                domains: vec![Domain::new("example.com")],
                records: vec![record(1001)],
            })
            .await
            .unwrap();

        assert_eq!(store.domain_count().await, 1);
        assert_eq!(store.record_count().await, 1);
        assert_eq!(committed.records[0].id, Some(1));

        let found = store.find_record("example.com", 1001).await.unwrap();
        assert_eq!(found.unwrap().data, "192.168.1.100");
        assert!(store.find_record("example.org", 1001).await.unwrap().is_none());

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_update_by_id() {
        let store = MemoryStore::new();

        let mut stored = store
            .commit(ChangeSet {
                domains: vec![],
                records: vec![record(1001)],
            })
            .await
            .unwrap()
            .records
            .remove(0);

        stored.data = "10.0.0.1".to_string();
        store
            .commit(ChangeSet {
                domains: vec![],
                records: vec![stored],
            })
            .await
            .unwrap();

        let records = store.list_records("example.com").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_memory_store_rejects_invalid_batch() {
        let store = MemoryStore::new();

        let result = store
            .commit(ChangeSet {
                domains: vec![Domain::new("example.com"), Domain::new("")],
                records: vec![],
            })
            .await;

        assert!(result.unwrap_err().is_validation());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_list() {
        let store = MemoryStore::new();

        store
            .commit(ChangeSet {
                domains: vec![Domain::new("example.com"), Domain::new("test.com")],
                records: vec![],
            })
            .await
            .unwrap();

        let names: Vec<String> = store
            .list_domains()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["example.com".to_string(), "test.com".to_string()]);
    }
}

// # Domain Store Trait
//
// Defines the interface for local persistence of domains and records.
//
// ## Purpose
//
// The store holds the local copy that sync operations pull into:
// - One table of [`Domain`] rows, matched by exact name
// - One table of [`DomainRecord`] rows, matched by (domain name, remote id)
//
// Writes happen only through [`DomainStore::commit`], which applies a whole
// [`ChangeSet`] or nothing. Sync operations stage their changes in a
// [`UnitOfWork`](crate::store::UnitOfWork) and commit once.
//
// ## Implementations
//
// - Memory: `store::MemoryStore`
// - File-based: `store::FileStore` (JSON, atomic writes)

use async_trait::async_trait;

use crate::model::{Domain, DomainRecord};

/// A batch of upserts to apply atomically
///
/// Entities with an identifier replace the row with that identifier.
/// Entities with `id: None` replace the row with the same natural key, or
/// are inserted under a fresh identifier when there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub domains: Vec<Domain>,
    pub records: Vec<DomainRecord>,
}

impl ChangeSet {
    /// True when there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.records.is_empty()
    }
}

/// Entities as stored after a commit, in [`ChangeSet`] order, with
/// identifiers and timestamps assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Committed {
    pub domains: Vec<Domain>,
    pub records: Vec<DomainRecord>,
}

/// Trait for local store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
/// Concurrent commits touching the same rows are last-writer-wins.
///
/// # Allowed
/// - Perform I/O for persistent storage (files, databases, etc.)
/// - Cache rows in memory
///
/// # Forbidden
/// - Talk to the remote API (owned by `DomainService`)
/// - Apply part of a [`ChangeSet`]
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Find a domain by exact name
    async fn find_domain_by_name(&self, name: &str) -> Result<Option<Domain>, crate::Error>;

    /// Find a record by its natural key
    async fn find_record(
        &self,
        domain_name: &str,
        record_id: i64,
    ) -> Result<Option<DomainRecord>, crate::Error>;

    /// All domains, ordered by identifier
    async fn list_domains(&self) -> Result<Vec<Domain>, crate::Error>;

    /// All records of one domain, ordered by identifier
    async fn list_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>, crate::Error>;

    /// Apply every change in the set, or none of them
    ///
    /// Every entity is validated first; a single invalid entity or a failed
    /// write leaves the store exactly as it was.
    async fn commit(&self, changes: ChangeSet) -> Result<Committed, crate::Error>;

    /// Clear the account association of every record linked to `account_id`
    ///
    /// Library API for embedders that track accounts; sync and the CLI
    /// never set or clear `account_id` themselves.
    ///
    /// # Returns
    ///
    /// The number of records that were detached
    async fn detach_account(&self, account_id: i64) -> Result<usize, crate::Error>;
}

//! Explicit transaction over a [`DomainStore`]
//!
//! A [`UnitOfWork`] stages upserts in memory, indexed by natural key, and
//! writes them with a single [`DomainStore::commit`]. Dropping it without
//! committing discards everything that was staged.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Domain, DomainRecord};
use crate::traits::store::{ChangeSet, Committed, DomainStore};

/// Staged changes for one sync call
pub struct UnitOfWork<'a> {
    store: &'a dyn DomainStore,
    domains: Vec<Domain>,
    domain_index: HashMap<String, usize>,
    records: Vec<DomainRecord>,
    record_index: HashMap<(String, i64), usize>,
}

impl<'a> UnitOfWork<'a> {
    /// Begin a unit of work against `store`
    pub fn new(store: &'a dyn DomainStore) -> Self {
        Self {
            store,
            domains: Vec::new(),
            domain_index: HashMap::new(),
            records: Vec::new(),
            record_index: HashMap::new(),
        }
    }

    /// Staged domain named `name`, loaded from the store or newly created
    pub async fn domain(&mut self, name: &str) -> Result<&mut Domain> {
        if let Some(&index) = self.domain_index.get(name) {
            return Ok(&mut self.domains[index]);
        }

        let domain = self
            .store
            .find_domain_by_name(name)
            .await?
            .unwrap_or_else(|| Domain::new(name));

        let index = self.domains.len();
        self.domains.push(domain);
        self.domain_index.insert(name.to_string(), index);

        Ok(&mut self.domains[index])
    }

    /// Staged record keyed by (`domain_name`, `record_id`), loaded from the
    /// store or newly created
    pub async fn record(&mut self, domain_name: &str, record_id: i64) -> Result<&mut DomainRecord> {
        let key = (domain_name.to_string(), record_id);
        if let Some(&index) = self.record_index.get(&key) {
            return Ok(&mut self.records[index]);
        }

        let record = self
            .store
            .find_record(domain_name, record_id)
            .await?
            .unwrap_or_else(|| DomainRecord::new(domain_name, record_id));

        let index = self.records.len();
        self.records.push(record);
        self.record_index.insert(key, index);

        Ok(&mut self.records[index])
    }

    /// Number of staged entities
    pub fn len(&self) -> usize {
        self.domains.len() + self.records.len()
    }

    /// True when nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write everything staged in one store commit
    pub async fn commit(self) -> Result<Committed> {
        if self.is_empty() {
            return Ok(Committed::default());
        }

        self.store
            .commit(ChangeSet {
                domains: self.domains,
                records: self.records,
            })
            .await
    }
}

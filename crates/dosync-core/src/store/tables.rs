// Row storage shared by the memory and file stores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::Error;
use crate::model::{Domain, DomainRecord};
use crate::traits::store::{ChangeSet, Committed};

/// The two tables plus identifier counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Tables {
    pub(crate) domains: BTreeMap<i64, Domain>,
    pub(crate) records: BTreeMap<i64, DomainRecord>,
    pub(crate) next_domain_id: i64,
    pub(crate) next_record_id: i64,
}

impl Tables {
    pub(crate) fn find_domain_by_name(&self, name: &str) -> Option<Domain> {
        self.domains.values().find(|d| d.name == name).cloned()
    }

    pub(crate) fn find_record(&self, domain_name: &str, record_id: i64) -> Option<DomainRecord> {
        self.records
            .values()
            .find(|r| r.domain_name == domain_name && r.record_id == record_id)
            .cloned()
    }

    pub(crate) fn list_domains(&self) -> Vec<Domain> {
        self.domains.values().cloned().collect()
    }

    pub(crate) fn list_records(&self, domain_name: &str) -> Vec<DomainRecord> {
        self.records
            .values()
            .filter(|r| r.domain_name == domain_name)
            .cloned()
            .collect()
    }

    /// Validate the whole change set, then apply it.
    ///
    /// Nothing is modified when validation fails.
    pub(crate) fn apply(&mut self, changes: ChangeSet, now: DateTime<Utc>) -> Result<Committed, Error> {
        for domain in &changes.domains {
            domain.validate()?;
        }
        for record in &changes.records {
            record.validate()?;
        }

        let mut committed = Committed::default();

        for mut domain in changes.domains {
            let existing = self.find_domain_by_name(&domain.name).and_then(|d| d.id);
            let id = match domain.id.or(existing) {
                Some(id) => id,
                None => {
                    self.next_domain_id += 1;
                    self.next_domain_id
                }
            };
            let created_at = self
                .domains
                .get(&id)
                .and_then(|existing| existing.created_at)
                .or(domain.created_at)
                .unwrap_or(now);

            domain.id = Some(id);
            domain.created_at = Some(created_at);
            domain.updated_at = Some(now);

            self.domains.insert(id, domain.clone());
            committed.domains.push(domain);
        }

        for mut record in changes.records {
            let existing = self
                .find_record(&record.domain_name, record.record_id)
                .and_then(|r| r.id);
            let id = match record.id.or(existing) {
                Some(id) => id,
                None => {
                    self.next_record_id += 1;
                    self.next_record_id
                }
            };
            record.id = Some(id);

            self.records.insert(id, record.clone());
            committed.records.push(record);
        }

        Ok(committed)
    }

    pub(crate) fn detach_account(&mut self, account_id: i64) -> usize {
        let mut detached = 0;
        for record in self.records.values_mut() {
            if record.account_id == Some(account_id) {
                record.account_id = None;
                detached += 1;
            }
        }
        detached
    }
}

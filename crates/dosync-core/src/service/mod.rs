//! Domain service
//!
//! The DomainService is the only component that talks to both the remote
//! API and the local store. It is responsible for:
//! - Building requests and attaching the API credential
//! - Unwrapping the namespaced payload of each response
//! - Pulling domains and records into the local store (sync)
//!
//! ## Architecture
//!
//! ```text
//!                      ┌────────────────┐
//!   CLI / library ───▶ │ DomainService  │
//!                      └────────────────┘
//!                              │
//!         ┌────────────────────┼────────────────────┐
//!         │                    │                    │
//!         ▼                    ▼                    ▼
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Credential   │     │ HttpTransport│     │ DomainStore  │
//! │ Provider     │     │ (remote API) │     │ (UnitOfWork) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Sync Flow
//!
//! 1. Fetch one page (100 entries by default) from the remote API
//! 2. Find or create each local entity by its natural key, staged in a UnitOfWork
//! 3. Copy remote fields onto the staged entity
//! 4. Commit once; any error before that discards the whole batch
//!
//! ## Failure Semantics
//!
//! - Delete operations never fail: errors are logged once and reported as `false`
//! - Everything else propagates errors to the caller, without retries

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::config::SyncSettings;
use crate::error::{Error, Result};
use crate::mapper::RecordMapper;
use crate::model::{Domain, DomainRecord};
use crate::request::{
    CreateDomainRequest, CreateRecordRequest, DeleteDomainRequest, DeleteRecordRequest, Endpoint,
    GetDomainRequest, GetRecordRequest, ListDomainsRequest, ListRecordsRequest,
    UpdateRecordRequest,
};
use crate::store::UnitOfWork;
use crate::traits::{CredentialProvider, DomainStore, HttpTransport};
use crate::validator::ResponseValidator;

/// Orchestrates remote calls and local sync
///
/// ## Threading
///
/// Every method runs to completion on the calling task. Two concurrent
/// syncs of the same domain race; the last commit wins.
pub struct DomainService {
    /// Transport for remote API calls
    transport: Box<dyn HttpTransport>,

    /// Source of the API key
    credentials: Box<dyn CredentialProvider>,

    /// Local store
    store: Arc<dyn DomainStore>,

    /// Page size for sync pulls
    sync_page_size: u32,
}

impl DomainService {
    /// Create a new domain service
    ///
    /// # Parameters
    ///
    /// - `transport`: HTTP transport implementation
    /// - `credentials`: API key provider
    /// - `store`: Local store implementation
    pub fn new(
        transport: Box<dyn HttpTransport>,
        credentials: Box<dyn CredentialProvider>,
        store: Arc<dyn DomainStore>,
    ) -> Self {
        Self {
            transport,
            credentials,
            store,
            sync_page_size: SyncSettings::default().page_size,
        }
    }

    /// Apply sync settings
    pub fn with_sync_settings(mut self, settings: &SyncSettings) -> Self {
        self.sync_page_size = settings.page_size;
        self
    }

    /// The local store
    pub fn store(&self) -> &Arc<dyn DomainStore> {
        &self.store
    }

    // ---------------------------------------------------------------------
    // Domains
    // ---------------------------------------------------------------------

    /// List remote domains (`domains`, empty when absent)
    pub async fn list_domains(&self, page: u32, per_page: u32) -> Result<Vec<Map<String, Value>>> {
        let response = self.dispatch(&ListDomainsRequest::new(page, per_page)).await?;
        Ok(ResponseValidator::validate_domain_list(&response)?.items)
    }

    /// Get one remote domain (`domain`, empty when absent)
    pub async fn get_domain(&self, name: &str) -> Result<Map<String, Value>> {
        let response = self.dispatch(&GetDomainRequest::new(name)).await?;
        ResponseValidator::validate_domain(&response)
    }

    /// Create a remote domain, optionally with an apex A record
    pub async fn create_domain(
        &self,
        name: &str,
        ip_address: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let mut request = CreateDomainRequest::new(name);
        if let Some(ip_address) = ip_address {
            request = request.with_ip_address(ip_address);
        }

        let response = self.dispatch(&request).await?;
        info!(domain = name, "Created remote domain");
        ResponseValidator::validate_domain(&response)
    }

    /// Delete a remote domain
    ///
    /// Returns `false` (after logging the cause) instead of failing.
    pub async fn delete_domain(&self, name: &str) -> bool {
        match self.dispatch(&DeleteDomainRequest::new(name)).await {
            Ok(_) => {
                info!(domain = name, "Deleted remote domain");
                true
            }
            Err(e) => {
                error!(domain = name, error = %e, "Failed to delete domain");
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Records
    // ---------------------------------------------------------------------

    /// List remote records of a domain (`domain_records`, empty when absent)
    pub async fn list_records(
        &self,
        domain_name: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Map<String, Value>>> {
        let request = ListRecordsRequest::new(domain_name).with_page(page, per_page);
        let response = self.dispatch(&request).await?;
        Ok(ResponseValidator::validate_record_list(&response)?.items)
    }

    /// Get one remote record (`domain_record`, empty when absent)
    pub async fn get_record(&self, domain_name: &str, record_id: i64) -> Result<Map<String, Value>> {
        let response = self
            .dispatch(&GetRecordRequest::new(domain_name, record_id))
            .await?;
        ResponseValidator::validate_record(&response)
    }

    /// Create a remote record
    pub async fn create_record(&self, request: &CreateRecordRequest) -> Result<Map<String, Value>> {
        let response = self.dispatch(request).await?;
        info!(
            domain = %request.domain_name,
            record_type = %request.fields.record_type,
            name = %request.fields.name,
            "Created remote record"
        );
        ResponseValidator::validate_record(&response)
    }

    /// Update a remote record
    pub async fn update_record(&self, request: &UpdateRecordRequest) -> Result<Map<String, Value>> {
        let response = self.dispatch(request).await?;
        info!(
            domain = %request.domain_name,
            record_id = request.record_id,
            "Updated remote record"
        );
        ResponseValidator::validate_record(&response)
    }

    /// Delete a remote record
    ///
    /// Returns `false` (after logging the cause) instead of failing.
    pub async fn delete_record(&self, domain_name: &str, record_id: i64) -> bool {
        match self
            .dispatch(&DeleteRecordRequest::new(domain_name, record_id))
            .await
        {
            Ok(_) => {
                info!(domain = domain_name, record_id, "Deleted remote record");
                true
            }
            Err(e) => {
                error!(domain = domain_name, record_id, error = %e, "Failed to delete record");
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Sync
    // ---------------------------------------------------------------------

    /// Pull remote domains into the local store
    ///
    /// Domains are matched by exact name. `ttl` and `zone_file` are only
    /// overwritten when the remote entry carries them.
    ///
    /// # Returns
    ///
    /// The upserted domains as stored, or an empty list when the remote
    /// side has none (in which case the store is not touched).
    pub async fn sync_domains(&self) -> Result<Vec<Domain>> {
        let remote = self.list_domains(1, self.sync_page_size).await?;
        if remote.is_empty() {
            info!("No remote domains to sync");
            return Ok(Vec::new());
        }

        let mut work = UnitOfWork::new(self.store.as_ref());
        let mut skipped = 0usize;

        for entry in &remote {
            let Some(name) = entry.get("name").and_then(scalar_text).filter(|n| !n.is_empty())
            else {
                skipped += 1;
                continue;
            };

            let domain = work.domain(&name).await?;
            domain.name = name;
            if let Some(ttl) = entry.get("ttl").and_then(scalar_text) {
                domain.ttl = Some(ttl);
            }
            if let Some(zone_file) = entry.get("zone_file").and_then(scalar_text) {
                domain.zone_file = Some(zone_file);
            }
        }

        let committed = work.commit().await?;
        info!(
            synced = committed.domains.len(),
            skipped,
            "Domain sync complete"
        );

        Ok(committed.domains)
    }

    /// Pull the records of one domain into the local store
    ///
    /// Records are matched by (domain name, remote id) and merged with
    /// [`RecordMapper::apply`], so fields missing from the payload keep
    /// their stored value.
    pub async fn sync_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>> {
        let remote = self
            .list_records(domain_name, 1, self.sync_page_size)
            .await?;
        if remote.is_empty() {
            info!(domain = domain_name, "No remote records to sync");
            return Ok(Vec::new());
        }

        let mut work = UnitOfWork::new(self.store.as_ref());
        let mut skipped = 0usize;

        for entry in &remote {
            if entry.get("id").is_none_or(is_empty_id) {
                skipped += 1;
                continue;
            }

            let record_id = RecordMapper::record_id(entry)?;
            let record = work.record(domain_name, record_id).await?;
            RecordMapper::apply(record, entry, domain_name)?;
        }

        let committed = work.commit().await?;
        info!(
            domain = domain_name,
            synced = committed.records.len(),
            skipped,
            "Record sync complete"
        );

        Ok(committed.records)
    }

    // ---------------------------------------------------------------------
    // Local reads
    // ---------------------------------------------------------------------

    /// Locally stored domains
    pub async fn local_domains(&self) -> Result<Vec<Domain>> {
        self.store.list_domains().await
    }

    /// Locally stored records of a domain
    pub async fn local_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>> {
        self.store.list_records(domain_name).await
    }

    /// One locally stored record
    pub async fn local_record(
        &self,
        domain_name: &str,
        record_id: i64,
    ) -> Result<Option<DomainRecord>> {
        self.store.find_record(domain_name, record_id).await
    }

    /// Build the request, attach the credential and send it
    async fn dispatch<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<Value> {
        endpoint.validate()?;

        let api_key = self
            .credentials
            .api_key()
            .ok_or_else(|| Error::config("No DigitalOcean API key configured"))?;

        let mut request = endpoint.to_request();
        request.set_api_key(api_key);

        debug!(
            transport = self.transport.transport_name(),
            method = %request.method,
            path = %request.path,
            "Sending API request"
        );
        self.transport.send(&request).await
    }
}

/// Text form of a scalar payload value; null and containers yield None.
///
/// Whole floats lose their fraction (`1800.0` is `"1800"`), `true` is `"1"`
/// and `false` is `""`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{:.0}", f)),
            _ => Some(number.to_string()),
        },
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

/// Remote ids that mark an entry as unusable: null, 0, "", "0", false
fn is_empty_id(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

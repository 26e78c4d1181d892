// # File Store
//
// File-based implementation of DomainStore with crash recovery.
//
// ## Purpose
//
// Keeps the local copy of domains and records across runs in a single
// JSON document holding both tables.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good state
// - Recovery: Falls back to backup if corruption detected
//
// ## Transactions
//
// A commit is applied to a copy of the tables, the copy is written to disk,
// and only then does it replace the in-memory tables. A failed write leaves
// both the file and the in-memory tables untouched.
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "next_domain_id": 1,
//   "next_record_id": 1,
//   "domains": [
//     { "id": 1, "name": "example.com", "ttl": "1800", "zone_file": null,
//       "created_at": "2025-01-09T12:00:00Z", "updated_at": "2025-01-09T12:00:00Z" }
//   ],
//   "domain_records": [
//     { "id": 1, "domain_name": "example.com", "record_id": 1001, "record_type": "A",
//       "name": "www", "data": "192.168.1.100", "priority": null, "port": null,
//       "ttl": 3600, "weight": null, "flags": null, "tag": null, "account_id": null }
//   ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::model::{Domain, DomainRecord};
use crate::store::tables::Tables;
use crate::traits::store::{ChangeSet, Committed, DomainStore};

/// Store file format version
/// Used for future migration if format changes
const STORE_FILE_VERSION: &str = "1.0";

/// File-based store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use dosync_core::store::FileStore;
/// use dosync_core::traits::DomainStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStore::new("/var/lib/dosync/store.json").await?;
///
///     for domain in store.list_domains().await? {
///         println!("{}", domain.name);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    tables: Arc<RwLock<Tables>>,
}

/// Serializable store file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    next_domain_id: i64,
    next_record_id: i64,
    domains: Vec<Domain>,
    domain_records: Vec<DomainRecord>,
}

impl StoreFileFormat {
    fn from_tables(tables: &Tables) -> Self {
        Self {
            version: STORE_FILE_VERSION.to_string(),
            next_domain_id: tables.next_domain_id,
            next_record_id: tables.next_record_id,
            domains: tables.domains.values().cloned().collect(),
            domain_records: tables.records.values().cloned().collect(),
        }
    }

    fn into_tables(self) -> Result<Tables, Error> {
        let mut tables = Tables {
            next_domain_id: self.next_domain_id,
            next_record_id: self.next_record_id,
            ..Tables::default()
        };

        for domain in self.domains {
            let id = domain
                .id
                .ok_or_else(|| Error::store(format!("Stored domain '{}' has no id", domain.name)))?;
            tables.next_domain_id = tables.next_domain_id.max(id);
            tables.domains.insert(id, domain);
        }

        for record in self.domain_records {
            let id = record.id.ok_or_else(|| {
                Error::store(format!(
                    "Stored record {} of '{}' has no id",
                    record.record_id, record.domain_name
                ))
            })?;
            tables.next_record_id = tables.next_record_id.max(id);
            tables.records.insert(id, record);
        }

        Ok(tables)
    }
}

impl FileStore {
    /// Create or load a file store
    ///
    /// This will:
    /// 1. Try to load existing store file
    /// 2. If corruption detected, try to load from backup
    /// 3. If both fail, start with empty tables
    /// 4. Create parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let tables = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            tables: Arc::new(RwLock::new(tables)),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load tables from file with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try to load main store file
    /// 2. If it cannot be parsed, try loading backup
    /// 3. If backup also fails, start with empty tables
    async fn load_with_recovery(path: &Path) -> Result<Tables, Error> {
        match Self::load(path).await {
            Ok(tables) => {
                tracing::debug!(
                    "Loaded store from file: {} domains, {} records",
                    tables.domains.len(),
                    tables.records.len()
                );
                Ok(tables)
            }
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "Store file appears corrupted: {}. Attempting recovery from backup.",
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with empty store.");
                    return Ok(Tables::default());
                }

                match Self::load(&backup_path).await {
                    Ok(tables) => {
                        tracing::info!(
                            "Recovered store from backup: {} domains, {} records",
                            tables.domains.len(),
                            tables.records.len()
                        );

                        if let Err(restore_err) = Self::restore_from_backup(path, &backup_path).await
                        {
                            tracing::error!(
                                "Failed to restore store file from backup: {}",
                                restore_err
                            );
                        }

                        Ok(tables)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup also corrupted: {}. Starting with empty store.",
                            backup_err
                        );
                        Ok(Tables::default())
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Load tables from file
    async fn load(path: &Path) -> Result<Tables, Error> {
        if !path.exists() {
            tracing::debug!("Store file does not exist: {}", path.display());
            return Ok(Tables::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::store(format!("Failed to read store file {}: {}", path.display(), e))
        })?;

        let store_file: StoreFileFormat = serde_json::from_str(&content)?;

        if store_file.version != STORE_FILE_VERSION {
            tracing::warn!(
                "Store file version mismatch: expected {}, got {}. \
                Attempting to load anyway.",
                STORE_FILE_VERSION,
                store_file.version
            );
        }

        store_file.into_tables()
    }

    /// Write a snapshot of the tables to file atomically
    async fn write(&self, tables: &Tables) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&StoreFileFormat::from_tables(tables))
            .map_err(|e| Error::store(format!("Failed to serialize store: {}", e)))?;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Create backup of current file (if it exists)
        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Store written to file: {}", self.path.display());
        Ok(())
    }

    /// Restore store file from backup
    async fn restore_from_backup(path: &Path, backup_path: &Path) -> Result<(), Error> {
        fs::copy(backup_path, path).await.map_err(|e| {
            Error::store(format!(
                "Failed to restore from backup {} to {}: {}",
                backup_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::info!("Restored store file from backup");
        Ok(())
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    /// Get path to backup file
    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl DomainStore for FileStore {
    async fn find_domain_by_name(&self, name: &str) -> Result<Option<Domain>, Error> {
        Ok(self.tables.read().await.find_domain_by_name(name))
    }

    async fn find_record(
        &self,
        domain_name: &str,
        record_id: i64,
    ) -> Result<Option<DomainRecord>, Error> {
        Ok(self.tables.read().await.find_record(domain_name, record_id))
    }

    async fn list_domains(&self) -> Result<Vec<Domain>, Error> {
        Ok(self.tables.read().await.list_domains())
    }

    async fn list_records(&self, domain_name: &str) -> Result<Vec<DomainRecord>, Error> {
        Ok(self.tables.read().await.list_records(domain_name))
    }

    async fn commit(&self, changes: ChangeSet) -> Result<Committed, Error> {
        let mut guard = self.tables.write().await;

        let mut staged = guard.clone();
        let committed = staged.apply(changes, chrono::Utc::now())?;

        self.write(&staged).await?;
        *guard = staged;

        Ok(committed)
    }

    async fn detach_account(&self, account_id: i64) -> Result<usize, Error> {
        let mut guard = self.tables.write().await;

        let mut staged = guard.clone();
        let detached = staged.detach_account(account_id);
        if detached == 0 {
            return Ok(0);
        }

        self.write(&staged).await?;
        *guard = staged;

        Ok(detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(record_id: i64, data: &str) -> DomainRecord {
        let mut record = DomainRecord::new("example.com", record_id);
        record.record_type = "A".to_string();
        record.name = "www".to_string();
        record.data = data.to_string();
        record
    }

    async fn commit_record(store: &FileStore, record: DomainRecord) -> DomainRecord {
        store
            .commit(ChangeSet {
                domains: vec![],
                records: vec![record],
            })
            .await
            .unwrap()
            .records
            .remove(0)
    }

    #[tokio::test]
    async fn test_file_store_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path).await.unwrap();

        // Initially empty
        assert!(store.list_domains().await.unwrap().is_empty());

        store
            .commit(ChangeSet {
                domains: vec![Domain::new("example.com")],
                records: vec![record(1001, "192.168.1.100")],
            })
            .await
            .unwrap();

        // Verify file was written
        assert!(path.exists());

        // Load new instance and verify persistence
        let store2 = FileStore::new(&path).await.unwrap();
        let domain = store2.find_domain_by_name("example.com").await.unwrap().unwrap();
        assert_eq!(domain.id, Some(1));
        assert!(domain.created_at.is_some());

        let loaded = store2.find_record("example.com", 1001).await.unwrap().unwrap();
        assert_eq!(loaded.data, "192.168.1.100");

        // Identifier counters survive a reload
        let next = commit_record(&store2, record(1002, "10.0.0.2")).await;
        assert_eq!(next.id, Some(2));
    }

    #[tokio::test]
    async fn test_file_store_corruption_recovery() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path).await.unwrap();
        let mut stored = commit_record(&store, record(1001, "1.2.3.4")).await;

        // Write again to ensure backup is created
        stored.data = "1.2.3.5".to_string();
        commit_record(&store, stored).await;

        let backup_path = FileStore::backup_path(&path);
        assert!(backup_path.exists(), "Backup file should exist after write");

        // Corrupt the store file
        fs::write(&path, b"corrupted json data").await.unwrap();

        let store2 = FileStore::new(&path)
            .await
            .expect("Corrupted store file should be recovered from backup");
        let recovered = store2.find_record("example.com", 1001).await.unwrap().unwrap();
        // Backup holds the state before the last write
        assert_eq!(recovered.data, "1.2.3.4");
    }

    #[tokio::test]
    async fn test_file_store_rejected_commit_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path).await.unwrap();
        commit_record(&store, record(1001, "1.2.3.4")).await;
        let before = fs::read_to_string(&path).await.unwrap();

        let result = store
            .commit(ChangeSet {
                domains: vec![Domain::new("example.com")],
                records: vec![record(1002, "")],
            })
            .await;

        assert!(result.unwrap_err().is_validation());
        assert_eq!(fs::read_to_string(&path).await.unwrap(), before);
        assert!(store.find_domain_by_name("example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_detach_account_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path).await.unwrap();
        let mut linked = record(1001, "1.2.3.4");
        linked.account_id = Some(4);
        commit_record(&store, linked).await;

        assert_eq!(store.detach_account(4).await.unwrap(), 1);
        assert_eq!(store.detach_account(4).await.unwrap(), 0);

        let store2 = FileStore::new(&path).await.unwrap();
        let loaded = store2.find_record("example.com", 1001).await.unwrap().unwrap();
        assert_eq!(loaded.account_id, None);
    }
}

// # Store Implementations
//
// This module provides implementations of the DomainStore trait for
// different persistence strategies, plus the unit of work used to stage
// and commit sync batches.

pub mod file;
pub mod memory;
mod tables;
pub mod unit_of_work;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use unit_of_work::UnitOfWork;

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::traits::DomainStore;

/// Open the store described by `config`
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DomainStore>> {
    match config {
        StoreConfig::File { path } => Ok(Arc::new(FileStore::new(path).await?)),
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_store_from_config() {
        let memory = open_store(&StoreConfig::Memory).await.unwrap();
        assert!(memory.list_domains().await.unwrap().is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let file = open_store(&StoreConfig::File {
            path: path.display().to_string(),
        })
        .await
        .unwrap();
        assert!(file.list_domains().await.unwrap().is_empty());
        assert!(path.parent().unwrap().exists());
    }
}

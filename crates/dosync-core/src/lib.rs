// # dosync-core
//
// Core library for synchronizing DigitalOcean DNS domains and records with
// a local store.
//
// ## Architecture Overview
//
// - **request**: One builder per API operation (method, path, query, body)
// - **HttpTransport**: Trait for sending requests to the provider API
// - **ResponseValidator**: Normalizes decoded responses, fails fast on bad shapes
// - **RecordMapper**: Merges remote record payloads onto local records
// - **DomainStore**: Trait for local persistence, with memory and file stores
// - **DomainService**: Orchestrates remote calls and transactional sync
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from transport implementations
// 2. **Library-First**: The CLI is a thin layer over `DomainService`
// 3. **All-or-Nothing Sync**: Each sync stages its upserts and commits once
// 4. **Merge, Don't Replace**: Absent remote fields never clear local values

pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod request;
pub mod service;
pub mod store;
pub mod traits;
pub mod validator;

// Re-export core types for convenience
pub use config::{ApiConfig, DosyncConfig, StoreConfig, SyncSettings};
pub use error::{Error, Result};
pub use mapper::RecordMapper;
pub use model::{Domain, DomainRecord};
pub use service::DomainService;
pub use store::{FileStore, MemoryStore, UnitOfWork, open_store};
pub use traits::{CredentialProvider, DomainStore, HttpTransport, StaticCredential};
pub use validator::{ListResponse, ResponseValidator};

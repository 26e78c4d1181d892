//! Core traits for the dosync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HttpTransport`]: Send API requests to the DNS provider
//! - [`CredentialProvider`]: Supply the API key
//! - [`DomainStore`]: Local persistence of domains and records

pub mod store;
pub mod transport;

pub use store::{ChangeSet, Committed, DomainStore};
pub use transport::{CredentialProvider, HttpTransport, StaticCredential};

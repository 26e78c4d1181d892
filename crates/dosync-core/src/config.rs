//! Configuration types for the dosync system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Default DigitalOcean API base URL
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";

/// Main dosync configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DosyncConfig {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Local store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Sync settings
    #[serde(default)]
    pub sync: SyncSettings,
}

impl DosyncConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.api.validate()?;
        self.store.validate()?;
        self.sync.validate()?;
        Ok(())
    }
}

/// DigitalOcean API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Personal access token. Empty means "not configured"; the service
    /// reports that as a configuration error on first use.
    #[serde(default)]
    pub api_token: String,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Validate the API configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Local store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// File-based store
    File {
        /// Path to the store file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("Store file path cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::File { .. } => "file",
            StoreConfig::Memory => "memory",
        }
    }
}

/// Sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Page size used when pulling domains or records (one page per sync)
    #[serde(default = "default_sync_page_size")]
    pub page_size: u32,
}

impl SyncSettings {
    /// Validate the sync settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(1..=200).contains(&self.page_size) {
            return Err(crate::Error::config(format!(
                "Sync page size must be between 1 and 200. Got: {}",
                self.page_size
            )));
        }
        Ok(())
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            page_size: default_sync_page_size(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_sync_page_size() -> u32 {
    100
}

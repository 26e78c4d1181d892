// # dosync - DigitalOcean DNS sync CLI
//
// A thin command layer over `dosync_core::DomainService`. It is responsible
// for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the DigitalOcean transport, credential and local store
// 4. Running one command and mapping the outcome to an exit code
//
// ## Configuration
//
// ### API
// - `DOSYNC_API_TOKEN`: DigitalOcean personal access token
// - `DOSYNC_API_URL`: API base URL (default: https://api.digitalocean.com/v2)
// - `DOSYNC_HTTP_TIMEOUT_SECS`: HTTP timeout in seconds (default: 30)
//
// ### Local Store
// - `DOSYNC_STORE_TYPE`: Type of store (file, memory; default: file)
// - `DOSYNC_STORE_PATH`: Path to the store file (default: dosync.json)
//
// ### Sync
// - `DOSYNC_SYNC_PAGE_SIZE`: Entries pulled per sync (default: 100)
//
// ### Logging
// - `DOSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//
// ## Example
//
// ```bash
// export DOSYNC_API_TOKEN=dop_v1_...
// export DOSYNC_STORE_PATH=/var/lib/dosync/store.json
//
// dosync domain sync
// dosync record sync example.com
// dosync record list example.com --local
// ```

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use dosync_core::{
    ApiConfig, DomainService, DosyncConfig, StaticCredential, StoreConfig, SyncSettings,
    open_store,
};
use dosync_provider_digitalocean::DigitalOceanTransport;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Process exit codes
#[derive(Debug, Clone, Copy)]
enum DosyncExitCode {
    /// Command completed
    Success = 0,
    /// Configuration, remote or store failure
    Failure = 1,
}

impl From<DosyncExitCode> for ExitCode {
    fn from(code: DosyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Settings read from the environment
#[derive(Debug)]
struct Config {
    api_token: String,
    api_url: Option<String>,
    http_timeout_secs: Option<u64>,
    store_type: String,
    store_path: String,
    sync_page_size: Option<u32>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_token: lookup("DOSYNC_API_TOKEN").unwrap_or_default(),
            api_url: lookup("DOSYNC_API_URL").filter(|url| !url.is_empty()),
            http_timeout_secs: parse_number(&lookup, "DOSYNC_HTTP_TIMEOUT_SECS")?,
            store_type: lookup("DOSYNC_STORE_TYPE").unwrap_or_else(|| "file".to_string()),
            store_path: lookup("DOSYNC_STORE_PATH").unwrap_or_else(|| "dosync.json".to_string()),
            sync_page_size: parse_number(&lookup, "DOSYNC_SYNC_PAGE_SIZE")?,
            log_level: lookup("DOSYNC_LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// A missing token is not an error here: local reads work without one,
    /// and remote calls report it themselves.
    fn validate(&self) -> Result<()> {
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DOSYNC_API_TOKEN appears to be a placeholder. \
                Use a personal access token from the DigitalOcean control panel."
            );
        }

        match self.store_type.as_str() {
            "file" | "memory" => {}
            _ => anyhow::bail!(
                "DOSYNC_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                self.store_type
            ),
        }

        if self.store_type == "file" && self.store_path.is_empty() {
            anyhow::bail!("DOSYNC_STORE_PATH cannot be empty when DOSYNC_STORE_TYPE=file");
        }

        if let Some(timeout) = self.http_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            anyhow::bail!(
                "DOSYNC_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DOSYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.to_dosync_config().validate()?;
        Ok(())
    }

    /// Library configuration described by these settings
    fn to_dosync_config(&self) -> DosyncConfig {
        let mut api = ApiConfig {
            api_token: self.api_token.clone(),
            ..ApiConfig::default()
        };
        if let Some(ref url) = self.api_url {
            api.base_url = url.clone();
        }
        if let Some(timeout) = self.http_timeout_secs {
            api.timeout_secs = timeout;
        }

        let store = match self.store_type.as_str() {
            "memory" => StoreConfig::Memory,
            _ => StoreConfig::File {
                path: self.store_path.clone(),
            },
        };

        let mut sync = SyncSettings::default();
        if let Some(page_size) = self.sync_page_size {
            sync.page_size = page_size;
        }

        DosyncConfig { api, store, sync }
    }

    /// Log level, raised by each `-v`
    fn log_level(&self, verbose: u8) -> Level {
        let configured = match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        };

        match verbose {
            0 => configured,
            1 => configured.max(Level::DEBUG),
            _ => Level::TRACE,
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a number. Got: {}", key, raw)),
        _ => Ok(None),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DosyncExitCode::Failure.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DosyncExitCode::Failure.into();
    }

    // Log to stderr so command output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DosyncExitCode::Failure.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DosyncExitCode::Failure.into();
        }
    };

    let result = rt.block_on(run(config.to_dosync_config(), cli));

    match result {
        Ok(()) => DosyncExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            DosyncExitCode::Failure.into()
        }
    }
}

/// Wire the service and run one command
async fn run(config: DosyncConfig, cli: Cli) -> Result<()> {
    debug!(
        store = config.store.type_name(),
        api_url = %config.api.base_url,
        "Starting dosync"
    );

    let transport = DigitalOceanTransport::from_config(&config.api)
        .context("Failed to create DigitalOcean transport")?;
    let store = open_store(&config.store)
        .await
        .context("Failed to open local store")?;

    let service = DomainService::new(
        Box::new(transport),
        Box::new(StaticCredential::new(config.api.api_token.clone())),
        store,
    )
    .with_sync_settings(&config.sync);

    commands::run(&service, cli.command).await
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration (file optional) and apply environment overrides
//! - Build the store and the flag service
//! - Assemble the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The store is not contacted at startup; each request connects on its own

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::validation::validate_config;
use crate::config::{load_config, AppConfig, ConfigError};
use crate::flags::{FlagError, FlagService};
use crate::http::HttpServer;
use crate::store::{RedisStore, StoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("feature flags: {0}")]
    Flags(#[from] FlagError),
}

/// Resolve the effective configuration.
///
/// Starts from the file at `path` (or defaults), then overlays `lookup`
/// (normally the process environment), then validates.
pub fn resolve_config<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides(lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the server wired to Redis and, if configured, the flag service.
pub fn build_server(config: AppConfig) -> Result<HttpServer, StartupError> {
    let store = RedisStore::new(&config.store)?;
    let flags = FlagService::from_config(&config.flags)?;

    tracing::info!(
        store = %crate::store::Store::describe(&store),
        counter_key = %config.store.counter_key,
        max_attempts = config.store.max_attempts,
        retry_delay_ms = config.store.retry_delay_ms,
        flags_enabled = flags.is_enabled(),
        "Subsystems initialized"
    );

    Ok(HttpServer::new(config, Arc::new(store), flags))
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the visit counter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Key-value store holding the counter.
    pub store: StoreConfig,

    /// Feature flag service settings.
    pub flags: FlagConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Store connection and retry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Redis host.
    pub host: String,

    /// Redis port.
    pub port: u16,

    /// Logical database index.
    pub db: i64,

    /// Optional password (AUTH).
    pub password: Option<String>,

    /// Key holding the visit counter.
    pub counter_key: String,

    /// Connection attempts before giving up.
    pub max_attempts: u32,

    /// Fixed delay between connection attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Upper bound for a single store command in milliseconds.
    pub command_timeout_ms: u64,
}

impl StoreConfig {
    /// Connection URL understood by the redis client.
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{}@{}:{}/{}", password, self.host, self.port, self.db),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
            counter_key: "visitas".to_string(),
            max_attempts: 10,
            retry_delay_ms: 1000,
            command_timeout_ms: 2000,
        }
    }
}

/// Feature flag service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlagConfig {
    /// SDK key. Without one the flag is never evaluated.
    pub sdk_key: Option<String>,

    /// Boolean flag consulted on every visit.
    pub flag_name: String,

    /// Base URL of the flag service client API.
    pub base_url: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            sdk_key: None,
            flag_name: "color_por_visita".to_string(),
            base_url: "https://config.ff.harness.io/api/1.0".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

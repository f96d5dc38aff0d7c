//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, timeouts > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check the configuration, collecting every problem.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.store.host.trim().is_empty() {
        errors.push(ValidationError::new("store.host", "must not be empty"));
    }
    if config.store.counter_key.is_empty() {
        errors.push(ValidationError::new("store.counter_key", "must not be empty"));
    }
    if config.store.max_attempts == 0 {
        errors.push(ValidationError::new("store.max_attempts", "must be at least 1"));
    }
    if config.store.command_timeout_ms == 0 {
        errors.push(ValidationError::new("store.command_timeout_ms", "must be greater than 0"));
    }

    if config.flags.flag_name.trim().is_empty() {
        errors.push(ValidationError::new("flags.flag_name", "must not be empty"));
    }
    if config.flags.timeout_secs == 0 {
        errors.push(ValidationError::new("flags.timeout_secs", "must be greater than 0"));
    }
    if config.flags.sdk_key.is_some() {
        if let Err(e) = url::Url::parse(&config.flags.base_url) {
            errors.push(ValidationError::new(
                "flags.base_url",
                format!("invalid URL '{}': {}", config.flags.base_url, e),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", observability.log_format),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Flag evaluation types and error definitions.

use async_trait::async_trait;
use thiserror::Error;

/// Identity a flag is evaluated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub identifier: String,
    pub name: String,
}

impl Target {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            name: identifier.clone(),
            identifier,
        }
    }

    /// Per-visit target, `user-<visits>`.
    pub fn for_visit(visits: i64) -> Self {
        Self::new(format!("user-{}", visits))
    }
}

/// Errors that can occur while evaluating a flag.
#[derive(Debug, Error)]
pub enum FlagError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("Flag service returned status {status} for {endpoint}")]
    Status { endpoint: &'static str, status: u16 },

    /// Authentication was rejected or the token was unusable.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Client is misconfigured (e.g. base URL cannot carry a path).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Flag exists but is not a boolean.
    #[error("Flag '{flag}' is of kind '{kind}', expected boolean")]
    NotBoolean { flag: String, kind: String },
}

/// Result type for flag operations.
pub type FlagResult<T> = Result<T, FlagError>;

/// A remote service answering boolean flag queries.
#[async_trait]
pub trait FlagOracle: Send + Sync {
    /// Boolean variation of `flag` for `target`.
    async fn bool_variation(&self, flag: &str, target: &Target) -> FlagResult<bool>;
}

/// Outcome of a flag evaluation, as seen by handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagDecision {
    /// No SDK key configured; the default was used without any I/O.
    Disabled(bool),
    /// The service answered.
    Evaluated(bool),
    /// The service failed; the default was substituted.
    Fallback(bool),
}

impl FlagDecision {
    pub fn value(self) -> bool {
        match self {
            FlagDecision::Disabled(v) | FlagDecision::Evaluated(v) | FlagDecision::Fallback(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_for_visit() {
        let target = Target::for_visit(7);
        assert_eq!(target.identifier, "user-7");
        assert_eq!(target.name, "user-7");
    }

    #[test]
    fn test_decision_value() {
        assert!(FlagDecision::Evaluated(true).value());
        assert!(!FlagDecision::Disabled(false).value());
        assert!(FlagDecision::Fallback(true).value());
    }

    #[test]
    fn test_error_display() {
        let err = FlagError::NotBoolean {
            flag: "color_por_visita".into(),
            kind: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Flag 'color_por_visita' is of kind 'string', expected boolean"
        );
    }
}

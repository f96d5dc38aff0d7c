//! Store-facing traits and error definitions.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connector gave up after exhausting its attempts.
    #[error("No se pudo conectar a Redis tras {attempts} intentos: {reason}")]
    Unavailable { attempts: u32, reason: String },

    /// Connection could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A command failed on an established connection.
    #[error("Command {command} failed: {reason}")]
    Command { command: &'static str, reason: String },

    /// A command did not complete in time.
    #[error("Command {command} timed out after {millis} ms")]
    Timeout { command: &'static str, millis: u64 },

    /// The store answered with something we did not expect.
    #[error("Unexpected reply to {command}: {reply}")]
    UnexpectedReply { command: &'static str, reply: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Something that can hand out connections to the counter store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a new connection. Liveness is checked separately with `ping`.
    async fn open(&self) -> StoreResult<Box<dyn StoreConnection>>;

    /// Human-readable target for logs (e.g. `redis://localhost:6379/0`).
    fn describe(&self) -> String;
}

/// An open connection to the store.
#[async_trait]
pub trait StoreConnection: Send {
    /// Liveness check.
    async fn ping(&mut self) -> StoreResult<()>;

    /// Atomically add one to `key` and return the new value.
    /// An absent key counts as zero.
    async fn incr(&mut self, key: &str) -> StoreResult<i64>;

    /// Unconditionally overwrite `key`.
    async fn set(&mut self, key: &str, value: i64) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Unavailable {
            attempts: 10,
            reason: "Connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "No se pudo conectar a Redis tras 10 intentos: Connection refused"
        );

        let err = StoreError::Timeout { command: "INCR", millis: 2000 };
        assert!(err.to_string().contains("INCR"));
    }
}

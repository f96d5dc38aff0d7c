//! Store connection acquisition with bounded retries.
//!
//! # Responsibilities
//! - Open a connection and confirm it answers PING
//! - Retry a fixed number of times with a fixed delay
//! - Turn exhaustion into `StoreError::Unavailable`
//!
//! # Design Decisions
//! - One connection per request, no pool; atomicity lives in the store
//! - The caller always sees the error; nothing is swallowed here

use std::sync::Arc;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::resilience::retry_fixed;
use crate::store::types::{Store, StoreConnection, StoreError, StoreResult};

/// Hands out live connections to the configured store.
#[derive(Clone)]
pub struct Connector {
    store: Arc<dyn Store>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Connector {
    pub fn new(store: Arc<dyn Store>, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            store,
            max_attempts,
            retry_delay,
        }
    }

    /// Build a connector using the retry settings in `config`.
    pub fn from_config(store: Arc<dyn Store>, config: &StoreConfig) -> Self {
        Self::new(
            store,
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// Connect, retrying until the store answers PING or attempts run out.
    pub async fn connect(&self) -> StoreResult<Box<dyn StoreConnection>> {
        let result = retry_fixed("store_connect", self.max_attempts, self.retry_delay, |attempt| async move {
            tracing::debug!(attempt, max_attempts = self.max_attempts, "Connecting to store");
            let outcome = self.try_connect().await;
            metrics::record_store_connect(outcome.is_ok());
            outcome
        })
        .await;

        match result {
            Ok(conn) => Ok(conn),
            Err(exhausted) => {
                tracing::error!(
                    target_store = %self.store.describe(),
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Store unavailable"
                );
                Err(StoreError::Unavailable {
                    attempts: exhausted.attempts,
                    reason: exhausted.last_error.to_string(),
                })
            }
        }
    }

    async fn try_connect(&self) -> StoreResult<Box<dyn StoreConnection>> {
        let mut conn = self.store.open().await?;
        conn.ping().await?;
        Ok(conn)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn connector(store: &MemoryStore, attempts: u32) -> Connector {
        Connector::new(Arc::new(store.clone()), attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_connect_first_try() {
        let store = MemoryStore::new();
        let mut conn = connector(&store, 10).connect().await.unwrap();
        assert_eq!(conn.incr("visitas").await.unwrap(), 1);
        assert_eq!(store.open_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_gives_up_after_max_attempts() {
        let store = MemoryStore::new();
        store.set_reachable(false);

        let err = connector(&store, 3).connect().await.err().unwrap();
        match err {
            StoreError::Unavailable { attempts, reason } => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("Connection refused"));
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
        assert_eq!(store.open_count(), 3);
    }

    #[tokio::test]
    async fn test_connect_recovers_when_store_comes_up() {
        let store = MemoryStore::new();
        store.set_reachable(false);

        let background = store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            background.set_reachable(true);
        });

        let connector = Connector::new(Arc::new(store.clone()), 50, Duration::from_millis(10));
        assert!(connector.connect().await.is_ok());
        assert!(store.open_count() > 1);
    }
}

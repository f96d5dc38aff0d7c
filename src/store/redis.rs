//! Redis-backed counter store.
//!
//! # Responsibilities
//! - Open connections to the configured Redis server
//! - Map PING / INCR / SET onto single round-trip commands
//! - Bound every call with the configured command timeout

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::time::timeout;

use crate::config::StoreConfig;
use crate::store::types::{Store, StoreConnection, StoreError, StoreResult};

/// Store implementation talking to a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    target: String,
    command_timeout: Duration,
}

impl RedisStore {
    /// Build a store from configuration. Does not touch the network.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(config.url())
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            // Never log the password.
            target: format!("redis://{}:{}/{}", config.host, config.port, config.db),
            command_timeout: Duration::from_millis(config.command_timeout_ms),
        })
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn open(&self) -> StoreResult<Box<dyn StoreConnection>> {
        let conn = bounded("CONNECT", self.command_timeout, self.client.get_multiplexed_async_connection())
            .await
            .map_err(|e| match e {
                StoreError::Command { reason, .. } => StoreError::Connection(reason),
                other => other,
            })?;

        Ok(Box::new(RedisConnection {
            conn,
            command_timeout: self.command_timeout,
        }))
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// A single multiplexed Redis connection.
pub struct RedisConnection {
    conn: redis::aio::MultiplexedConnection,
    command_timeout: Duration,
}

#[async_trait]
impl StoreConnection for RedisConnection {
    async fn ping(&mut self) -> StoreResult<()> {
        let cmd = redis::cmd("PING");
        let reply: String = bounded("PING", self.command_timeout, cmd.query_async(&mut self.conn)).await?;
        if reply != "PONG" {
            return Err(StoreError::UnexpectedReply { command: "PING", reply });
        }
        Ok(())
    }

    async fn incr(&mut self, key: &str) -> StoreResult<i64> {
        bounded("INCR", self.command_timeout, self.conn.incr(key, 1i64)).await
    }

    async fn set(&mut self, key: &str, value: i64) -> StoreResult<()> {
        bounded("SET", self.command_timeout, self.conn.set(key, value)).await
    }
}

/// Await a redis future under a deadline, mapping both failure modes.
async fn bounded<T, F>(command: &'static str, limit: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StoreError::Command {
            command,
            reason: e.to_string(),
        }),
        Err(_) => Err(StoreError::Timeout {
            command,
            millis: limit.as_millis() as u64,
        }),
    }
}

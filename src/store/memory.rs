//! In-process counter store.
//!
//! Same semantics as the Redis store (absent key counts as zero, INCR is
//! atomic). Used by tests and for running the service without Redis.
//! `set_reachable(false)` makes every `open` fail, which is how tests
//! exercise the connector's retry path. `set_commands_fail(true)` keeps
//! connections and PING working but fails INCR and SET.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::store::types::{Store, StoreConnection, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    values: Mutex<HashMap<String, i64>>,
    unreachable: AtomicBool,
    commands_fail: AtomicBool,
    opens: AtomicU32,
}

/// Shared in-memory store. Clones observe the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated reachability.
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Toggle simulated failure of INCR and SET.
    pub fn set_commands_fail(&self, fail: bool) {
        self.inner.commands_fail.store(fail, Ordering::SeqCst);
    }

    /// Current value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.lock().get(key).copied()
    }

    /// Number of `open` calls seen so far, successful or not.
    pub fn open_count(&self) -> u32 {
        self.inner.opens.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.inner.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if self.inner.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("Connection refused".to_string()));
        }
        Ok(())
    }

    fn check_command(&self, command: &'static str) -> StoreResult<()> {
        self.check_reachable()?;
        if self.inner.commands_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Command {
                command,
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn open(&self) -> StoreResult<Box<dyn StoreConnection>> {
        self.inner.opens.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(Box::new(MemoryConnection { store: self.clone() }))
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}

struct MemoryConnection {
    store: MemoryStore,
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn ping(&mut self) -> StoreResult<()> {
        self.store.check_reachable()
    }

    async fn incr(&mut self, key: &str) -> StoreResult<i64> {
        self.store.check_command("INCR")?;
        let mut values = self.store.lock();
        let value = values.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn set(&mut self, key: &str, value: i64) -> StoreResult<()> {
        self.store.check_command("SET")?;
        self.store.lock().insert(key.to_string(), value);
        Ok(())
    }
}

//! Counter store subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → connector.rs (open + PING, bounded fixed-delay retries)
//!     → StoreConnection (redis.rs in production, memory.rs in tests)
//!     → INCR / SET / PING, one atomic command each
//! ```
//!
//! # Design Decisions
//! - `Store` / `StoreConnection` traits are the seam between handlers
//!   and the backend
//! - No read-modify-write in the application; INCR does the work
//! - Connections are per request, so a dead store never poisons a pool

pub mod connector;
pub mod memory;
pub mod redis;
pub mod types;

pub use connector::Connector;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;
pub use types::{Store, StoreConnection, StoreError, StoreResult};

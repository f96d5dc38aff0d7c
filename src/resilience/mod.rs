//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Store connection:
//!     → retries.rs (bounded attempts, fixed delay)
//!     → Exhausted { attempts, last_error } surfaces to the handler
//! ```
//!
//! # Design Decisions
//! - Only connection establishment is retried; commands are not
//! - Each store command carries its own deadline (see store::redis)

pub mod retries;

pub use retries::{retry_fixed, Exhausted};

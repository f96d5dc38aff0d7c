//! Feature flag subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (after INCR)
//!     → service.rs (skip if no SDK key, fall back to default on error)
//!     → client.rs (Harness client API: auth once, evaluate per target)
//! ```
//!
//! # Design Decisions
//! - Flag evaluation is advisory; a failure never fails the request and
//!   never undoes the increment
//! - `FlagOracle` is the seam; tests plug in stubs

pub mod client;
pub mod service;
pub mod types;

pub use client::HarnessClient;
pub use service::FlagService;
pub use types::{FlagDecision, FlagError, FlagOracle, FlagResult, Target};

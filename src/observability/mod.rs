//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, connector, flag client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

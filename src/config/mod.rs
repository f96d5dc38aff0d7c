//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (FF_SDK_KEY, FF_FLAG_NAME, REDIS_*)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with the handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::FlagConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::StoreConfig;
pub use schema::TimeoutConfig;

//! Visit counter service library.

pub mod config;
pub mod flags;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;
pub mod view;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

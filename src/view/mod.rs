//! HTML output for the handlers.

pub mod page;

pub use page::{Color, VisitView};

/// Body returned after the counter is reset.
pub const RESET_OK: &str = r#"✅ ¡Contador reiniciado! <a href="/">Volver</a>"#;

/// Body returned when the store answers the health check.
pub const HEALTH_OK: &str = "✅ Health check: Todo funciona correctamente (Flask + Redis)";

/// Error body for the counter and reset routes.
pub fn error_message(error: &dyn std::fmt::Display) -> String {
    format!("❌ Error: {}", error)
}

/// Error body for the health route.
pub fn health_failure(error: &dyn std::fmt::Display) -> String {
    format!("❌ Health check failed: {}", error)
}

//! Visit counter
//!
//! Counts page visits in Redis and colours the page according to a remote
//! feature flag.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /, /reiniciar, /health
//!     ─────────────────────────────▶ ┌──────────────┐    ┌───────────┐    ┌─────────┐
//!                                    │ http server  │───▶│ connector │───▶│  Redis  │
//!                                    │  + handlers  │    │ (retries) │    └─────────┘
//!                                    └──────┬───────┘    └───────────┘
//!                                           │            ┌───────────┐    ┌─────────┐
//!                                           ├───────────▶│   flags   │───▶│ Harness │
//!                                           │            └───────────┘    └─────────┘
//!     HTML ◀─────────────────────────── view (askama)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use visit_counter::lifecycle::{build_server, resolve_config, Shutdown};
use visit_counter::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "visit-counter")]
#[command(about = "Visit counter backed by Redis with feature-flagged colours", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "VISIT_COUNTER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = resolve_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("visit-counter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        flag_name = %config.flags.flag_name,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = build_server(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    let early_exit = tokio::select! {
        _ = shutdown.trigger_on_signal() => None,
        result = &mut server_task => Some(result),
    };

    match early_exit {
        // Server stopped without a signal; surface why.
        Some(result) => result??,
        None => server_task.await??,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

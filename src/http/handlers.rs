//! Route handlers.
//!
//! Every handler acquires its own store connection, runs one store
//! command and renders text. Store failures and an expired request
//! deadline are caught here and rendered as `❌ ...` bodies with status
//! 200; they never reach axum as errors.

use std::future::Future;
use std::time::{Duration, Instant};

use askama::Template;
use axum::{extract::State, response::Html};
use thiserror::Error;

use crate::flags::Target;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::StoreError;
use crate::view::{self, VisitView};

/// Failures that turn a page into an error message.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("Request exceeded its {}s deadline", .0.as_secs())]
    Deadline(Duration),
}

/// Run handler work under the request deadline.
async fn within_deadline<T, F>(limit: Duration, work: F) -> Result<T, HandlerError>
where
    F: Future<Output = Result<T, HandlerError>>,
{
    tokio::time::timeout(limit, work)
        .await
        .unwrap_or(Err(HandlerError::Deadline(limit)))
}

/// `GET /`: count the visit and render the page.
pub async fn visit_counter(State(state): State<AppState>) -> Html<String> {
    let start = Instant::now();
    match within_deadline(state.request_timeout, count_visit(&state)).await {
        Ok(page) => {
            metrics::record_request("/", "success", start);
            Html(page)
        }
        Err(e) => {
            tracing::error!(error = %e, "Visit counting failed");
            metrics::record_request("/", "error", start);
            Html(view::error_message(&e))
        }
    }
}

async fn count_visit(state: &AppState) -> Result<String, HandlerError> {
    let mut conn = state.connector.connect().await?;
    // The increment is committed before the flag is consulted and is
    // never rolled back.
    let visits = conn.incr(&state.counter_key).await?;

    let decision = state
        .flags
        .evaluate_bool(&Target::for_visit(visits), false)
        .await;

    let page = VisitView::new(visits, decision.value(), state.flags.flag_name());
    tracing::info!(visits, flag_on = page.flag_on, label = page.label, "Visit counted");

    Ok(page.render()?)
}

/// `GET /reiniciar`: set the counter back to zero.
pub async fn reset_counter(State(state): State<AppState>) -> Html<String> {
    let start = Instant::now();
    match within_deadline(state.request_timeout, reset(&state)).await {
        Ok(()) => {
            tracing::info!(key = %state.counter_key, "Counter reset");
            metrics::record_request("/reiniciar", "success", start);
            Html(view::RESET_OK.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Counter reset failed");
            metrics::record_request("/reiniciar", "error", start);
            Html(view::error_message(&e))
        }
    }
}

async fn reset(state: &AppState) -> Result<(), HandlerError> {
    let mut conn = state.connector.connect().await?;
    Ok(conn.set(&state.counter_key, 0).await?)
}

/// `GET /health`: report whether the store answers PING.
pub async fn health_check(State(state): State<AppState>) -> Html<String> {
    let start = Instant::now();
    match within_deadline(state.request_timeout, ping(&state)).await {
        Ok(()) => {
            metrics::record_request("/health", "success", start);
            Html(view::HEALTH_OK.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            metrics::record_request("/health", "error", start);
            Html(view::health_failure(&e))
        }
    }
}

async fn ping(state: &AppState) -> Result<(), HandlerError> {
    let mut conn = state.connector.connect().await?;
    Ok(conn.ping().await?)
}

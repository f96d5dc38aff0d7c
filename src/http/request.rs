//! Request ID generation and propagation.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client sent none
//! - Attach the ID to the request span and echo it on the response
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Client-supplied IDs are kept as-is

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// `x-request-id` as a typed header name.
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Generates random UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID of `request`, or `"unknown"`.
pub fn request_id_of<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

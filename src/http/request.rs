//! Request identification and per-request instrumentation.
//!
//! # Responsibilities
//! - Name the request-id header shared by the set/propagate layers
//! - Open one tracing span per request carrying id, method and URI
//! - Record request count and latency metrics
//!
//! # Design Decisions
//! - The request ID is assigned by `SetRequestIdLayer` before the trace layer
//!   runs, so the span always sees it
//! - A client-supplied `x-request-id` is kept and echoed back unchanged

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Span;

use crate::observability::metrics;

/// Header carrying the request identifier.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Span for one request, used by `TraceLayer::make_span_with`.
pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}

/// Middleware recording request count and duration.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_for_request_without_id() {
        let request = Request::builder()
            .uri("/mgmt/tm/ltm/profile/client-ssl")
            .body(Body::empty())
            .unwrap();
        // Without an installed subscriber the span is disabled but still valid.
        let span = make_span(&request);
        let _entered = span.enter();
    }
}

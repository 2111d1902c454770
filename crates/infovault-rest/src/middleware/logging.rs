//! Request logging middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Paths polled by orchestrators; logged at debug level only.
const PROBE_PATHS: [&str; 4] = ["/ping", "/health", "/ready", "/live"];

/// Logs one line per request with its status and latency.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if PROBE_PATHS.contains(&path.as_str()) {
        debug!(target: "http", %method, %path, status, elapsed_ms, "HTTP request completed");
    } else if response.status().is_server_error() {
        warn!(target: "http", %method, %path, status, elapsed_ms, "HTTP request failed");
    } else {
        info!(target: "http", %method, %path, status, elapsed_ms, "HTTP request completed");
    }

    response
}

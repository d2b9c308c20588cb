//! Health check endpoint for liveness probes.
//!
//! Returns 200 OK as long as the HTTP server is accepting connections. It
//! says nothing about whether the last poll succeeded; see `/status` for that.

use axum::http::StatusCode;

/// Health check handler.
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
///
/// OK
/// ```
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

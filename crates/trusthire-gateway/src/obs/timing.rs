//! Request-timing middleware.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Responses with status >= 400 count as errors.
pub fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

/// Time the inner handler and record the outcome once per request.
pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let resp = next.run(req).await;

    let elapsed = started.elapsed();
    let status = resp.status();
    state.metrics().record_duration(elapsed, is_error_status(status));

    tracing::debug!(
        %method,
        %path,
        status = status.as_u16(),
        latency_ms = elapsed.as_secs_f64() * 1000.0,
        "request completed"
    );
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(!is_error_status(StatusCode::OK));
        assert!(!is_error_status(StatusCode::NO_CONTENT));
        assert!(!is_error_status(StatusCode::PERMANENT_REDIRECT));
        assert!(is_error_status(StatusCode::BAD_REQUEST));
        assert!(is_error_status(StatusCode::NOT_FOUND));
        assert!(is_error_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_error_status(StatusCode::SERVICE_UNAVAILABLE));
    }
}

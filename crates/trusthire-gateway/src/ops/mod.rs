//! Operational HTTP endpoints.
//!
//! - `/healthz`            : liveness
//! - `/readyz`             : readiness (503 when draining)
//! - `/health`             : service identity
//! - `/metrics`            : JSON summary
//! - `/metrics/prometheus` : Prometheus text format
//! - `/system/health`      : simplified health view
//!
//! The three snapshot endpoints sit behind `limit_snapshots`.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use trusthire_core::exposition::{
    render_prometheus, MetricsSummary, SystemHealth, PROMETHEUS_CONTENT_TYPE,
};

use crate::app_state::AppState;
use crate::config::Environment;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: String,
    pub environment: Environment,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let app = &state.cfg().app;
    Json(HealthStatus {
        status: "healthy",
        version: app.version.clone(),
        environment: app.environment,
    })
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSummary> {
    Json(state.summary())
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> Response {
    let body = render_prometheus(&state.summary(), &state.cfg().metrics.namespace);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

pub async fn system_health(State(state): State<AppState>) -> Json<SystemHealth> {
    Json(SystemHealth::from_summary(&state.summary()))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "message": "Not Found" })),
    )
}

/// Reject snapshot requests over the configured per-minute limit.
pub async fn limit_snapshots(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(limiter) = state.snapshot_limiter() {
        if let Err(retry_after) = limiter.check() {
            tracing::debug!(path = %req.uri().path(), retry_after, "snapshot request rate limited");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(json!({ "error": "rate_limit_exceeded", "message": "Too many requests" })),
            )
                .into_response();
        }
    }
    next.run(req).await
}

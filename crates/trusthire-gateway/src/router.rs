//! Axum router wiring.
//!
//! All routes, including the fallback, pass through the request-timing
//! middleware so that read endpoints count as requests too. Snapshot
//! routes are additionally rate limited; a 429 is recorded as an error.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let snapshots = Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/metrics/prometheus", get(ops::metrics_prometheus))
        .route("/system/health", get(ops::system_health))
        .route_layer(middleware::from_fn_with_state(state.clone(), ops::limit_snapshots));

    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/health", get(ops::health))
        .merge(snapshots)
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), obs::track_requests))
        .with_state(state)
}

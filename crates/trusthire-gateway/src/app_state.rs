//! Shared application state for the TrustHire gateway.
//!
//! Built once in `main` and handed to the router; every handler and the
//! request-timing middleware reach the metrics aggregator through it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trusthire_core::exposition::MetricsSummary;
use trusthire_core::RequestMetrics;

use crate::config::AppConfig;
use crate::policy::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<RequestMetrics>,
}

struct AppStateInner {
    cfg: AppConfig,
    snapshot_limiter: Option<RateLimiter>,
    draining: AtomicBool,
}

impl AppState {
    /// Build application state from a validated config.
    pub fn new(cfg: AppConfig) -> Self {
        let cost = cfg.metrics.estimated_cost_per_request_usd;
        if cost == 0.0 {
            tracing::warn!("metrics.estimated_cost_per_request_usd is 0, cost figures will read zero");
        }
        let metrics = Arc::new(RequestMetrics::new(cost));
        Self::with_metrics(cfg, metrics)
    }

    /// Build state around an existing aggregator.
    pub fn with_metrics(cfg: AppConfig, metrics: Arc<RequestMetrics>) -> Self {
        let snapshot_limiter = cfg
            .rate_limit
            .enabled
            .then(|| RateLimiter::per_minute(cfg.rate_limit.snapshot_per_minute));
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                snapshot_limiter,
                draining: AtomicBool::new(false),
            }),
            metrics,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &RequestMetrics {
        &self.metrics
    }

    /// Limiter for snapshot endpoints; `None` when disabled.
    pub fn snapshot_limiter(&self) -> Option<&RateLimiter> {
        self.inner.snapshot_limiter.as_ref()
    }

    /// Take a snapshot and flatten it for rendering.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary::from_snapshot(&self.metrics.snapshot())
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}

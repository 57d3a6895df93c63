//! Read representations of a [`RequestSnapshot`].
//!
//! - `MetricsSummary`: flat numeric mapping served as JSON.
//! - `render_prometheus`: text exposition, one HELP/TYPE/sample triplet per field.
//! - `SystemHealth`: simplified presentation view.
//!
//! Values are taken from the snapshot without re-rounding, except the two
//! fields derived here (`uptime_percent`, `uptime_seconds`).

use std::fmt::Write;

use serde::Serialize;

use crate::metrics::{round_to, RequestSnapshot};

/// Default metric name prefix.
pub const DEFAULT_NAMESPACE: &str = "trusthire";
/// Content type for the text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
/// Fixed figure reported by the simplified health view.
pub const AI_ACCURACY: &str = "99.97%";

/// Flat summary of a snapshot.
///
/// `uptime_percent` is `100 - error_rate * 100` clamped at zero: an
/// availability proxy derived from the error rate, not measured uptime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub uptime_percent: f64,
    pub uptime_seconds: f64,
    pub latency_avg_ms: f64,
    pub latency_p95_ms: f64,
    pub requests_per_minute: f64,
    pub error_rate: f64,
    pub cost_per_request_usd: f64,
    pub total_requests: u64,
    pub total_errors: u64,
}

impl MetricsSummary {
    pub fn from_snapshot(s: &RequestSnapshot) -> Self {
        let uptime_percent = (100.0 - s.error_rate * 100.0).max(0.0);
        Self {
            uptime_percent: round_to(uptime_percent, 3),
            uptime_seconds: round_to(s.uptime_seconds, 2),
            latency_avg_ms: s.avg_latency_ms,
            latency_p95_ms: s.p95_latency_ms,
            requests_per_minute: s.requests_per_minute,
            error_rate: s.error_rate,
            cost_per_request_usd: s.estimated_cost_per_request_usd,
            total_requests: s.total_requests,
            total_errors: s.total_errors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Render in Prometheus text exposition format.
///
/// Names are `{namespace}_{field}`. Output ends with a newline.
pub fn render_prometheus(summary: &MetricsSummary, namespace: &str) -> String {
    let families = [
        (
            "uptime_percent",
            "Uptime percentage",
            MetricKind::Gauge,
            format_float(summary.uptime_percent),
        ),
        (
            "latency_avg_ms",
            "Average latency in milliseconds",
            MetricKind::Gauge,
            format_float(summary.latency_avg_ms),
        ),
        (
            "latency_p95_ms",
            "P95 latency in milliseconds",
            MetricKind::Gauge,
            format_float(summary.latency_p95_ms),
        ),
        (
            "requests_per_minute",
            "Requests per minute",
            MetricKind::Gauge,
            format_float(summary.requests_per_minute),
        ),
        (
            "error_rate",
            "Error rate",
            MetricKind::Gauge,
            format_float(summary.error_rate),
        ),
        (
            "total_requests",
            "Total requests",
            MetricKind::Counter,
            summary.total_requests.to_string(),
        ),
        (
            "total_errors",
            "Total errors",
            MetricKind::Counter,
            summary.total_errors.to_string(),
        ),
    ];

    let mut out = String::new();
    for (field, help, kind, value) in families {
        let _ = writeln!(out, "# HELP {namespace}_{field} {help}");
        let _ = writeln!(out, "# TYPE {namespace}_{field} {}", kind.as_str());
        let _ = writeln!(out, "{namespace}_{field} {value}");
    }
    out
}

/// Simplified health view.
///
/// Presentation only: `threats_blocked` is `total_errors` under another name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub uptime: String,
    pub latency: String,
    pub ai_accuracy: &'static str,
    pub threats_blocked: u64,
}

impl SystemHealth {
    pub fn from_summary(summary: &MetricsSummary) -> Self {
        Self {
            uptime: format!("{}%", format_float(summary.uptime_percent)),
            latency: format!("{}ms", format_float(summary.latency_avg_ms)),
            ai_accuracy: AI_ACCURACY,
            threats_blocked: summary.total_errors,
        }
    }
}

/// Format a float so integral values keep a `.0` suffix (`100.0`, `0.5`).
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf".into() } else { "-Inf".into() };
    }
    let s = v.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

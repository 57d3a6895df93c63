use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use trusthire_core::error::{Result, TrustHireError};
use trusthire_core::exposition::DEFAULT_NAMESPACE;
use trusthire_core::metrics::DEFAULT_COST_PER_REQUEST_USD;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub rate_limit: RateLimitSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            app: AppSection::default(),
            gateway: GatewaySection::default(),
            metrics: MetricsSection::default(),
            rate_limit: RateLimitSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TrustHireError::UnsupportedVersion);
        }
        self.app.validate()?;
        self.gateway.validate()?;
        self.metrics.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}

/// Deployment environment reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Staging,
    Prod,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    #[serde(default)]
    pub environment: Environment,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: Environment::default(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrustHireError::BadRequest("app.name must not be empty".into()));
        }
        if self.version.trim().is_empty() {
            return Err(TrustHireError::BadRequest("app.version must not be empty".into()));
        }
        Ok(())
    }
}

fn default_app_name() -> String {
    "TrustHire".into()
}
fn default_app_version() -> String {
    "2.0.0".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            TrustHireError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_cost_per_request")]
    pub estimated_cost_per_request_usd: f64,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            estimated_cost_per_request_usd: default_cost_per_request(),
            namespace: default_namespace(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        let cost = self.estimated_cost_per_request_usd;
        if !cost.is_finite() || cost < 0.0 {
            return Err(TrustHireError::BadRequest(
                "metrics.estimated_cost_per_request_usd must be a finite, non-negative number".into(),
            ));
        }
        if !is_metric_name(&self.namespace) {
            return Err(TrustHireError::BadRequest(format!(
                "metrics.namespace must match [a-zA-Z_][a-zA-Z0-9_]*: {:?}",
                self.namespace
            )));
        }
        Ok(())
    }
}

fn is_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_cost_per_request() -> f64 {
    DEFAULT_COST_PER_REQUEST_USD
}
fn default_namespace() -> String {
    DEFAULT_NAMESPACE.into()
}

/// Throttle for endpoints that take a metrics snapshot.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSection {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    #[serde(default = "default_snapshot_per_minute")]
    pub snapshot_per_minute: u32,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            snapshot_per_minute: default_snapshot_per_minute(),
        }
    }
}

impl RateLimitSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100_000).contains(&self.snapshot_per_minute) {
            return Err(TrustHireError::BadRequest(
                "rate_limit.snapshot_per_minute must be between 1 and 100000".into(),
            ));
        }
        Ok(())
    }
}

fn default_rate_limit_enabled() -> bool {
    true
}
fn default_snapshot_per_minute() -> u32 {
    120
}

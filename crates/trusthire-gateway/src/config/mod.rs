//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use trusthire_core::error::{Result, TrustHireError};

pub use schema::{
    AppConfig, AppSection, Environment, GatewaySection, MetricsSection, RateLimitSection,
};

/// Config file read when `TRUSTHIRE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "trusthire.yaml";
/// Environment variable overriding the config path.
pub const CONFIG_PATH_ENV: &str = "TRUSTHIRE_CONFIG";

/// Load config from `$TRUSTHIRE_CONFIG`, else `trusthire.yaml`.
///
/// A missing default file falls back to built-in defaults. An explicitly
/// configured path must exist.
pub fn load() -> Result<AppConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_file(&path),
        Err(_) if !Path::new(DEFAULT_CONFIG_PATH).exists() => {
            tracing::warn!(path = DEFAULT_CONFIG_PATH, "config file not found, using defaults");
            let cfg = AppConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(_) => load_from_file(DEFAULT_CONFIG_PATH),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TrustHireError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| TrustHireError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

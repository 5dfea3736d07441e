//! Runtime configuration read from the process environment.
//!
//! | Variable                 | Default                       |
//! |--------------------------|-------------------------------|
//! | `SALES_BIND_ADDR`        | `0.0.0.0:8081`                |
//! | `USER_SERVICE_URL`       | `http://localhost:8080/users` |
//! | `USER_LOOKUP_TIMEOUT_MS` | `5000`                        |
//! | `SALES_INITIAL_STATUS`   | `random`                      |
//!
//! Unset or blank variables fall back to the default. Set but malformed
//! values are rejected at startup.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use salesdesk_infra::DEFAULT_LOOKUP_TIMEOUT;
use salesdesk_sales::{FixedInitialStatus, InitialStatusPolicy, RandomInitialStatus};

pub const BIND_ADDR_ENV: &str = "SALES_BIND_ADDR";
pub const USER_SERVICE_URL_ENV: &str = "USER_SERVICE_URL";
pub const USER_LOOKUP_TIMEOUT_ENV: &str = "USER_LOOKUP_TIMEOUT_MS";
pub const INITIAL_STATUS_ENV: &str = "SALES_INITIAL_STATUS";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:8080/users";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How newly created sales get their status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialStatusMode {
    /// Uniformly random over pending/approved/rejected.
    #[default]
    Random,
    /// Always `pending`.
    Pending,
}

impl InitialStatusMode {
    pub fn policy(self) -> Arc<dyn InitialStatusPolicy> {
        match self {
            InitialStatusMode::Random => Arc::new(RandomInitialStatus),
            InitialStatusMode::Pending => Arc::new(FixedInitialStatus::pending()),
        }
    }
}

impl FromStr for InitialStatusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(InitialStatusMode::Random),
            "pending" => Ok(InitialStatusMode::Pending),
            _ => Err("expected one of: random, pending".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub user_service_url: String,
    pub user_lookup_timeout: Duration,
    pub initial_status: InitialStatusMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8081)),
            user_service_url: DEFAULT_USER_SERVICE_URL.to_string(),
            user_lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            initial_status: InitialStatusMode::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(BIND_ADDR_ENV) {
            config.bind_addr = raw
                .trim()
                .parse()
                .map_err(|e: std::net::AddrParseError| invalid(BIND_ADDR_ENV, &raw, e.to_string()))?;
        }

        if let Some(raw) = get(USER_SERVICE_URL_ENV) {
            let url = raw.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(USER_SERVICE_URL_ENV, &raw, "expected an http(s) URL"));
            }
            config.user_service_url = url.to_string();
        }

        if let Some(raw) = get(USER_LOOKUP_TIMEOUT_ENV) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(USER_LOOKUP_TIMEOUT_ENV, &raw, e.to_string()))?;
            if ms == 0 {
                return Err(invalid(USER_LOOKUP_TIMEOUT_ENV, &raw, "must be greater than zero"));
            }
            config.user_lookup_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = get(INITIAL_STATUS_ENV) {
            config.initial_status = raw.parse().map_err(|reason| invalid(INITIAL_STATUS_ENV, &raw, reason))?;
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.user_lookup_timeout, Duration::from_secs(5));
        assert_eq!(config.initial_status, InitialStatusMode::Random);
    }

    #[test]
    fn reads_every_variable() {
        let config = from_pairs(&[
            (BIND_ADDR_ENV, "127.0.0.1:9000"),
            (USER_SERVICE_URL_ENV, "https://users.internal/users"),
            (USER_LOOKUP_TIMEOUT_ENV, "250"),
            (INITIAL_STATUS_ENV, "Pending"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.user_service_url, "https://users.internal/users");
        assert_eq!(config.user_lookup_timeout, Duration::from_millis(250));
        assert_eq!(config.initial_status, InitialStatusMode::Pending);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = from_pairs(&[(BIND_ADDR_ENV, "  "), (INITIAL_STATUS_ENV, "")]).unwrap();
        assert_eq!(config, ApiConfig::default());
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = from_pairs(&[(USER_LOOKUP_TIMEOUT_ENV, "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: USER_LOOKUP_TIMEOUT_ENV, .. }));

        assert!(from_pairs(&[(USER_LOOKUP_TIMEOUT_ENV, "0")]).is_err());
        assert!(from_pairs(&[(BIND_ADDR_ENV, "not-an-addr")]).is_err());
        assert!(from_pairs(&[(USER_SERVICE_URL_ENV, "ftp://users")]).is_err());
        assert!(from_pairs(&[(INITIAL_STATUS_ENV, "approved")]).is_err());
    }

    #[test]
    fn pending_mode_always_chooses_pending() {
        let policy = InitialStatusMode::Pending.policy();
        for _ in 0..20 {
            assert_eq!(policy.choose(), salesdesk_sales::SaleStatus::Pending);
        }
    }
}

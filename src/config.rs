//! Server configuration read from environment variables.
//!
//! - `TASKMARKET_HOST` - bind address. Defaults to `127.0.0.1`.
//! - `TASKMARKET_PORT` - bind port. Defaults to `3000`.
//! - `DATABASE_URL` - optional `PostgreSQL` URL. Without it tasks, providers,
//!   and messages live in memory.
//! - `DATABASE_POOL_SIZE` - maximum pooled connections. Defaults to `8`.
//! - `NOTIFICATION_TIMEOUT_MS` - upper bound for one notification delivery.
//!   Defaults to `2000`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 2000;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be used.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Database settings, present only when `DATABASE_URL` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Database settings; `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Upper bound for one notification delivery.
    pub notification_timeout: Duration,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable cannot be
    /// parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host: IpAddr = parse_or(&lookup, "TASKMARKET_HOST", || Ok(DEFAULT_HOST))?;
        let port: u16 = parse_or(&lookup, "TASKMARKET_PORT", || Ok(DEFAULT_PORT))?;
        let pool_size: u32 = parse_or(&lookup, "DATABASE_POOL_SIZE", || Ok(DEFAULT_POOL_SIZE))?;
        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_POOL_SIZE",
                value: pool_size.to_string(),
                reason: "must be at least 1".to_owned(),
            });
        }
        let timeout_ms: u64 = parse_or(&lookup, "NOTIFICATION_TIMEOUT_MS", || {
            Ok(DEFAULT_NOTIFICATION_TIMEOUT_MS)
        })?;

        let database = lookup("DATABASE_URL")
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig { url, pool_size });

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            database,
            notification_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: impl FnOnce() -> Result<T, ConfigError>,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|err| invalid(key, &raw, &err)),
        None => default(),
    }
}

fn invalid(key: &'static str, value: &str, err: &impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
        reason: err.to_string(),
    }
}

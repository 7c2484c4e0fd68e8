//! Configuration management for the todo server.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, str::FromStr, time::Duration};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Port 0 would bind a random port
    #[error("PORT must be between 1 and 65535")]
    InvalidPort,

    /// Host is empty
    #[error("HOST must not be empty")]
    EmptyHost,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter used when `RUST_LOG` directives are absent
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            log_level: "info".to_string(),
            shutdown_timeout: 10,
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable           | Default     |
    /// |--------------------|-------------|
    /// | `HOST`             | `127.0.0.1` |
    /// | `PORT`             | `3001`      |
    /// | `RUST_LOG`         | `info`      |
    /// | `SHUTDOWN_TIMEOUT` | `10`        |
    /// | `METRICS_ENABLED`  | `true`      |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Values that fail to parse fall back to their default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            shutdown_timeout: parse_or(&lookup, "SHUTDOWN_TIMEOUT", defaults.shutdown_timeout),
            metrics_enabled: parse_or(&lookup, "METRICS_ENABLED", defaults.metrics_enabled),
        }
    }

    /// Address to bind, as `host:port`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_duration(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for port 0 or an empty host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, %default, "Ignoring unparsable setting");
        default
    })
}

//! Configuration Module
//!
//! Loads server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Requests allowed per user per UTC day
    pub rate_limit_per_day: u32,
    /// Wall-clock budget of one request in seconds
    pub request_timeout: u64,
    /// Interval of the expired-document sweep in seconds
    pub cleanup_interval: u64,
    /// Ephemeris data directory, if any
    pub ephemeris_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `RATE_LIMIT_PER_DAY` - Daily request quota per user (default: 100)
    /// - `REQUEST_TIMEOUT` - Request budget in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `EPHEMERIS_PATH` - Ephemeris data directory (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            rate_limit_per_day: parse_var("RATE_LIMIT_PER_DAY")
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.rate_limit_per_day),
            request_timeout: parse_var("REQUEST_TIMEOUT")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.request_timeout),
            cleanup_interval: parse_var("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            ephemeris_path: env::var("EPHEMERIS_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            rate_limit_per_day: 100,
            request_timeout: 60,
            cleanup_interval: 60,
            ephemeris_path: None,
        }
    }
}

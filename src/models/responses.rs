//! Response DTOs for the chart service API
//!
//! Service-level bodies: health, stats and errors. Chart and extras
//! envelopes live in `models::chart`.

use serde::Serialize;

use crate::cache::CacheStats;

/// Counters of one result cache, as reported by GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsView {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub writes: u64,
    pub write_failures: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsView {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            writes: stats.writes,
            write_failures: stats.write_failures,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub chart_cache: CacheStatsView,
    pub extras_cache: CacheStatsView,
    /// Documents currently held by the store, expired ones included
    pub stored_documents: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Ephemeris provider tag
    pub provider: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(provider: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            provider: provider.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error class, e.g. `invalid-argument`
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

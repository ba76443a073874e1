//! Cache Module
//!
//! Result caching with TTL expiration: request fingerprints, cache entries,
//! statistics and the generic envelope cache.

mod entry;
mod key;
mod result_cache;
mod stats;


pub use entry::CacheEntry;
pub use key::{chart_cache_key, extras_cache_key};
pub use result_cache::{CachedEnvelope, ResultCache, RESULT_TTL};
pub use stats::CacheStats;

// == Collections ==
/// Store collection holding cached charts
pub const CHART_COLLECTION: &str = "chart_cache";

/// Store collection holding cached extras
pub const EXTRAS_COLLECTION: &str = "extras_cache";

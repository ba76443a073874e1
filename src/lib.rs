//! Astro Chart - natal chart computation service
//!
//! Computes planetary positions, houses and aspects for an instant and
//! location, with per-user daily quotas and a TTL result cache.

pub mod angles;
pub mod api;
pub mod cache;
pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod rate_limit;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::ChartError;
pub use orchestrator::ChartOrchestrator;
pub use tasks::spawn_cleanup_task;

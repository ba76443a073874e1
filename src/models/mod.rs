//! Request and Response models for the chart service API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.
//! The chart and extras envelopes double as the cached document payloads.

pub mod chart;
pub mod requests;
pub mod responses;

pub use chart::{
    Angles, Aspect, AspectKind, BodyPosition, Chart, ChartEnvelope, ChartMeta, DebugSnapshot,
    ExtraPosition, ExtrasEnvelope, ExtrasMeta, Houses, SCHEMA_VERSION,
};
pub use requests::{
    ChartRequest, ChartRequestBody, ExtrasRequest, ExtrasRequestBody, UserId, MAX_EXTRA_BODIES,
};
pub use responses::{CacheStatsView, ErrorResponse, HealthResponse, StatsResponse};

//! Ephemeris Module
//!
//! The provider seam between chart orchestration and the underlying
//! astronomical computation. Providers are constructed explicitly and
//! injected as `Arc<dyn EphemerisProvider>`.

mod analytic;
mod julian;
mod types;

pub use analytic::AnalyticEphemeris;
pub use julian::{centuries_since_j2000, delta_t_seconds, julian_day_ut, J2000};
pub use types::{
    Body, CalcFlags, DataSnapshot, HouseSystem, MinorBody, PointVariant, RawHouses, RawPosition,
    ZodiacSystem, CLASSICAL_PLANETS, MINOR_BODIES,
};

use thiserror::Error;

// == Ephemeris Error ==
/// Errors reported by an ephemeris provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// The provider as a whole cannot compute anything
    #[error("Ephemeris provider unavailable: {0}")]
    Unavailable(String),

    /// Configured data directory does not exist
    #[error("Ephemeris data path not found: {path}")]
    DataPathMissing { path: String },

    /// A single body could not be computed
    #[error("Failed to calculate position for {body} at JD {jd}: {message}")]
    CalculationFailed {
        body: &'static str,
        jd: f64,
        message: String,
    },

    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

impl EphemerisError {
    /// Whether the error takes down a whole chart rather than one body.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EphemerisError::Unavailable(_) | EphemerisError::DataPathMissing { .. }
        )
    }
}

// == Provider Trait ==
/// An ephemeris backend.
///
/// Calls are synchronous and may be CPU- or IO-heavy; the orchestrator runs
/// them on the blocking pool.
pub trait EphemerisProvider: Send + Sync {
    /// Short tag reported in response metadata.
    fn tag(&self) -> &'static str;

    /// TT - UT in seconds at the given Julian Day (UT).
    fn delta_t(&self, jd_ut: f64) -> f64;

    /// Position (and speed, if flagged) of one body.
    fn compute_body(
        &self,
        body: Body,
        jd_ut: f64,
        flags: CalcFlags,
    ) -> Result<RawPosition, EphemerisError>;

    /// House cusps and ASC/MC for a location. `lon` is east-positive.
    fn compute_houses(
        &self,
        jd_ut: f64,
        lat: f64,
        lon: f64,
        system: HouseSystem,
        flags: CalcFlags,
    ) -> Result<RawHouses, EphemerisError>;

    /// Data directory diagnostics for debug snapshots.
    fn data_snapshot(&self) -> DataSnapshot;
}

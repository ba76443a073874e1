//! Request DTOs for the chart service API
//!
//! Wire bodies deserialize into `*Body` types; `validate` resolves defaults
//! and range checks into the immutable request values the core works on.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::ephemeris::{HouseSystem, MinorBody, PointVariant, ZodiacSystem};
use crate::error::{ChartError, Result};

/// Maximum number of bodies accepted by one extras request
pub const MAX_EXTRA_BODIES: usize = 5;

const MAX_USER_ID_LENGTH: usize = 128;

lazy_static! {
    static ref UTC_ISO_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z$")
            .expect("instant pattern compiles");
}

fn parse_instant(utc_iso: &str) -> Result<DateTime<Utc>> {
    if !UTC_ISO_PATTERN.is_match(utc_iso) {
        return Err(ChartError::InvalidInput(
            "utcISO must be ISO 8601 format with Z timezone".to_string(),
        ));
    }
    DateTime::parse_from_rfc3339(utc_iso)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| ChartError::InvalidInput(format!("utcISO is not a valid instant: {err}")))
}

fn check_range(name: &str, value: f64, bound: f64) -> Result<()> {
    if !value.is_finite() || value < -bound || value > bound {
        return Err(ChartError::InvalidInput(format!(
            "{name} must be within [-{bound}, {bound}]"
        )));
    }
    Ok(())
}

// == Identity ==
/// Opaque, already-authenticated caller identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Accepts a non-empty identifier of bounded length.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ChartError::Unauthenticated(
                "a user identity is required".to_string(),
            ));
        }
        if trimmed.len() > MAX_USER_ID_LENGTH {
            return Err(ChartError::InvalidInput(format!(
                "user identity exceeds {MAX_USER_ID_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// == Chart Request ==
/// Request body for POST /v1/chart
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequestBody {
    #[serde(rename = "utcISO")]
    pub utc_iso: String,
    pub lat: f64,
    pub lon: f64,
    pub zodiac_system: ZodiacSystem,
    pub house_system: HouseSystem,
    #[serde(default)]
    pub node_type: Option<PointVariant>,
    #[serde(default)]
    pub lilith_type: Option<PointVariant>,
    #[serde(default)]
    pub want_aspects: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
}

/// Validated chart request with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    /// The instant exactly as the caller sent it
    pub utc_iso: String,
    pub instant: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub zodiac_system: ZodiacSystem,
    pub house_system: HouseSystem,
    pub node_type: PointVariant,
    pub lilith_type: PointVariant,
    pub want_aspects: bool,
    pub debug: bool,
}

impl ChartRequestBody {
    pub fn validate(self) -> Result<ChartRequest> {
        let instant = parse_instant(&self.utc_iso)?;
        check_range("lat", self.lat, 90.0)?;
        check_range("lon", self.lon, 180.0)?;

        Ok(ChartRequest {
            utc_iso: self.utc_iso,
            instant,
            lat: self.lat,
            lon: self.lon,
            zodiac_system: self.zodiac_system,
            house_system: self.house_system,
            node_type: self.node_type.unwrap_or_default(),
            lilith_type: self.lilith_type.unwrap_or_default(),
            want_aspects: self.want_aspects.unwrap_or(true),
            debug: self.debug.unwrap_or(false),
        })
    }
}

// == Extras Request ==
/// Request body for POST /v1/extras
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasRequestBody {
    #[serde(rename = "utcISO")]
    pub utc_iso: String,
    pub zodiac_system: ZodiacSystem,
    pub bodies: Vec<MinorBody>,
    #[serde(default)]
    pub want_speed: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
}

/// Validated extras request. `bodies` is sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrasRequest {
    pub utc_iso: String,
    pub instant: DateTime<Utc>,
    pub zodiac_system: ZodiacSystem,
    pub bodies: Vec<MinorBody>,
    pub want_speed: bool,
    pub debug: bool,
}

impl ExtrasRequestBody {
    pub fn validate(self) -> Result<ExtrasRequest> {
        let instant = parse_instant(&self.utc_iso)?;
        if self.bodies.is_empty() || self.bodies.len() > MAX_EXTRA_BODIES {
            return Err(ChartError::InvalidInput(format!(
                "bodies must list between 1 and {MAX_EXTRA_BODIES} entries"
            )));
        }

        let mut bodies = self.bodies;
        bodies.sort();
        bodies.dedup();

        Ok(ExtrasRequest {
            utc_iso: self.utc_iso,
            instant,
            zodiac_system: self.zodiac_system,
            bodies,
            want_speed: self.want_speed.unwrap_or(true),
            debug: self.debug.unwrap_or(false),
        })
    }
}

//! Chart and extras envelopes
//!
//! These are both the HTTP response bodies and the values persisted in the
//! result cache, so they round-trip through serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ephemeris::{HouseSystem, PointVariant, ZodiacSystem};

/// Response schema version
pub const SCHEMA_VERSION: &str = "v1";

// == Body Positions ==
/// Position of one body (or pseudo-body) in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    pub lon_deg: f64,
    pub lat_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist_au: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_lon_deg_per_day: Option<f64>,
    pub retrograde: bool,
}

impl BodyPosition {
    /// Pseudo-body for a chart angle (ASC, MC, DSC, IC).
    pub fn angle(lon_deg: f64) -> Self {
        Self {
            lon_deg,
            lat_deg: 0.0,
            dist_au: None,
            speed_lon_deg_per_day: None,
            retrograde: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Angles {
    pub asc_deg: f64,
    pub mc_deg: f64,
    pub dsc_deg: f64,
    pub ic_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Houses {
    /// Exactly 12 cusp longitudes, house 1 first
    pub cusps_deg: Vec<f64>,
}

// == Aspects ==
/// The five major aspects, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub const ALL: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    pub fn exact_deg(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspect {
    pub a: String,
    pub b: String,
    #[serde(rename = "type")]
    pub kind: AspectKind,
    pub orb_deg: f64,
    pub exact_deg: f64,
}

// == Chart ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub bodies: BTreeMap<String, BodyPosition>,
    pub angles: Angles,
    pub houses: Houses,
    /// Requested and at least one aspect found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspects: Option<Vec<Aspect>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub ephe_path_set: bool,
    pub files_present: Vec<String>,
    pub jd_ut: f64,
    pub jd_tt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub provider: String,
    pub jd_ut: f64,
    pub jd_tt: f64,
    pub zodiac_system: ZodiacSystem,
    pub house_system: HouseSystem,
    pub node_type: PointVariant,
    pub lilith_type: PointVariant,
    pub cached: bool,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_snapshot: Option<DebugSnapshot>,
}

/// Response of POST /v1/chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEnvelope {
    pub chart: Chart,
    pub meta: ChartMeta,
}

// == Extras ==
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPosition {
    pub longitude_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_deg_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrograde: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasMeta {
    pub provider: String,
    pub zodiac_system: ZodiacSystem,
    pub cached: bool,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_snapshot: Option<DebugSnapshot>,
}

/// Response of POST /v1/extras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrasEnvelope {
    pub extras: BTreeMap<String, ExtraPosition>,
    pub meta: ExtrasMeta,
}

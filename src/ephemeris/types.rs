//! Ephemeris Types
//!
//! Identifiers, calculation flags and raw provider outputs.

use serde::{Deserialize, Serialize};

// == Reference Frames ==
/// Zodiac reference frame of every longitude in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSystem {
    Tropical,
    /// Sidereal with the Lahiri (Chitrapaksha) ayanamsa
    SiderealLahiri,
}

impl ZodiacSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            ZodiacSystem::Tropical => "tropical",
            ZodiacSystem::SiderealLahiri => "sidereal_lahiri",
        }
    }
}

/// House division system. Placidus is the only one supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    Placidus,
}

impl HouseSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
        }
    }
}

/// Computation convention for the lunar node and for Lilith.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointVariant {
    #[default]
    Mean,
    True,
}

impl PointVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            PointVariant::Mean => "mean",
            PointVariant::True => "true",
        }
    }
}

// == Bodies ==
/// Provider-level body identifiers.
///
/// Node and Lilith exist in both variants here; the chart exposes whichever
/// one the request selected under a single name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    MeanNode,
    TrueNode,
    MeanLilith,
    TrueLilith,
    Chiron,
    Ceres,
    Pallas,
    Juno,
    Vesta,
}

/// Sun, Moon and the eight planets, in chart order.
pub const CLASSICAL_PLANETS: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// Chiron and the four main-belt asteroids, in chart order.
pub const MINOR_BODIES: [Body; 5] = [
    Body::Chiron,
    Body::Ceres,
    Body::Pallas,
    Body::Juno,
    Body::Vesta,
];

impl Body {
    /// Name used as the key in a chart's body mapping.
    pub fn chart_name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::MeanNode | Body::TrueNode => "NorthNode",
            Body::MeanLilith | Body::TrueLilith => "Lilith",
            Body::Chiron => "Chiron",
            Body::Ceres => "Ceres",
            Body::Pallas => "Pallas",
            Body::Juno => "Juno",
            Body::Vesta => "Vesta",
        }
    }

    pub fn node(variant: PointVariant) -> Body {
        match variant {
            PointVariant::Mean => Body::MeanNode,
            PointVariant::True => Body::TrueNode,
        }
    }

    pub fn lilith(variant: PointVariant) -> Body {
        match variant {
            PointVariant::Mean => Body::MeanLilith,
            PointVariant::True => Body::TrueLilith,
        }
    }

    pub fn is_minor(self) -> bool {
        MINOR_BODIES.contains(&self)
    }

    /// The 17 bodies requested for a chart: classical planets, the chosen
    /// node, the chosen Lilith, then the minor bodies.
    pub fn chart_set(node: PointVariant, lilith: PointVariant) -> Vec<Body> {
        let mut bodies = CLASSICAL_PLANETS.to_vec();
        bodies.push(Body::node(node));
        bodies.push(Body::lilith(lilith));
        bodies.extend_from_slice(&MINOR_BODIES);
        bodies
    }
}

/// Bodies accepted by the extras endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinorBody {
    Chiron,
    Ceres,
    Pallas,
    Juno,
    Vesta,
}

impl MinorBody {
    pub fn body(self) -> Body {
        match self {
            MinorBody::Chiron => Body::Chiron,
            MinorBody::Ceres => Body::Ceres,
            MinorBody::Pallas => Body::Pallas,
            MinorBody::Juno => Body::Juno,
            MinorBody::Vesta => Body::Vesta,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MinorBody::Chiron => "chiron",
            MinorBody::Ceres => "ceres",
            MinorBody::Pallas => "pallas",
            MinorBody::Juno => "juno",
            MinorBody::Vesta => "vesta",
        }
    }
}

// == Flags ==
/// Per-chart calculation settings handed to every provider call.
///
/// The frame is chosen once per chart so every longitude read for that
/// chart shares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcFlags {
    pub frame: ZodiacSystem,
    /// Also compute daily longitudinal speed
    pub speed: bool,
}

impl CalcFlags {
    pub fn for_frame(frame: ZodiacSystem) -> Self {
        Self { frame, speed: true }
    }

    pub fn without_speed(self) -> Self {
        Self {
            speed: false,
            ..self
        }
    }
}

// == Raw Outputs ==
/// Unrounded body position as returned by a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    /// Ecliptic longitude, degrees
    pub lon: f64,
    /// Ecliptic latitude, degrees
    pub lat: f64,
    /// Geocentric distance, AU
    pub dist: Option<f64>,
    /// Longitudinal speed, degrees/day
    pub speed: Option<f64>,
}

/// House cusps (house 1 first) and the two primary angles.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHouses {
    pub cusps: Vec<f64>,
    pub asc: f64,
    pub mc: f64,
}

/// Diagnostic view of the provider's data directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub path_configured: bool,
    pub files_present: Vec<String>,
}

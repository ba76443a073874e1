//! Chart Assembly
//!
//! Turns raw provider output into a normalized [`ChartEnvelope`]: rounded
//! positions, the derived South Node, house cusps with an equal-house
//! fallback, angle pseudo-bodies, aspects and metadata.

use std::collections::BTreeMap;

use tracing::warn;

use crate::angles::{normalize, round_to};
use crate::chart::aspects::{detect_aspects, ASPECT_BODIES};
use crate::ephemeris::{
    julian_day_ut, Body, CalcFlags, EphemerisError, EphemerisProvider, RawPosition,
};
use crate::error::{ChartError, Result};
use crate::models::{
    Angles, BodyPosition, Chart, ChartEnvelope, ChartMeta, ChartRequest, DebugSnapshot, Houses,
    SCHEMA_VERSION,
};

const SECONDS_PER_DAY: f64 = 86_400.0;
const HOUSE_COUNT: usize = 12;

/// Decimal places kept for longitudes, latitudes and speeds
pub const POSITION_PRECISION: i32 = 4;

pub(crate) fn unavailable(err: EphemerisError) -> ChartError {
    ChartError::Unavailable(err.to_string())
}

/// Rounds a raw provider position into a chart body.
fn body_position(raw: RawPosition) -> BodyPosition {
    let speed = raw.speed.map(|s| round_to(s, POSITION_PRECISION));
    BodyPosition {
        lon_deg: normalize(round_to(raw.lon, POSITION_PRECISION)),
        lat_deg: round_to(raw.lat, POSITION_PRECISION),
        dist_au: raw.dist,
        speed_lon_deg_per_day: speed,
        retrograde: raw.speed.is_some_and(|s| s < 0.0),
    }
}

/// Equal 30 degree houses from 0 Aries, used when the provider cannot
/// produce Placidus cusps.
fn equal_house_fallback() -> (Vec<f64>, f64, f64) {
    let cusps: Vec<f64> = (0..HOUSE_COUNT).map(|i| (i * 30) as f64).collect();
    let asc = cusps[0];
    let mc = cusps[9];
    (cusps, asc, mc)
}

// == Chart Assembler ==
/// Builds charts against one ephemeris provider.
pub struct ChartAssembler<'a> {
    provider: &'a dyn EphemerisProvider,
}

impl<'a> ChartAssembler<'a> {
    pub fn new(provider: &'a dyn EphemerisProvider) -> Self {
        Self { provider }
    }

    /// Computes the full chart for a validated request.
    ///
    /// A failing body is logged and left out. The chart fails only when the
    /// provider as a whole is unavailable or no body could be computed.
    pub fn assemble(&self, request: &ChartRequest) -> Result<ChartEnvelope> {
        let jd_ut = julian_day_ut(request.instant);
        let jd_tt = jd_ut + self.provider.delta_t(jd_ut) / SECONDS_PER_DAY;
        let flags = CalcFlags::for_frame(request.zodiac_system);

        let mut bodies = self.compute_bodies(request, jd_ut, flags)?;

        if let Some(north) = bodies.get("NorthNode").cloned() {
            let south = BodyPosition {
                lon_deg: normalize(north.lon_deg + 180.0),
                ..north
            };
            bodies.insert("SouthNode".to_string(), south);
        }

        let (cusps, asc, mc) = self.compute_houses(request, jd_ut, flags);
        let angles = Angles {
            asc_deg: asc,
            mc_deg: mc,
            dsc_deg: normalize(asc + 180.0),
            ic_deg: normalize(mc + 180.0),
        };
        for (name, lon) in [
            ("ASC", angles.asc_deg),
            ("MC", angles.mc_deg),
            ("DSC", angles.dsc_deg),
            ("IC", angles.ic_deg),
        ] {
            bodies.insert(name.to_string(), BodyPosition::angle(lon));
        }

        // An empty aspect list is left out of the chart.
        let aspects = request
            .want_aspects
            .then(|| {
                detect_aspects(
                    ASPECT_BODIES
                        .iter()
                        .filter_map(|&name| bodies.get(name).map(|p| (name, p.lon_deg))),
                )
            })
            .filter(|aspects| !aspects.is_empty());

        let debug_snapshot = request.debug.then(|| {
            let data = self.provider.data_snapshot();
            DebugSnapshot {
                ephe_path_set: data.path_configured,
                files_present: data.files_present,
                jd_ut,
                jd_tt,
            }
        });

        Ok(ChartEnvelope {
            chart: Chart {
                bodies,
                angles,
                houses: Houses { cusps_deg: cusps },
                aspects,
            },
            meta: ChartMeta {
                provider: self.provider.tag().to_string(),
                jd_ut,
                jd_tt,
                zodiac_system: request.zodiac_system,
                house_system: request.house_system,
                node_type: request.node_type,
                lilith_type: request.lilith_type,
                cached: false,
                version: SCHEMA_VERSION.to_string(),
                debug_snapshot,
            },
        })
    }

    fn compute_bodies(
        &self,
        request: &ChartRequest,
        jd_ut: f64,
        flags: CalcFlags,
    ) -> Result<BTreeMap<String, BodyPosition>> {
        let mut bodies = BTreeMap::new();
        for body in Body::chart_set(request.node_type, request.lilith_type) {
            match self.provider.compute_body(body, jd_ut, flags) {
                Ok(raw) => {
                    bodies.insert(body.chart_name().to_string(), body_position(raw));
                }
                Err(err) if err.is_fatal() => return Err(unavailable(err)),
                Err(err) => {
                    warn!(body = body.chart_name(), error = %err, "Omitting body from chart");
                }
            }
        }

        if bodies.is_empty() {
            return Err(ChartError::Unavailable(
                "no body position could be computed".to_string(),
            ));
        }
        Ok(bodies)
    }

    fn compute_houses(
        &self,
        request: &ChartRequest,
        jd_ut: f64,
        flags: CalcFlags,
    ) -> (Vec<f64>, f64, f64) {
        match self.provider.compute_houses(
            jd_ut,
            request.lat,
            request.lon,
            request.house_system,
            flags,
        ) {
            Ok(houses) if houses.cusps.len() == HOUSE_COUNT => {
                let cusps = houses.cusps.iter().map(|&c| normalize(c)).collect();
                (cusps, normalize(houses.asc), normalize(houses.mc))
            }
            Ok(houses) => {
                warn!(
                    cusps = houses.cusps.len(),
                    "Provider returned wrong cusp count, using equal houses"
                );
                equal_house_fallback()
            }
            Err(err) => {
                warn!(
                    error = %err,
                    lat = request.lat,
                    "House calculation failed, using equal houses"
                );
                equal_house_fallback()
            }
        }
    }
}

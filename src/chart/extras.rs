//! Minor-body extras
//!
//! Longitudes of Chiron and the main-belt asteroids, with a daily speed
//! estimated by sampling the body again twelve hours later.

use std::collections::BTreeMap;

use tracing::warn;

use crate::angles::{normalize, round_to, shortest_delta};
use crate::chart::assembler::{unavailable, POSITION_PRECISION};
use crate::ephemeris::{julian_day_ut, CalcFlags, EphemerisError, EphemerisProvider, MinorBody};
use crate::error::{ChartError, Result};
use crate::models::{
    DebugSnapshot, ExtraPosition, ExtrasEnvelope, ExtrasMeta, ExtrasRequest, SCHEMA_VERSION,
};

/// Offset of the second speed sample, in days
const SPEED_SAMPLE_DAYS: f64 = 0.5;

pub struct ExtrasCalculator<'a> {
    provider: &'a dyn EphemerisProvider,
}

impl<'a> ExtrasCalculator<'a> {
    pub fn new(provider: &'a dyn EphemerisProvider) -> Self {
        Self { provider }
    }

    pub fn compute(&self, request: &ExtrasRequest) -> Result<ExtrasEnvelope> {
        let jd_ut = julian_day_ut(request.instant);
        let flags = CalcFlags::for_frame(request.zodiac_system).without_speed();

        let mut extras = BTreeMap::new();
        for &body in &request.bodies {
            match self.position(body, jd_ut, flags, request.want_speed) {
                Ok(position) => {
                    extras.insert(body.as_str().to_string(), position);
                }
                Err(err) if err.is_fatal() => return Err(unavailable(err)),
                Err(err) => warn!(body = body.as_str(), error = %err, "Skipping extra body"),
            }
        }

        if extras.is_empty() {
            return Err(ChartError::Unavailable(
                "failed to compute any extra body position".to_string(),
            ));
        }

        let debug_snapshot = request.debug.then(|| {
            let data = self.provider.data_snapshot();
            DebugSnapshot {
                ephe_path_set: data.path_configured,
                files_present: data.files_present,
                jd_ut,
                jd_tt: jd_ut + self.provider.delta_t(jd_ut) / 86_400.0,
            }
        });

        Ok(ExtrasEnvelope {
            extras,
            meta: ExtrasMeta {
                provider: self.provider.tag().to_string(),
                zodiac_system: request.zodiac_system,
                cached: false,
                version: SCHEMA_VERSION.to_string(),
                debug_snapshot,
            },
        })
    }

    fn position(
        &self,
        body: MinorBody,
        jd_ut: f64,
        flags: CalcFlags,
        want_speed: bool,
    ) -> std::result::Result<ExtraPosition, EphemerisError> {
        let lon0 = normalize(self.provider.compute_body(body.body(), jd_ut, flags)?.lon);
        let mut position = ExtraPosition {
            longitude_deg: normalize(round_to(lon0, POSITION_PRECISION)),
            speed_deg_per_day: None,
            retrograde: None,
        };

        if want_speed {
            let later = jd_ut + SPEED_SAMPLE_DAYS;
            let lon1 = normalize(self.provider.compute_body(body.body(), later, flags)?.lon);
            let speed = shortest_delta(lon0, lon1) / SPEED_SAMPLE_DAYS;
            position.speed_deg_per_day = Some(round_to(speed, POSITION_PRECISION));
            position.retrograde = Some(speed < 0.0);
        }
        Ok(position)
    }
}

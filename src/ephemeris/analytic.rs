//! Analytic Ephemeris
//!
//! Low-precision built-in provider. Planets use the JPL approximate
//! Keplerian elements (1800-2050), the Moon a truncated ELP series, the
//! node and Lilith their mean elements plus dominant periodic terms, and
//! the minor bodies fixed osculating elements. Accuracy is in the
//! arc-minute range for planets, which is ample for chart work but not for
//! astrometry.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use super::julian::{centuries_since_j2000, delta_t_seconds, J2000};
use super::{
    Body, CalcFlags, DataSnapshot, EphemerisError, EphemerisProvider, HouseSystem, RawHouses,
    RawPosition, ZodiacSystem,
};
use crate::angles::{normalize, shortest_delta};

const PROVIDER_TAG: &str = "analytic";

/// Half-width of the central difference used for speeds
const SPEED_HALF_STEP_DAYS: f64 = 0.25;

const KM_PER_AU: f64 = 149_597_870.7;

/// Mean daily motion (deg/day) of a body at 1 AU
const GAUSS_DAILY_MOTION: f64 = 0.985_607_668_6;

/// Osculating elements for minor bodies are not trusted beyond this
const MINOR_VALIDITY_DAYS: f64 = 36_525.0;

/// Lahiri ayanamsa at J2000.0, degrees
const LAHIRI_AT_J2000: f64 = 23.857_092;

/// Mean inclination of the lunar orbit, degrees
const LUNAR_INCLINATION: f64 = 5.145_396;

const PLACIDUS_MAX_ITERATIONS: usize = 50;

// == Orbital Elements ==
/// JPL approximate elements: value at J2000 and rate per Julian century.
struct PlanetElements {
    a: [f64; 2],
    e: [f64; 2],
    i: [f64; 2],
    mean_lon: [f64; 2],
    peri_lon: [f64; 2],
    node: [f64; 2],
}

const MERCURY: PlanetElements = PlanetElements {
    a: [0.387_099_27, 0.000_000_37],
    e: [0.205_635_93, 0.000_019_06],
    i: [7.004_979_02, -0.005_947_49],
    mean_lon: [252.250_323_50, 149_472.674_111_75],
    peri_lon: [77.457_796_28, 0.160_476_89],
    node: [48.330_765_93, -0.125_340_81],
};

const VENUS: PlanetElements = PlanetElements {
    a: [0.723_335_66, 0.000_003_90],
    e: [0.006_776_72, -0.000_041_07],
    i: [3.394_676_05, -0.000_788_90],
    mean_lon: [181.979_099_50, 58_517.815_387_29],
    peri_lon: [131.602_467_18, 0.002_683_29],
    node: [76.679_842_55, -0.277_694_18],
};

const EARTH_MOON_BARYCENTER: PlanetElements = PlanetElements {
    a: [1.000_002_61, 0.000_005_62],
    e: [0.016_711_23, -0.000_043_92],
    i: [-0.000_015_31, -0.012_946_68],
    mean_lon: [100.464_571_66, 35_999.372_449_81],
    peri_lon: [102.937_681_93, 0.323_273_64],
    node: [0.0, 0.0],
};

const MARS: PlanetElements = PlanetElements {
    a: [1.523_710_34, 0.000_018_47],
    e: [0.093_394_10, 0.000_078_82],
    i: [1.849_691_42, -0.008_131_31],
    mean_lon: [-4.553_432_05, 19_140.302_684_99],
    peri_lon: [-23.943_629_59, 0.444_410_88],
    node: [49.559_538_91, -0.292_573_43],
};

const JUPITER: PlanetElements = PlanetElements {
    a: [5.202_887_00, -0.000_116_07],
    e: [0.048_386_24, -0.000_132_53],
    i: [1.304_396_95, -0.001_837_14],
    mean_lon: [34.396_440_51, 3_034.746_127_75],
    peri_lon: [14.728_479_83, 0.212_526_68],
    node: [100.473_909_09, 0.204_691_06],
};

const SATURN: PlanetElements = PlanetElements {
    a: [9.536_675_94, -0.001_250_60],
    e: [0.053_861_79, -0.000_509_91],
    i: [2.485_991_87, 0.001_936_09],
    mean_lon: [49.954_244_23, 1_222.493_622_01],
    peri_lon: [92.598_878_31, -0.418_972_16],
    node: [113.662_424_48, -0.288_677_94],
};

const URANUS: PlanetElements = PlanetElements {
    a: [19.189_164_64, -0.001_961_76],
    e: [0.047_257_44, -0.000_043_97],
    i: [0.772_637_83, -0.002_429_39],
    mean_lon: [313.238_104_51, 428.482_027_85],
    peri_lon: [170.954_276_30, 0.408_052_81],
    node: [74.016_925_03, 0.042_405_89],
};

const NEPTUNE: PlanetElements = PlanetElements {
    a: [30.069_922_76, 0.000_262_91],
    e: [0.008_590_48, 0.000_051_05],
    i: [1.770_043_47, 0.000_353_72],
    mean_lon: [-55.120_029_69, 218.459_453_25],
    peri_lon: [44.964_762_27, -0.322_414_64],
    node: [131.784_225_74, -0.005_086_64],
};

const PLUTO: PlanetElements = PlanetElements {
    a: [39.482_116_75, -0.000_315_96],
    e: [0.248_827_30, 0.000_051_70],
    i: [17.140_012_06, 0.000_048_18],
    mean_lon: [238.929_038_33, 145.207_805_15],
    peri_lon: [224.068_916_29, -0.040_629_42],
    node: [110.303_936_84, -0.011_834_82],
};

impl PlanetElements {
    fn at(&self, t: f64) -> Orbit {
        let eval = |p: [f64; 2]| p[0] + p[1] * t;
        let peri_lon = eval(self.peri_lon);
        let node = eval(self.node);
        Orbit {
            a: eval(self.a),
            e: eval(self.e),
            i: eval(self.i),
            node,
            arg_peri: peri_lon - node,
            mean_anomaly: eval(self.mean_lon) - peri_lon,
        }
    }
}

/// Osculating heliocentric elements (J2000 ecliptic) at a fixed epoch.
struct MinorElements {
    epoch: f64,
    a: f64,
    e: f64,
    i: f64,
    node: f64,
    arg_peri: f64,
    mean_anomaly: f64,
}

const CHIRON: MinorElements = MinorElements {
    epoch: 2_450_128.5,
    a: 13.70,
    e: 0.379,
    i: 6.93,
    node: 209.30,
    arg_peri: 339.25,
    mean_anomaly: 0.0,
};

const CERES: MinorElements = MinorElements {
    epoch: 2_453_800.5,
    a: 2.7653,
    e: 0.0789,
    i: 10.586,
    node: 80.39,
    arg_peri: 72.82,
    mean_anomaly: 108.51,
};

const PALLAS: MinorElements = MinorElements {
    epoch: 2_455_800.5,
    a: 2.7716,
    e: 0.2310,
    i: 34.84,
    node: 173.13,
    arg_peri: 310.05,
    mean_anomaly: 78.23,
};

const JUNO: MinorElements = MinorElements {
    epoch: 2_455_800.5,
    a: 2.6693,
    e: 0.2562,
    i: 12.99,
    node: 169.85,
    arg_peri: 248.41,
    mean_anomaly: 33.08,
};

const VESTA: MinorElements = MinorElements {
    epoch: 2_455_800.5,
    a: 2.3615,
    e: 0.0887,
    i: 7.14,
    node: 103.85,
    arg_peri: 151.20,
    mean_anomaly: 20.86,
};

impl MinorElements {
    fn at(&self, jd: f64) -> Orbit {
        let daily_motion = GAUSS_DAILY_MOTION / self.a.powf(1.5);
        Orbit {
            a: self.a,
            e: self.e,
            i: self.i,
            node: self.node,
            arg_peri: self.arg_peri,
            mean_anomaly: self.mean_anomaly + daily_motion * (jd - self.epoch),
        }
    }
}

/// Elements resolved at one instant. Angles in degrees, `a` in AU.
struct Orbit {
    a: f64,
    e: f64,
    i: f64,
    node: f64,
    arg_peri: f64,
    mean_anomaly: f64,
}

impl Orbit {
    /// Heliocentric ecliptic (J2000) rectangular coordinates, AU.
    fn heliocentric(&self) -> [f64; 3] {
        let m = normalize(self.mean_anomaly).to_radians();
        let e = self.e;

        let mut ecc = m + e * m.sin();
        for _ in 0..30 {
            let step = (ecc - e * ecc.sin() - m) / (1.0 - e * ecc.cos());
            ecc -= step;
            if step.abs() < 1e-12 {
                break;
            }
        }

        let xp = self.a * (ecc.cos() - e);
        let yp = self.a * (1.0 - e * e).sqrt() * ecc.sin();

        let (sw, cw) = self.arg_peri.to_radians().sin_cos();
        let (so, co) = self.node.to_radians().sin_cos();
        let (si, ci) = self.i.to_radians().sin_cos();

        [
            (cw * co - sw * so * ci) * xp + (-sw * co - cw * so * ci) * yp,
            (cw * so + sw * co * ci) * xp + (-sw * so + cw * co * ci) * yp,
            (sw * si) * xp + (cw * si) * yp,
        ]
    }
}

// == Lunar Theory ==
/// Fundamental lunar arguments of date, degrees.
struct LunarArgs {
    mean_lon: f64,
    elongation: f64,
    sun_anomaly: f64,
    moon_anomaly: f64,
    latitude_arg: f64,
}

impl LunarArgs {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        Self {
            mean_lon: 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2,
            elongation: 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2,
            sun_anomaly: 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2,
            moon_anomaly: 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2,
            latitude_arg: 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2,
        }
    }
}

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

fn moon_position(t: f64) -> RawPosition {
    let LunarArgs {
        mean_lon,
        elongation: d,
        sun_anomaly: m,
        moon_anomaly: mp,
        latitude_arg: f,
    } = LunarArgs::at(t);

    let lon = mean_lon + 6.288_774 * sin_deg(mp) + 1.274_027 * sin_deg(2.0 * d - mp)
        + 0.658_314 * sin_deg(2.0 * d)
        + 0.213_618 * sin_deg(2.0 * mp)
        - 0.185_116 * sin_deg(m)
        - 0.114_332 * sin_deg(2.0 * f)
        + 0.058_793 * sin_deg(2.0 * d - 2.0 * mp)
        + 0.057_066 * sin_deg(2.0 * d - m - mp)
        + 0.053_322 * sin_deg(2.0 * d + mp)
        + 0.045_758 * sin_deg(2.0 * d - m)
        - 0.040_923 * sin_deg(m - mp)
        - 0.034_720 * sin_deg(d)
        - 0.030_383 * sin_deg(m + mp);

    let lat = 5.128_122 * sin_deg(f)
        + 0.280_602 * sin_deg(mp + f)
        + 0.277_693 * sin_deg(mp - f)
        + 0.173_237 * sin_deg(2.0 * d - f)
        + 0.055_413 * sin_deg(2.0 * d - mp + f)
        + 0.046_271 * sin_deg(2.0 * d - mp - f);

    let dist_km = 385_000.56
        - 20_905.355 * cos_deg(mp)
        - 3_699.111 * cos_deg(2.0 * d - mp)
        - 2_955.968 * cos_deg(2.0 * d)
        - 569.925 * cos_deg(2.0 * mp);

    RawPosition {
        lon: normalize(lon),
        lat,
        dist: Some(dist_km / KM_PER_AU),
        speed: None,
    }
}

fn mean_node(t: f64) -> f64 {
    normalize(
        125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t * t + t.powi(3) / 467_441.0
            - t.powi(4) / 60_616_000.0,
    )
}

fn true_node(t: f64) -> f64 {
    let args = LunarArgs::at(t);
    let d = args.elongation;
    let f = args.latitude_arg;
    normalize(
        mean_node(t) - 1.497_9 * sin_deg(2.0 * (d - f)) - 0.150_0 * sin_deg(args.sun_anomaly)
            - 0.122_6 * sin_deg(2.0 * d)
            + 0.117_6 * sin_deg(2.0 * f)
            - 0.080_1 * sin_deg(2.0 * (args.moon_anomaly - f)),
    )
}

/// Mean lunar apogee (Black Moon Lilith).
fn mean_lilith(t: f64) -> f64 {
    let perigee = 83.353_246_5 + 4_069.013_728_7 * t - 0.010_320_0 * t * t
        - t.powi(3) / 80_053.0
        + t.powi(4) / 18_999_000.0;
    normalize(perigee + 180.0)
}

/// Osculating apogee: the mean apogee plus its dominant solar term, which
/// swings with twice the Sun-perigee angle.
fn true_lilith(t: f64) -> f64 {
    let args = LunarArgs::at(t);
    normalize(mean_lilith(t) + 15.448 * sin_deg(2.0 * (args.elongation - args.moon_anomaly)))
}

/// Latitude of a point on the mean lunar orbit.
fn lunar_orbit_latitude(lon: f64, t: f64) -> f64 {
    (sin_deg(LUNAR_INCLINATION) * sin_deg(lon - mean_node(t)))
        .asin()
        .to_degrees()
}

// == Frames ==
/// General precession in longitude since J2000, degrees.
fn precession(t: f64) -> f64 {
    1.396_971_3 * t + 0.000_308_6 * t * t
}

fn lahiri_ayanamsa(t: f64) -> f64 {
    LAHIRI_AT_J2000 + precession(t)
}

fn frame_offset(frame: ZodiacSystem, t: f64) -> f64 {
    match frame {
        ZodiacSystem::Tropical => 0.0,
        ZodiacSystem::SiderealLahiri => lahiri_ayanamsa(t),
    }
}

/// Mean obliquity of the ecliptic, degrees.
fn obliquity(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t
}

/// Greenwich mean sidereal time, degrees.
fn gmst(jd_ut: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut);
    normalize(
        280.460_618_37 + 360.985_647_366_29 * (jd_ut - J2000) + 0.000_387_933 * t * t
            - t.powi(3) / 38_710_000.0,
    )
}

/// Ecliptic longitude of the ecliptic point with the given right ascension.
fn ecliptic_from_ra(ra: f64, eps: f64) -> f64 {
    normalize(
        sin_deg(ra)
            .atan2(cos_deg(ra) * cos_deg(eps))
            .to_degrees(),
    )
}

/// Geocentric longitude of date, latitude and distance from a rectangular
/// J2000 vector.
fn spherical(v: [f64; 3], t: f64) -> RawPosition {
    let [x, y, z] = v;
    let rho = x.hypot(y);
    RawPosition {
        lon: normalize(y.atan2(x).to_degrees() + precession(t)),
        lat: z.atan2(rho).to_degrees(),
        dist: Some((rho * rho + z * z).sqrt()),
        speed: None,
    }
}

fn planet_elements(body: Body) -> Option<&'static PlanetElements> {
    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto => Some(&PLUTO),
        _ => None,
    }
}

fn minor_elements(body: Body) -> Option<&'static MinorElements> {
    match body {
        Body::Chiron => Some(&CHIRON),
        Body::Ceres => Some(&CERES),
        Body::Pallas => Some(&PALLAS),
        Body::Juno => Some(&JUNO),
        Body::Vesta => Some(&VESTA),
        _ => None,
    }
}

// == Provider ==
/// Built-in provider computing everything from closed-form theories.
#[derive(Debug, Clone)]
pub struct AnalyticEphemeris {
    data_path: Option<PathBuf>,
}

impl AnalyticEphemeris {
    /// Opens the provider.
    ///
    /// The data path is optional and only reported in debug snapshots, but
    /// when configured it must be an existing directory.
    pub fn open(data_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        if let Some(path) = &data_path {
            if !path.is_dir() {
                return Err(EphemerisError::DataPathMissing {
                    path: path.display().to_string(),
                });
            }
            info!("Ephemeris data path set to {}", path.display());
        }
        Ok(Self { data_path })
    }

    /// Tropical-of-date position without speed, at Julian Day (TT).
    fn position(&self, body: Body, jd: f64) -> Result<RawPosition, EphemerisError> {
        let t = centuries_since_j2000(jd);

        let position = match body {
            Body::Sun => {
                let [x, y, z] = EARTH_MOON_BARYCENTER.at(t).heliocentric();
                spherical([-x, -y, -z], t)
            }
            Body::Moon => moon_position(t),
            Body::MeanNode => node_point(mean_node(t)),
            Body::TrueNode => node_point(true_node(t)),
            Body::MeanLilith => lilith_point(mean_lilith(t), t),
            Body::TrueLilith => lilith_point(true_lilith(t), t),
            _ => {
                let orbit = if let Some(elements) = planet_elements(body) {
                    elements.at(t)
                } else if let Some(elements) = minor_elements(body) {
                    if (jd - elements.epoch).abs() > MINOR_VALIDITY_DAYS {
                        return Err(EphemerisError::CalculationFailed {
                            body: body.chart_name(),
                            jd,
                            message: "outside the validity window of the orbital elements"
                                .to_string(),
                        });
                    }
                    elements.at(jd)
                } else {
                    return Err(EphemerisError::CalculationFailed {
                        body: body.chart_name(),
                        jd,
                        message: "no theory for body".to_string(),
                    });
                };

                let earth = EARTH_MOON_BARYCENTER.at(t).heliocentric();
                let target = orbit.heliocentric();
                spherical(
                    [
                        target[0] - earth[0],
                        target[1] - earth[1],
                        target[2] - earth[2],
                    ],
                    t,
                )
            }
        };

        Ok(position)
    }

    fn placidus(&self, jd_ut: f64, lat: f64, lon: f64) -> Result<RawHouses, EphemerisError> {
        let t = centuries_since_j2000(jd_ut);
        let eps = obliquity(t);
        let ramc = normalize(gmst(jd_ut) + lon);

        let mc = ecliptic_from_ra(ramc, eps);
        let asc = normalize(
            cos_deg(ramc)
                .atan2(-(sin_deg(ramc) * cos_deg(eps) + lat.to_radians().tan() * sin_deg(eps)))
                .to_degrees(),
        );

        let c11 = placidus_cusp(ramc, eps, lat, 1.0 / 3.0, true)?;
        let c12 = placidus_cusp(ramc, eps, lat, 2.0 / 3.0, true)?;
        let c2 = placidus_cusp(ramc, eps, lat, 2.0 / 3.0, false)?;
        let c3 = placidus_cusp(ramc, eps, lat, 1.0 / 3.0, false)?;

        let opposite = |x: f64| normalize(x + 180.0);
        let cusps = vec![
            asc,
            c2,
            c3,
            opposite(mc),
            opposite(c11),
            opposite(c12),
            opposite(asc),
            opposite(c2),
            opposite(c3),
            mc,
            c11,
            c12,
        ];

        Ok(RawHouses { cusps, asc, mc })
    }
}

fn node_point(lon: f64) -> RawPosition {
    RawPosition {
        lon,
        lat: 0.0,
        dist: None,
        speed: None,
    }
}

fn lilith_point(lon: f64, t: f64) -> RawPosition {
    RawPosition {
        lon,
        lat: lunar_orbit_latitude(lon, t),
        dist: None,
        speed: None,
    }
}

/// One intermediate Placidus cusp by fixed-point iteration on the cusp's
/// own semi-arc. `above` selects houses 11/12 (diurnal arc) versus 2/3
/// (nocturnal arc); `fraction` is the share of the semi-arc travelled
/// from the meridian.
fn placidus_cusp(
    ramc: f64,
    eps: f64,
    lat: f64,
    fraction: f64,
    above: bool,
) -> Result<f64, EphemerisError> {
    let target = |diurnal_semi_arc: f64| {
        if above {
            ramc + fraction * diurnal_semi_arc
        } else {
            ramc + 180.0 - fraction * (180.0 - diurnal_semi_arc)
        }
    };

    let tan_lat = lat.to_radians().tan();
    let mut ra = target(90.0);
    for _ in 0..PLACIDUS_MAX_ITERATIONS {
        let lambda = ecliptic_from_ra(ra, eps);
        let decl = (sin_deg(eps) * sin_deg(lambda)).asin();
        let x = -tan_lat * decl.tan();
        if !(-1.0..=1.0).contains(&x) {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("cusp point is circumpolar at latitude {lat}"),
            });
        }
        let next = target(x.acos().to_degrees());
        if shortest_delta(ra, next).abs() < 1e-10 {
            return Ok(ecliptic_from_ra(next, eps));
        }
        ra = next;
    }

    Err(EphemerisError::HouseCalculationFailed {
        message: format!("Placidus iteration did not converge at latitude {lat}"),
    })
}

impl EphemerisProvider for AnalyticEphemeris {
    fn tag(&self) -> &'static str {
        PROVIDER_TAG
    }

    fn delta_t(&self, jd_ut: f64) -> f64 {
        delta_t_seconds(jd_ut)
    }

    fn compute_body(
        &self,
        body: Body,
        jd_ut: f64,
        flags: CalcFlags,
    ) -> Result<RawPosition, EphemerisError> {
        if !jd_ut.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body: body.chart_name(),
                jd: jd_ut,
                message: "non-finite Julian Day".to_string(),
            });
        }

        let jd = jd_ut + delta_t_seconds(jd_ut) / 86_400.0;
        let mut position = self.position(body, jd)?;
        position.lon = normalize(position.lon - frame_offset(flags.frame, centuries_since_j2000(jd)));

        if flags.speed {
            let before = self.position(body, jd - SPEED_HALF_STEP_DAYS)?.lon;
            let after = self.position(body, jd + SPEED_HALF_STEP_DAYS)?.lon;
            position.speed = Some(shortest_delta(before, after) / (2.0 * SPEED_HALF_STEP_DAYS));
        }

        Ok(position)
    }

    fn compute_houses(
        &self,
        jd_ut: f64,
        lat: f64,
        lon: f64,
        system: HouseSystem,
        flags: CalcFlags,
    ) -> Result<RawHouses, EphemerisError> {
        let mut houses = match system {
            HouseSystem::Placidus => self.placidus(jd_ut, lat, lon)?,
        };

        let offset = frame_offset(flags.frame, centuries_since_j2000(jd_ut));
        if offset != 0.0 {
            houses.asc = normalize(houses.asc - offset);
            houses.mc = normalize(houses.mc - offset);
            for cusp in &mut houses.cusps {
                *cusp = normalize(*cusp - offset);
            }
        }

        Ok(houses)
    }

    fn data_snapshot(&self) -> DataSnapshot {
        let Some(path) = &self.data_path else {
            return DataSnapshot::default();
        };

        let files_present = match fs::read_dir(path) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(err) => {
                warn!("Failed to list ephemeris data path {}: {}", path.display(), err);
                Vec::new()
            }
        };

        DataSnapshot {
            path_configured: true,
            files_present,
        }
    }
}

//! End-to-end chart properties through the analytic ephemeris.

use approx::assert_abs_diff_eq;
use astro_chart::angles::{normalize, shortest_delta};
use astro_chart::chart::{ChartAssembler, ExtrasCalculator, ASPECT_BODIES};
use astro_chart::ephemeris::AnalyticEphemeris;
use astro_chart::models::{ChartEnvelope, ChartRequestBody, ExtrasRequestBody};
use proptest::prelude::*;
use serde_json::json;

// == Helper Functions ==

fn compute(body: serde_json::Value) -> ChartEnvelope {
    let provider = AnalyticEphemeris::open(None).unwrap();
    let request = serde_json::from_value::<ChartRequestBody>(body)
        .unwrap()
        .validate()
        .unwrap();
    ChartAssembler::new(&provider).assemble(&request).unwrap()
}

fn istanbul(zodiac: &str, node: &str) -> ChartEnvelope {
    compute(json!({
        "utcISO": "1992-03-30T05:30:00.000Z",
        "lat": 41.0082,
        "lon": 28.9784,
        "zodiacSystem": zodiac,
        "houseSystem": "placidus",
        "nodeType": node
    }))
}

fn assert_chart_invariants(envelope: &ChartEnvelope) {
    let chart = &envelope.chart;

    assert_eq!(chart.houses.cusps_deg.len(), 12);
    for cusp in &chart.houses.cusps_deg {
        assert!((0.0..360.0).contains(cusp), "cusp {cusp} out of range");
    }

    let angles = chart.angles;
    assert_abs_diff_eq!(angles.dsc_deg, normalize(angles.asc_deg + 180.0), epsilon = 1e-3);
    assert_abs_diff_eq!(angles.ic_deg, normalize(angles.mc_deg + 180.0), epsilon = 1e-3);

    for (name, position) in &chart.bodies {
        assert!(
            (0.0..360.0).contains(&position.lon_deg),
            "{name} longitude {} out of range",
            position.lon_deg
        );
        // A speed rounded to zero may come from a barely retrograde body.
        if let Some(speed) = position.speed_lon_deg_per_day.filter(|s| *s != 0.0) {
            assert_eq!(position.retrograde, speed < 0.0, "{name} retrograde flag");
        }
    }

    for aspect in chart.aspects.iter().flatten() {
        assert_ne!(aspect.a, aspect.b);
        assert!(ASPECT_BODIES.contains(&aspect.a.as_str()));
        assert!(ASPECT_BODIES.contains(&aspect.b.as_str()));
        assert!(aspect.orb_deg >= 0.0 && aspect.orb_deg <= 8.0);
    }
}

// == Reference Chart ==

#[test]
fn test_reference_chart_invariants() {
    let envelope = istanbul("tropical", "mean");
    assert_chart_invariants(&envelope);

    let bodies = &envelope.chart.bodies;
    for name in ["Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Pluto"] {
        assert!(bodies.contains_key(name), "missing {name}");
    }
    for name in ["ASC", "MC", "DSC", "IC", "NorthNode", "SouthNode", "Lilith"] {
        assert!(bodies.contains_key(name), "missing {name}");
    }
    assert!(envelope.chart.aspects.is_some());
}

#[test]
fn test_reference_sun_early_aries() {
    let envelope = istanbul("tropical", "mean");
    let sun = &envelope.chart.bodies["Sun"];
    assert!((8.0..12.0).contains(&sun.lon_deg), "Sun at {}", sun.lon_deg);
    assert!(!sun.retrograde);
}

#[test]
fn test_angles_match_pseudo_bodies() {
    let envelope = istanbul("tropical", "mean");
    let chart = &envelope.chart;
    assert_eq!(chart.bodies["ASC"].lon_deg, chart.angles.asc_deg);
    assert_eq!(chart.bodies["MC"].lon_deg, chart.angles.mc_deg);
    assert_abs_diff_eq!(chart.houses.cusps_deg[0], chart.angles.asc_deg, epsilon = 1e-3);
}

#[test]
fn test_south_node_opposes_north_node() {
    let envelope = istanbul("tropical", "true");
    let bodies = &envelope.chart.bodies;
    let north = &bodies["NorthNode"];
    let south = &bodies["SouthNode"];
    assert_abs_diff_eq!(south.lon_deg, normalize(north.lon_deg + 180.0), epsilon = 1e-3);
    assert_eq!(south.retrograde, north.retrograde);
}

#[test]
fn test_sidereal_offset_is_tens_of_degrees() {
    let tropical = istanbul("tropical", "mean");
    let sidereal = istanbul("sidereal_lahiri", "mean");

    let offset = shortest_delta(
        sidereal.chart.bodies["Sun"].lon_deg,
        tropical.chart.bodies["Sun"].lon_deg,
    );
    assert!((20.0..30.0).contains(&offset), "ayanamsa offset {offset}");
    assert_chart_invariants(&sidereal);
}

#[test]
fn test_mean_and_true_node_differ() {
    let mean = istanbul("tropical", "mean");
    let true_node = istanbul("tropical", "true");

    let mean_lon = mean.chart.bodies["NorthNode"].lon_deg;
    let true_lon = true_node.chart.bodies["NorthNode"].lon_deg;
    assert_ne!(mean_lon, true_lon);
    assert!(shortest_delta(mean_lon, true_lon).abs() < 3.0);
}

#[test]
fn test_meta_reports_request_options() {
    let envelope = istanbul("sidereal_lahiri", "true");
    let meta = serde_json::to_value(&envelope.meta).unwrap();
    assert_eq!(meta["zodiacSystem"], "sidereal_lahiri");
    assert_eq!(meta["houseSystem"], "placidus");
    assert_eq!(meta["nodeType"], "true");
    assert_eq!(meta["lilithType"], "mean");
    assert_eq!(meta["cached"], false);
    assert!(envelope.meta.jd_tt > envelope.meta.jd_ut);
}

#[test]
fn test_circumpolar_latitude_uses_equal_houses() {
    let envelope = compute(json!({
        "utcISO": "1992-06-21T12:00:00Z",
        "lat": 89.9,
        "lon": 0.0,
        "zodiacSystem": "tropical",
        "houseSystem": "placidus"
    }));

    let expected: Vec<f64> = (0..12).map(|i| i as f64 * 30.0).collect();
    assert_eq!(envelope.chart.houses.cusps_deg, expected);
    assert_eq!(envelope.chart.angles.asc_deg, 0.0);
    assert_eq!(envelope.chart.angles.mc_deg, 270.0);
    assert!(envelope.chart.bodies.contains_key("Sun"));
    assert_chart_invariants(&envelope);
}

// == Extras ==

#[test]
fn test_extras_speed_and_retrograde() {
    let provider = AnalyticEphemeris::open(None).unwrap();
    let request = serde_json::from_value::<ExtrasRequestBody>(json!({
        "utcISO": "2020-06-01T00:00:00Z",
        "zodiacSystem": "tropical",
        "bodies": ["chiron", "ceres", "pallas", "juno", "vesta"]
    }))
    .unwrap()
    .validate()
    .unwrap();

    let envelope = ExtrasCalculator::new(&provider).compute(&request).unwrap();

    assert_eq!(envelope.extras.len(), 5);
    for (name, extra) in &envelope.extras {
        assert!((0.0..360.0).contains(&extra.longitude_deg), "{name}");
        let speed = extra.speed_deg_per_day.unwrap();
        assert!(speed.abs() < 1.0, "{name} speed {speed}");
        if speed != 0.0 {
            assert_eq!(extra.retrograde, Some(speed < 0.0));
        }
    }
}

// == Property Tests ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_chart_invariants_hold_anywhere(
        secs in 0i64..2_524_608_000,
        lat in -60.0f64..60.0,
        lon in -180.0f64..180.0,
        sidereal in any::<bool>()
    ) {
        let instant = chrono::DateTime::from_timestamp(secs, 0).unwrap();
        let envelope = compute(json!({
            "utcISO": instant.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "lat": lat,
            "lon": lon,
            "zodiacSystem": if sidereal { "sidereal_lahiri" } else { "tropical" },
            "houseSystem": "placidus"
        }));
        assert_chart_invariants(&envelope);
    }
}

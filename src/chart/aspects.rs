//! Aspect Detection
//!
//! Finds the major angular relationships between chart bodies. Every
//! unordered pair yields at most one aspect: kinds are tried from
//! conjunction to opposition and the first within orb wins.

use crate::angles::{round_to, shortest_delta};
use crate::models::{Aspect, AspectKind};

/// Bodies eligible for aspect analysis, in enumeration order.
pub const ASPECT_BODIES: [&str; 18] = [
    "Sun",
    "Moon",
    "Mercury",
    "Venus",
    "Mars",
    "Jupiter",
    "Saturn",
    "Uranus",
    "Neptune",
    "Pluto",
    "Chiron",
    "Ceres",
    "Pallas",
    "Juno",
    "Vesta",
    "NorthNode",
    "SouthNode",
    "Lilith",
];

const LUMINARIES: [&str; 2] = ["Sun", "Moon"];
const MINOR_NAMES: [&str; 5] = ["Chiron", "Ceres", "Pallas", "Juno", "Vesta"];

const LUMINARY_ORB: f64 = 8.0;
const MINOR_ORB: f64 = 4.0;
const DEFAULT_ORB: f64 = 6.0;

/// Orb tolerance for a pair of bodies.
pub fn orb_for(a: &str, b: &str) -> f64 {
    let either = |set: &[&str]| set.contains(&a) || set.contains(&b);
    if either(&LUMINARIES) {
        LUMINARY_ORB
    } else if either(&MINOR_NAMES) {
        MINOR_ORB
    } else {
        DEFAULT_ORB
    }
}

/// First aspect kind within `orb` of the separation, with its deviation.
pub fn match_aspect(sep: f64, orb: f64) -> Option<(AspectKind, f64)> {
    AspectKind::ALL.iter().find_map(|&kind| {
        let exact = kind.exact_deg();
        let delta = (sep - exact).abs().min((sep - (360.0 - exact)).abs());
        (delta <= orb).then_some((kind, delta))
    })
}

// == Aspect Detector ==
/// Detects aspects among `(name, longitude)` pairs.
///
/// Names outside [`ASPECT_BODIES`] are ignored, so callers may pass a whole
/// body mapping including house angles.
pub fn detect_aspects<'a, I>(positions: I) -> Vec<Aspect>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let eligible: Vec<(&str, f64)> = positions
        .into_iter()
        .filter(|(name, _)| ASPECT_BODIES.contains(name))
        .collect();

    let mut aspects = Vec::new();
    for (i, &(a, lon_a)) in eligible.iter().enumerate() {
        for &(b, lon_b) in &eligible[i + 1..] {
            let sep = shortest_delta(lon_a, lon_b).abs();
            if let Some((kind, delta)) = match_aspect(sep, orb_for(a, b)) {
                aspects.push(Aspect {
                    a: a.to_string(),
                    b: b.to_string(),
                    kind,
                    orb_deg: round_to(delta, 3),
                    exact_deg: kind.exact_deg(),
                });
            }
        }
    }
    aspects
}

//! Cache Key Generation
//!
//! Keys are the hex SHA-256 of the semantic request fields joined with `|`.
//! The debug flag never participates.

use sha2::{Digest, Sha256};

use crate::models::{ChartRequest, ExtrasRequest};

const FIELD_SEPARATOR: &str = "|";

fn digest(fields: &[&str]) -> String {
    hex::encode(Sha256::digest(fields.join(FIELD_SEPARATOR).as_bytes()))
}

/// Fixed six-decimal coordinate form. Negative zero prints as zero.
fn coordinate(value: f64) -> String {
    format!("{:.6}", value + 0.0)
}

/// Cache key of a chart request.
pub fn chart_cache_key(request: &ChartRequest) -> String {
    let lat = coordinate(request.lat);
    let lon = coordinate(request.lon);
    let want_aspects = request.want_aspects.to_string();
    digest(&[
        request.utc_iso.as_str(),
        lat.as_str(),
        lon.as_str(),
        request.zodiac_system.as_str(),
        request.house_system.as_str(),
        request.node_type.as_str(),
        request.lilith_type.as_str(),
        want_aspects.as_str(),
    ])
}

/// Cache key of an extras request. Bodies are sorted by name.
pub fn extras_cache_key(request: &ExtrasRequest) -> String {
    let mut names: Vec<&str> = request.bodies.iter().map(|b| b.as_str()).collect();
    names.sort_unstable();
    let bodies = names.join(",");
    let want_speed = request.want_speed.to_string();
    digest(&[
        request.utc_iso.as_str(),
        request.zodiac_system.as_str(),
        bodies.as_str(),
        want_speed.as_str(),
    ])
}

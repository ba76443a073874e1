//! Julian Day conversions and Delta T.

use chrono::{DateTime, Utc};

/// Julian Day of the J2000.0 epoch
pub const J2000: f64 = 2_451_545.0;

/// Julian Day of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Converts a UTC instant to a Julian Day (UT).
pub fn julian_day_ut(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MS_PER_DAY + UNIX_EPOCH_JD
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// TT - UT in seconds, from the Espenak-Meeus polynomial fits.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    let y = 2000.0 + (jd_ut - J2000) / 365.25;

    if y < 1800.0 || y >= 2150.0 {
        let u = (y - 1820.0) / 100.0;
        return -20.0 + 32.0 * u * u;
    }
    if y < 1860.0 {
        let t = y - 1800.0;
        return 13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3)
            - 0.00037436 * t.powi(4)
            + 0.0000121272 * t.powi(5)
            - 0.0000001699 * t.powi(6)
            + 0.000000000875 * t.powi(7);
    }
    if y < 1900.0 {
        let t = y - 1860.0;
        return 7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
            - 0.0004473624 * t.powi(4)
            + t.powi(5) / 233_174.0;
    }
    if y < 1920.0 {
        let t = y - 1900.0;
        return -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4);
    }
    if y < 1941.0 {
        let t = y - 1920.0;
        return 21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3);
    }
    if y < 1961.0 {
        let t = y - 1950.0;
        return 29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0;
    }
    if y < 1986.0 {
        let t = y - 1975.0;
        return 45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0;
    }
    if y < 2005.0 {
        let t = y - 2000.0;
        return 63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5);
    }
    if y < 2050.0 {
        let t = y - 2000.0;
        return 62.92 + 0.32217 * t + 0.005589 * t.powi(2);
    }
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn test_julian_day_of_j2000() {
        let instant = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(julian_day_ut(instant), J2000, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_day_of_unix_epoch() {
        let instant = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_abs_diff_eq!(julian_day_ut(instant), 2_440_587.5, epsilon = 1e-9);
    }

    #[test]
    fn test_delta_t_modern_values() {
        // Observed: ~57 s in 1990, ~64 s in 2000, ~69 s in 2020.
        let dt_1990 = delta_t_seconds(2_447_892.5);
        let dt_2000 = delta_t_seconds(J2000);
        let dt_2020 = delta_t_seconds(2_458_849.5);
        assert!((55.0..60.0).contains(&dt_1990), "1990: {dt_1990}");
        assert!((62.0..66.0).contains(&dt_2000), "2000: {dt_2000}");
        assert!((66.0..75.0).contains(&dt_2020), "2020: {dt_2020}");
    }

    #[test]
    fn test_delta_t_is_finite_far_out() {
        assert!(delta_t_seconds(1_000_000.0).is_finite());
        assert!(delta_t_seconds(3_000_000.0).is_finite());
    }
}

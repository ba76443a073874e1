//! Angle Math Module
//!
//! Circular arithmetic on ecliptic degrees shared by the chart assembler,
//! the aspect detector and the extras speed sampler.

// == Normalize ==
/// Reduces an angle to the half-open range `[0, 360)`.
///
/// Negative remainders are shifted up by a full turn. A remainder that
/// rounds up to exactly 360 (e.g. `-1e-15`) folds back to 0, and `-0.0`
/// comes out as `0.0`.
pub fn normalize(angle: f64) -> f64 {
    let mut n = angle % 360.0;
    if n < 0.0 {
        n += 360.0;
    }
    if n >= 360.0 {
        n = 0.0;
    }
    n + 0.0
}

// == Shortest Delta ==
/// Signed minimal angular distance travelling from `a` to `b`, in `(-180, 180]`.
///
/// `shortest_delta(350.0, 10.0)` is `20.0`, not `-340.0`.
pub fn shortest_delta(a: f64, b: f64) -> f64 {
    let d = normalize(b - a);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

// == Rounding ==
/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(370.0), 10.0);
        assert_eq!(normalize(-10.0), 350.0);
        assert_eq!(normalize(-720.0), 0.0);
    }

    #[test]
    fn test_normalize_tiny_negative_folds_to_zero() {
        let n = normalize(-1e-15);
        assert!((0.0..360.0).contains(&n));
    }

    #[test]
    fn test_normalize_negative_zero() {
        assert!(normalize(-0.0).is_sign_positive());
    }

    #[test]
    fn test_shortest_delta_wraparound() {
        assert_relative_eq!(shortest_delta(350.0, 10.0), 20.0);
        assert_relative_eq!(shortest_delta(10.0, 350.0), -20.0);
        assert_relative_eq!(shortest_delta(0.0, 180.0), 180.0);
        assert_relative_eq!(shortest_delta(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345_678, 4), 12.3457);
        assert_eq!(round_to(0.123_45, 3), 0.123);
        assert_eq!(round_to(-1.234_56, 4), -1.2346);
    }

    fn angle_strategy() -> impl Strategy<Value = f64> {
        -10_000.0f64..10_000.0f64
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn prop_normalize_in_range(theta in angle_strategy()) {
            let n = normalize(theta);
            prop_assert!((0.0..360.0).contains(&n), "normalize({}) = {}", theta, n);
        }

        #[test]
        fn prop_normalize_idempotent(theta in angle_strategy()) {
            let once = normalize(theta);
            prop_assert_eq!(normalize(once), once);
        }

        #[test]
        fn prop_shortest_delta_bounded(a in angle_strategy(), b in angle_strategy()) {
            prop_assert!(shortest_delta(a, b).abs() <= 180.0);
        }

        #[test]
        fn prop_shortest_delta_antisymmetric(a in angle_strategy(), b in angle_strategy()) {
            let ab = shortest_delta(a, b);
            let ba = shortest_delta(b, a);
            // Exactly opposite points have no preferred direction.
            if (ab.abs() - 180.0).abs() > 1e-6 {
                prop_assert!((ab + ba).abs() < 1e-6, "delta({a},{b})={ab}, delta({b},{a})={ba}");
            }
        }
    }
}

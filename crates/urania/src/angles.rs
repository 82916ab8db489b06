//! Circle arithmetic on ecliptic longitudes.
//!
//! Every longitude that leaves this module is normalized to [0, 360).

/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let normalized = value.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Shortest angular distance between two longitudes, in [0, 180].
///
/// Computed from `|lon1 - lon2|` so that swapping the arguments gives a
/// bit-identical result.
pub fn angular_distance(lon1: f64, lon2: f64) -> f64 {
    let diff = (lon1 - lon2).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Normalize an angle to [-180, 180).
pub fn normalize_signed(value: f64) -> f64 {
    let shifted = normalize_degrees(value + 180.0) - 180.0;
    if shifted >= 180.0 {
        -180.0
    } else {
        shifted
    }
}

/// Signed shortest rotation from `from` to `to`, in [-180, 180).
///
/// Positive when `to` lies ahead of `from` in zodiacal order.
pub fn signed_delta(from: f64, to: f64) -> f64 {
    normalize_signed(to - from)
}

/// Forward (zodiacal) arc from `start` to `end`, in [0, 360).
pub fn arc_forward(start: f64, end: f64) -> f64 {
    normalize_degrees(end - start)
}

/// Whether `lon` lies in the half-open forward arc `[start, end)`.
///
/// An arc whose end is numerically below its start wraps through 0°.
/// A zero-width arc contains nothing.
pub fn in_forward_arc(lon: f64, start: f64, end: f64) -> bool {
    let lon = normalize_degrees(lon);
    let start = normalize_degrees(start);
    let end = normalize_degrees(end);
    if start < end {
        lon >= start && lon < end
    } else if start > end {
        lon >= start || lon < end
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_covers_any_real() {
        for value in [
            -1e-18, -0.0, 0.0, 359.999_999, 360.0, 720.5, -30.0, -725.25, 1e9, -1e9,
        ] {
            let n = normalize_degrees(value);
            assert!((0.0..360.0).contains(&n), "{} -> {}", value, n);
        }
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }

    #[test]
    fn distance_symmetric_and_bounded() {
        let samples = [0.0, 10.0, 179.5, 180.0, 190.0, 359.9, 725.0, -40.0];
        for &a in &samples {
            for &b in &samples {
                let d = angular_distance(a, b);
                assert_eq!(d, angular_distance(b, a));
                assert!((0.0..=180.0).contains(&d), "{} {} -> {}", a, b, d);
            }
        }
        assert!((angular_distance(355.0, 5.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn signed_delta_wraps() {
        assert!((signed_delta(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((signed_delta(10.0, 350.0) + 20.0).abs() < 1e-12);
        assert_eq!(signed_delta(0.0, 180.0), -180.0);
    }

    #[test]
    fn forward_arc_membership() {
        assert!(in_forward_arc(45.0, 30.0, 60.0));
        assert!(!in_forward_arc(60.0, 30.0, 60.0));
        assert!(in_forward_arc(355.0, 330.0, 10.0));
        assert!(in_forward_arc(5.0, 330.0, 10.0));
        assert!(!in_forward_arc(20.0, 330.0, 10.0));
        assert!(!in_forward_arc(20.0, 20.0, 20.0));
    }
}

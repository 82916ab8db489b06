//! Julian day, mean obliquity and sidereal time.
//!
//! UTC is used in place of UT1; the sub-second difference moves the
//! angles by well under an arcminute.
//!
//! Sources: Meeus, "Astronomical Algorithms" (2nd ed), eq. 12.4 and 22.2.

use crate::angles::normalize_degrees;
use chrono::{DateTime, Utc};

/// Julian Date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Date of J2000.0.
pub const J2000_JD: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian Date of a UTC instant.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

/// Julian centuries since J2000.0.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Mean obliquity of the ecliptic in degrees.
///
/// ε = 23°26′21.448″ − 46.8150″T − 0.00059″T² + 0.001813″T³
pub fn mean_obliquity_deg(t: f64) -> f64 {
    let arcsec = 21.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t;
    23.0 + 26.0 / 60.0 + arcsec / 3600.0
}

/// Greenwich mean sidereal time in degrees, [0, 360).
pub fn greenwich_sidereal_deg(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (jd - J2000_JD) + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta)
}

/// Local sidereal time (= RAMC) in degrees for an east longitude.
pub fn local_sidereal_deg(jd: f64, east_longitude: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_deg(jd) + east_longitude)
}

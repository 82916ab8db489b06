use crate::angles::normalize_degrees;
use crate::bodies::Body;
use crate::error::ChartError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Geographic observer location in degrees (east longitude positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

impl GeoLocation {
    /// Build a validated location.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ChartError> {
        let location = Self { lat, lon };
        location.validate()?;
        Ok(location)
    }

    /// Fails fast on coordinates outside physical ranges.
    pub fn validate(&self) -> Result<(), ChartError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(ChartError::InvalidLatitude(self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=360.0).contains(&self.lon) {
            return Err(ChartError::InvalidLongitude(self.lon));
        }
        Ok(())
    }
}

/// Position of a chart point at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    pub body: Body,
    /// Ecliptic longitude in degrees, [0, 360)
    pub lon: f64,
    /// Ecliptic latitude in degrees
    pub lat: f64,
    /// Speed in longitude (degrees per day, negative when retrograde).
    /// `None` for fixed points such as chart angles.
    pub speed_lon: Option<f64>,
}

impl CelestialPosition {
    pub fn new(body: Body, lon: f64, lat: f64, speed_lon: f64) -> Self {
        Self {
            body,
            lon: normalize_degrees(lon),
            lat,
            speed_lon: Some(speed_lon),
        }
    }

    /// A point with no known motion.
    pub fn fixed(body: Body, lon: f64) -> Self {
        Self {
            body,
            lon: normalize_degrees(lon),
            lat: 0.0,
            speed_lon: None,
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.speed_lon.map_or(false, |speed| speed < 0.0)
    }
}

/// Half-open UTC interval `[start, end)` scanned by searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ChartError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Window of `days` starting at `start`.
    pub fn from_days(start: DateTime<Utc>, days: f64) -> Result<Self, ChartError> {
        if !days.is_finite() {
            return Err(ChartError::InvalidWindow(format!("span of {} days", days)));
        }
        let end = offset_by_days(start, days).ok_or_else(|| {
            ChartError::InvalidWindow(format!(
                "span of {} days from {} is out of range",
                days, start
            ))
        })?;
        Self::new(start, end)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        if self.end <= self.start {
            return Err(ChartError::InvalidWindow(format!(
                "end {} is not after start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    pub fn span_days(&self) -> f64 {
        days_between(self.start, self.end)
    }

    /// Instant `days` after the window start, clamped to the
    /// representable range.
    pub fn instant_at(&self, days: f64) -> DateTime<Utc> {
        offset_by_days(self.start, days).unwrap_or(if days < 0.0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }
}

/// Signed number of days from `from` to `to`, at microsecond resolution.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_DAY,
        None => delta.num_milliseconds() as f64 / 86_400_000.0,
    }
}

/// Shift an instant by a fractional number of days.
///
/// `None` when `days` is not finite or the result leaves chrono's range.
pub fn offset_by_days(instant: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    if !days.is_finite() {
        return None;
    }
    instant.checked_add_signed(Duration::microseconds((days * MICROS_PER_DAY).round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn location_validation() {
        assert!(GeoLocation::new(51.48, 0.0).is_ok());
        assert!(GeoLocation::new(90.0, -180.0).is_ok());
        assert!(matches!(
            GeoLocation::new(91.0, 0.0),
            Err(ChartError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoLocation::new(f64::NAN, 0.0),
            Err(ChartError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoLocation::new(10.0, f64::INFINITY),
            Err(ChartError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn position_normalizes_longitude() {
        let pos = CelestialPosition::new(Body::Mars, -10.0, 1.0, -0.2);
        assert!((pos.lon - 350.0).abs() < 1e-12);
        assert!(pos.is_retrograde());
        assert!(!CelestialPosition::fixed(Body::Ascendant, 370.0).is_retrograde());
    }

    #[test]
    fn window_arithmetic() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = TimeWindow::from_days(start, 1.5).unwrap();
        assert!((window.span_days() - 1.5).abs() < 1e-9);
        assert_eq!(
            window.instant_at(0.5),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
        assert!(TimeWindow::new(start, start).is_err());
    }

    #[test]
    fn window_beyond_calendar_range_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            TimeWindow::from_days(start, 1e8),
            Err(ChartError::InvalidWindow(_))
        ));
        assert!(matches!(
            TimeWindow::from_days(start, -1e12),
            Err(ChartError::InvalidWindow(_))
        ));
        assert!(offset_by_days(start, f64::NAN).is_none());

        let window = TimeWindow::from_days(start, 10.0).unwrap();
        assert_eq!(window.instant_at(1e9), DateTime::<Utc>::MAX_UTC);
        assert_eq!(window.instant_at(-1e9), DateTime::<Utc>::MIN_UTC);
    }
}

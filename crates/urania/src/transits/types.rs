use crate::angles::normalize_degrees;
use crate::aspects::AspectKind;
use crate::bodies::Body;
use crate::ephemeris::TimeWindow;
use crate::error::{validate_orb, ChartError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A request to time a transit to a fixed longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitQuery {
    pub body: Body,
    pub aspect: AspectKind,
    /// Natal longitude the aspect is measured from
    pub natal_longitude: f64,
    pub window: TimeWindow,
    /// Hits further than this from exact are not reported
    pub max_orb: f64,
}

impl TransitQuery {
    pub fn new(
        body: Body,
        aspect: AspectKind,
        natal_longitude: f64,
        window: TimeWindow,
        max_orb: f64,
    ) -> Self {
        Self {
            body,
            aspect,
            natal_longitude,
            window,
            max_orb,
        }
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        self.window.validate()?;
        validate_orb(self.max_orb)?;
        if !self.natal_longitude.is_finite() {
            return Err(ChartError::InvalidWindow(format!(
                "natal longitude {} is not finite",
                self.natal_longitude
            )));
        }
        Ok(())
    }

    /// Longitudes where the transiting body makes the aspect exact.
    ///
    /// One point for conjunction and opposition, two otherwise.
    pub fn targets(&self) -> Vec<f64> {
        let angle = self.aspect.default_angle();
        let ahead = normalize_degrees(self.natal_longitude + angle);
        let behind = normalize_degrees(self.natal_longitude - angle);
        if crate::angles::angular_distance(ahead, behind) < 1e-9 {
            vec![ahead]
        } else {
            vec![ahead, behind]
        }
    }
}

/// One pass of the transiting body through an exact aspect point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitHit {
    pub instant: DateTime<Utc>,
    /// Distance from exact at `instant`, degrees
    pub orb: f64,
    pub transiting_longitude: f64,
    pub is_retrograde: bool,
    /// The exact aspect point that was approached
    pub target_longitude: f64,
    pub aspect: AspectKind,
}

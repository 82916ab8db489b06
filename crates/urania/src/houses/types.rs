use crate::angles::{arc_forward, in_forward_arc, normalize_degrees};
use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// The twelve house cusps, house 1 first.
///
/// Read cyclically, consecutive cusps partition the circle into twelve
/// arcs that sum to 360°.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct HouseCusps {
    cusps: [f64; 12],
}

impl HouseCusps {
    /// Build cusps from twelve longitudes, normalizing each.
    pub fn new(cusps: [f64; 12]) -> Result<Self, ChartError> {
        if let Some(bad) = cusps.iter().find(|c| !c.is_finite()) {
            return Err(ChartError::InvalidCusps(format!("non-finite cusp {}", bad)));
        }
        Ok(Self {
            cusps: cusps.map(normalize_degrees),
        })
    }

    pub fn from_slice(cusps: &[f64]) -> Result<Self, ChartError> {
        let array: [f64; 12] = cusps.try_into().map_err(|_| {
            ChartError::InvalidCusps(format!("expected 12 cusps, got {}", cusps.len()))
        })?;
        Self::new(array)
    }

    /// Equal 30° houses starting at `start`.
    pub fn equal(start: f64) -> Self {
        Self {
            cusps: std::array::from_fn(|i| normalize_degrees(start + i as f64 * 30.0)),
        }
    }

    pub fn as_array(&self) -> &[f64; 12] {
        &self.cusps
    }

    /// Cusp of a 1-based house number.
    pub fn cusp(&self, house: usize) -> Option<f64> {
        house.checked_sub(1).and_then(|i| self.cusps.get(i)).copied()
    }

    pub fn ascendant(&self) -> f64 {
        self.cusps[0]
    }

    /// Forward width of each house, in house order.
    pub fn arcs(&self) -> [f64; 12] {
        std::array::from_fn(|i| arc_forward(self.cusps[i], self.cusps[(i + 1) % 12]))
    }

    /// 1-based house containing `longitude`.
    ///
    /// House `i` spans `[cusp[i], cusp[i+1])` going forward, wrapping
    /// through 0° when the next cusp is numerically smaller.
    pub fn house_of(&self, longitude: f64) -> Option<u8> {
        (0..12)
            .find(|&i| in_forward_arc(longitude, self.cusps[i], self.cusps[(i + 1) % 12]))
            .map(|i| i as u8 + 1)
    }
}

impl TryFrom<Vec<f64>> for HouseCusps {
    type Error = ChartError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&value)
    }
}

impl From<HouseCusps> for Vec<f64> {
    fn from(value: HouseCusps) -> Self {
        value.cusps.to_vec()
    }
}

/// The four chart angles in ecliptic longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    pub ascendant: f64,
    pub midheaven: f64,
    pub descendant: f64,
    pub imum_coeli: f64,
}

impl Angles {
    pub fn new(ascendant: f64, midheaven: f64) -> Self {
        Self {
            ascendant: normalize_degrees(ascendant),
            midheaven: normalize_degrees(midheaven),
            descendant: normalize_degrees(ascendant + 180.0),
            imum_coeli: normalize_degrees(midheaven + 180.0),
        }
    }
}

/// How the intermediate cusps were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseMethod {
    /// Semi-arc trisection
    Placidus,
    /// Quadrant trisection, used where the semi-arc is undefined
    Porphyry,
}

/// Result of a house computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseChart {
    pub method: HouseMethod,
    pub cusps: HouseCusps,
    pub angles: Angles,
    /// Set when the cusps are an estimate: polar fallback or an
    /// iteration that stopped at its cap.
    pub approximate: bool,
    /// Right ascension of the MC, degrees
    pub ramc: f64,
    /// Obliquity of the ecliptic used, degrees
    pub obliquity: f64,
}

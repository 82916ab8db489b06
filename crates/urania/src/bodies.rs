use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for a chart point: a celestial body or one of the four angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
    Ascendant,
    Midheaven,
    Descendant,
    ImumCoeli,
}

/// Bodies with an ephemeris, in traditional chart order.
pub const PLANETS: &[Body] = &[
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::Chiron,
    Body::NorthNode,
    Body::SouthNode,
];

/// The four chart angles.
pub const ANGLES: &[Body] = &[
    Body::Ascendant,
    Body::Midheaven,
    Body::Descendant,
    Body::ImumCoeli,
];

const NAMES: &[(&str, Body)] = &[
    ("sun", Body::Sun),
    ("moon", Body::Moon),
    ("mercury", Body::Mercury),
    ("venus", Body::Venus),
    ("mars", Body::Mars),
    ("jupiter", Body::Jupiter),
    ("saturn", Body::Saturn),
    ("uranus", Body::Uranus),
    ("neptune", Body::Neptune),
    ("pluto", Body::Pluto),
    ("chiron", Body::Chiron),
    ("north_node", Body::NorthNode),
    ("south_node", Body::SouthNode),
    ("ascendant", Body::Ascendant),
    ("midheaven", Body::Midheaven),
    ("descendant", Body::Descendant),
    ("imum_coeli", Body::ImumCoeli),
];

const ALIASES: &[(&str, Body)] = &[
    ("asc", Body::Ascendant),
    ("mc", Body::Midheaven),
    ("dc", Body::Descendant),
    ("desc", Body::Descendant),
    ("ic", Body::ImumCoeli),
    ("true_node", Body::NorthNode),
    ("rahu", Body::NorthNode),
    ("ketu", Body::SouthNode),
];

impl Body {
    pub fn id(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, body)| body == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    pub fn is_angle(&self) -> bool {
        ANGLES.contains(self)
    }

    /// Sampling cadence in days for transit scans.
    ///
    /// Each step must stay well below the shortest time between two
    /// successive minima of the angular distance, which for a body that
    /// stations is a fraction of its retrograde period.
    pub fn sample_step_days(&self) -> f64 {
        match self {
            Body::Moon => 0.25,
            Body::Sun | Body::Mercury | Body::Venus => 1.0,
            Body::Mars => 2.0,
            Body::Jupiter | Body::Saturn | Body::Chiron | Body::NorthNode | Body::SouthNode => 5.0,
            Body::Uranus | Body::Neptune | Body::Pluto => 10.0,
            // Angles sweep the whole zodiac daily
            Body::Ascendant | Body::Midheaven | Body::Descendant | Body::ImumCoeli => 1.0 / 96.0,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Body {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        NAMES
            .iter()
            .chain(ALIASES.iter())
            .find(|(name, _)| *name == key)
            .map(|(_, body)| *body)
            .ok_or_else(|| ChartError::UnknownBody(s.to_string()))
    }
}

//! Natal chart assembly and the combined facts derived from it.

use crate::aspects::{compute_aspects, Aspect, OrbConfig};
use crate::bodies::Body;
use crate::ephemeris::provider::fetch_snapshot;
use crate::ephemeris::{CelestialPosition, GeoLocation, PositionProvider};
use crate::error::ChartError;
use crate::houses::{HouseCalculator, HouseChart};
use crate::patterns::{detect_patterns, AspectPattern};
use crate::zodiac::ZodiacPosition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body positions at one instant, with houses when a location is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub instant: DateTime<Utc>,
    pub location: Option<GeoLocation>,
    pub positions: Vec<CelestialPosition>,
    pub houses: Option<HouseChart>,
}

impl NatalChart {
    /// Fetch `bodies` in one provider call and compute houses at `location`.
    ///
    /// Angles in `bodies` are skipped for the provider; they come from the
    /// house computation instead.
    pub fn compute<P: PositionProvider + ?Sized>(
        provider: &P,
        bodies: &[Body],
        instant: DateTime<Utc>,
        location: Option<GeoLocation>,
    ) -> Result<Self, ChartError> {
        let planets: Vec<Body> = bodies.iter().copied().filter(|b| !b.is_angle()).collect();
        let positions = fetch_snapshot(provider, &planets, instant)?;
        let houses = location
            .map(|loc| HouseCalculator::new().compute(instant, &loc))
            .transpose()?;
        Ok(Self {
            instant,
            location,
            positions,
            houses,
        })
    }

    /// Chart from positions and houses computed elsewhere.
    pub fn from_parts(
        instant: DateTime<Utc>,
        positions: Vec<CelestialPosition>,
        houses: Option<HouseChart>,
    ) -> Self {
        Self {
            instant,
            location: None,
            positions,
            houses,
        }
    }

    /// Body positions followed by the four angles as fixed points.
    pub fn points(&self) -> Vec<CelestialPosition> {
        let mut points = self.positions.clone();
        if let Some(houses) = &self.houses {
            let angles = houses.angles;
            points.extend([
                CelestialPosition::fixed(Body::Ascendant, angles.ascendant),
                CelestialPosition::fixed(Body::Midheaven, angles.midheaven),
                CelestialPosition::fixed(Body::Descendant, angles.descendant),
                CelestialPosition::fixed(Body::ImumCoeli, angles.imum_coeli),
            ]);
        }
        points
    }

    /// Roster of [`NatalChart::points`], in the same order.
    pub fn bodies(&self) -> Vec<Body> {
        self.points().iter().map(|p| p.body).collect()
    }

    pub fn position(&self, body: Body) -> Option<&CelestialPosition> {
        self.positions.iter().find(|p| p.body == body)
    }

    /// House containing `longitude`, when houses are known.
    pub fn house_of(&self, longitude: f64) -> Option<u8> {
        self.houses
            .as_ref()
            .and_then(|h| h.cusps.house_of(longitude))
    }
}

/// Where one chart point sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub body: Body,
    pub longitude: f64,
    pub zodiac: ZodiacPosition,
    pub house: Option<u8>,
    pub retrograde: bool,
}

/// Everything derived from a natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFacts {
    pub placements: Vec<Placement>,
    pub aspects: Vec<Aspect>,
    pub patterns: Vec<AspectPattern>,
    /// Set when the houses are an estimate
    pub approximate_houses: bool,
}

impl ChartFacts {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Placements, aspects and patterns for a chart.
pub fn derive_chart_facts(chart: &NatalChart, orbs: &OrbConfig) -> ChartFacts {
    let points = chart.points();
    let aspects = compute_aspects(&points, None, orbs);
    let bodies: Vec<Body> = points.iter().map(|p| p.body).collect();
    let patterns = detect_patterns(&aspects, &bodies);
    let placements = points
        .iter()
        .map(|p| Placement {
            body: p.body,
            longitude: p.lon,
            zodiac: ZodiacPosition::from_longitude(p.lon),
            house: chart.house_of(p.lon),
            retrograde: p.is_retrograde(),
        })
        .collect();
    ChartFacts {
        placements,
        aspects,
        patterns,
        approximate_houses: chart.houses.as_ref().map_or(false, |h| h.approximate),
    }
}

/// Aspects from transiting positions to a natal chart's points.
pub fn compute_transit_aspects(
    transiting: &[CelestialPosition],
    natal: &NatalChart,
    orbs: &OrbConfig,
) -> Vec<Aspect> {
    let points = natal.points();
    compute_aspects(transiting, Some(points.as_slice()), orbs)
}

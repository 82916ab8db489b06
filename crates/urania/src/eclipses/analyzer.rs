use crate::angles::angular_distance;
use crate::chart::NatalChart;
use crate::eclipses::types::{AffectedBody, Eclipse, EclipseImpact};
use crate::ephemeris::CelestialPosition;
use crate::error::{validate_orb, ChartError};
use crate::houses::HouseCusps;
use crate::zodiac::ZodiacPosition;

/// Measures eclipses against fixed natal points and houses.
pub struct EclipseAnalyzer<'a> {
    points: &'a [CelestialPosition],
    cusps: Option<&'a HouseCusps>,
    orb: f64,
}

impl<'a> EclipseAnalyzer<'a> {
    pub fn new(
        points: &'a [CelestialPosition],
        cusps: Option<&'a HouseCusps>,
        orb: f64,
    ) -> Result<Self, ChartError> {
        Ok(Self {
            points,
            cusps,
            orb: validate_orb(orb)?,
        })
    }

    pub fn impact(&self, eclipse: &Eclipse) -> Result<EclipseImpact, ChartError> {
        if !eclipse.longitude.is_finite() {
            return Err(ChartError::InvalidEclipse(format!(
                "longitude {} at {} is not finite",
                eclipse.longitude, eclipse.instant
            )));
        }
        let mut affected: Vec<AffectedBody> = self
            .points
            .iter()
            .map(|p| AffectedBody {
                body: p.body,
                orb: angular_distance(eclipse.longitude, p.lon),
            })
            .filter(|a| a.orb <= self.orb)
            .collect();
        // Stable: equal orbs keep roster order
        affected.sort_by(|a, b| a.orb.total_cmp(&b.orb));

        Ok(EclipseImpact {
            eclipse: eclipse.clone(),
            position: ZodiacPosition::from_longitude(eclipse.longitude),
            affected_bodies: affected,
            house: self.cusps.and_then(|c| c.house_of(eclipse.longitude)),
        })
    }

    pub fn analyze(&self, eclipses: &[Eclipse]) -> Result<Vec<EclipseImpact>, ChartError> {
        eclipses.iter().map(|e| self.impact(e)).collect()
    }
}

/// Impact of each eclipse on `natal`, in input order.
pub fn analyze_eclipse_impacts(
    natal: &NatalChart,
    eclipses: &[Eclipse],
    orb: f64,
) -> Result<Vec<EclipseImpact>, ChartError> {
    let points = natal.points();
    let cusps = natal.houses.as_ref().map(|h| &h.cusps);
    EclipseAnalyzer::new(&points, cusps, orb)?.analyze(eclipses)
}

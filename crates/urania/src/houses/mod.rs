//! House systems: Placidus with a Porphyry fallback near the poles.

mod placidus;
pub mod time;
pub mod types;

pub use time::{julian_day, local_sidereal_deg, mean_obliquity_deg};
pub use types::{Angles, HouseChart, HouseCusps, HouseMethod};

use crate::ephemeris::GeoLocation;
use crate::error::ChartError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use placidus::IntermediateCusp;

/// Computes house cusps for an instant and observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HouseCalculator;

impl HouseCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Placidus cusps for `instant` at `location`.
    pub fn compute(
        &self,
        instant: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<HouseChart, ChartError> {
        location.validate()?;
        let jd = julian_day(instant);
        let obliquity = mean_obliquity_deg(time::julian_centuries(jd));
        let ramc = local_sidereal_deg(jd, location.lon);
        debug!(
            "houses at {} (lat {:.4}, lon {:.4}): ramc {:.6}, obliquity {:.6}",
            instant, location.lat, location.lon, ramc, obliquity
        );
        self.compute_from_ramc(ramc, obliquity, location.lat)
    }

    /// Placidus cusps from sidereal quantities directly.
    ///
    /// Falls back to Porphyry trisection, flagged approximate, when any
    /// intermediate cusp has no semi-arc at this latitude.
    pub fn compute_from_ramc(
        &self,
        ramc: f64,
        obliquity: f64,
        latitude: f64,
    ) -> Result<HouseChart, ChartError> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(ChartError::InvalidLatitude(latitude));
        }
        let ramc = crate::angles::normalize_degrees(ramc);
        let asc = placidus::ascendant(ramc, obliquity, latitude);
        let mc = placidus::midheaven(ramc, obliquity);
        let angles = Angles::new(asc, mc);

        let mut cusps = [0.0; 12];
        cusps[0] = asc;
        cusps[9] = mc;
        let mut approximate = false;
        let mut undefined = false;
        for cusp in IntermediateCusp::ALL {
            match placidus::solve_cusp(cusp, ramc, obliquity, latitude) {
                Some((lon, converged)) => {
                    if !converged {
                        warn!(
                            "Placidus cusp {} did not converge at latitude {:.4}",
                            cusp.index() + 1,
                            latitude
                        );
                        approximate = true;
                    }
                    cusps[cusp.index()] = lon;
                }
                None => {
                    undefined = true;
                    break;
                }
            }
        }

        let (method, cusps) = if undefined {
            warn!(
                "Placidus undefined at latitude {:.4}; using Porphyry cusps",
                latitude
            );
            approximate = true;
            (HouseMethod::Porphyry, placidus::porphyry_cusps(asc, mc))
        } else {
            placidus::fill_opposites(&mut cusps);
            (HouseMethod::Placidus, cusps)
        };

        Ok(HouseChart {
            method,
            cusps: HouseCusps::new(cusps)?,
            angles,
            approximate,
            ramc,
            obliquity,
        })
    }
}

/// Placidus houses for a UTC instant and geographic position.
pub fn compute_houses(
    instant: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
) -> Result<HouseChart, ChartError> {
    let location = GeoLocation::new(latitude, longitude)?;
    HouseCalculator::new().compute(instant, &location)
}

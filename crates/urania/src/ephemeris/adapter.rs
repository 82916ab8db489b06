use crate::angles::normalize_degrees;
use crate::bodies::Body;
use crate::ephemeris::provider::PositionProvider;
use crate::ephemeris::types::CelestialPosition;
use crate::error::ProviderError;
use crate::houses::julian_day;
use chrono::{DateTime, Utc};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, set_ephe_path};

// Swiss Ephemeris body codes
const BODY_CODES: &[(Body, i32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
    (Body::NorthNode, 11), // TRUE_NODE
    (Body::Chiron, 15),
];

// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: u32 = 2 | 256;

/// [`PositionProvider`] backed by the Swiss Ephemeris data files.
pub struct SwissEphemerisProvider {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisProvider {
    /// Create a provider and point the library at its data files.
    ///
    /// The path falls back to `SWISS_EPHEMERIS_PATH`, then
    /// `/usr/local/share/swisseph`. The library holds a single path per
    /// process, so the last provider created wins.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, ProviderError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(ProviderError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "Ephemeris path {} does not exist. Please ensure Swiss Ephemeris data files are installed.",
                    path.display()
                ),
            )));
        }

        // Process-wide setting in the C library
        set_ephe_path(&path.to_string_lossy());

        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    fn calc_body(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        let code = BODY_CODES
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
            .ok_or_else(|| ProviderError::UnknownBody(body.to_string()))?;

        let result = calc_ut(julian_day(instant), code as u32, CALC_FLAGS).map_err(|e| {
            ProviderError::CalculationFailed {
                body: body.to_string(),
                instant,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(CelestialPosition {
            body,
            lon: normalize_degrees(out[0]),
            lat: out[1],
            speed_lon: Some(out[3]),
        })
    }
}

impl PositionProvider for SwissEphemerisProvider {
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        match body {
            // Derived from the true node
            Body::SouthNode => {
                let north = self.calc_body(Body::NorthNode, instant)?;
                Ok(CelestialPosition {
                    body: Body::SouthNode,
                    lon: normalize_degrees(north.lon + 180.0),
                    lat: -north.lat,
                    speed_lon: north.speed_lon,
                })
            }
            _ => self.calc_body(body, instant),
        }
    }
}

use crate::angles::normalize_degrees;
use crate::bodies::Body;
use crate::ephemeris::types::CelestialPosition;
use crate::error::ProviderError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of raw body positions.
///
/// Longitudes must be continuous across 0°/360° and speeds signed
/// (negative when retrograde). Implementations backed by files or services
/// should override [`PositionProvider::positions`] to serve a whole batch
/// in one round-trip.
pub trait PositionProvider {
    /// Position of `body` at `instant`.
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError>;

    /// Positions of `body` at each instant, in the same order.
    ///
    /// The batch fails as a whole when any single instant fails.
    fn positions(
        &self,
        body: Body,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        instants
            .iter()
            .map(|instant| self.position(body, *instant))
            .collect()
    }

    /// Positions of several bodies at one instant, in the same order.
    fn snapshot(
        &self,
        bodies: &[Body],
        instant: DateTime<Utc>,
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        bodies
            .iter()
            .map(|body| self.position(*body, instant))
            .collect()
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        (**self).position(body, instant)
    }

    fn positions(
        &self,
        body: Body,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        (**self).positions(body, instants)
    }

    fn snapshot(
        &self,
        bodies: &[Body],
        instant: DateTime<Utc>,
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        (**self).snapshot(bodies, instant)
    }
}

impl<P: PositionProvider + ?Sized> PositionProvider for Arc<P> {
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        (**self).position(body, instant)
    }

    fn positions(
        &self,
        body: Body,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        (**self).positions(body, instants)
    }

    fn snapshot(
        &self,
        bodies: &[Body],
        instant: DateTime<Utc>,
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        (**self).snapshot(bodies, instant)
    }
}

/// Fetch a batch for one body over many instants and check it.
pub(crate) fn fetch_series<P: PositionProvider + ?Sized>(
    provider: &P,
    body: Body,
    instants: &[DateTime<Utc>],
) -> Result<Vec<CelestialPosition>, ProviderError> {
    let positions = provider.positions(body, instants)?;
    if positions.len() != instants.len() {
        return Err(ProviderError::Malformed {
            body: body.to_string(),
            instant: instants.first().copied().unwrap_or_else(Utc::now),
            message: format!(
                "batch returned {} positions for {} instants",
                positions.len(),
                instants.len()
            ),
        });
    }
    positions
        .into_iter()
        .zip(instants)
        .map(|(pos, instant)| checked(pos, body, *instant))
        .collect()
}

/// Fetch several bodies at one instant and check the result.
pub(crate) fn fetch_snapshot<P: PositionProvider + ?Sized>(
    provider: &P,
    bodies: &[Body],
    instant: DateTime<Utc>,
) -> Result<Vec<CelestialPosition>, ProviderError> {
    let positions = provider.snapshot(bodies, instant)?;
    if positions.len() != bodies.len() {
        return Err(ProviderError::Malformed {
            body: "snapshot".to_string(),
            instant,
            message: format!(
                "snapshot returned {} positions for {} bodies",
                positions.len(),
                bodies.len()
            ),
        });
    }
    positions
        .into_iter()
        .zip(bodies)
        .map(|(pos, body)| checked(pos, *body, instant))
        .collect()
}

/// Fetch a single position and check it.
pub(crate) fn fetch_one<P: PositionProvider + ?Sized>(
    provider: &P,
    body: Body,
    instant: DateTime<Utc>,
) -> Result<CelestialPosition, ProviderError> {
    let pos = provider.position(body, instant)?;
    checked(pos, body, instant)
}

fn checked(
    pos: CelestialPosition,
    body: Body,
    instant: DateTime<Utc>,
) -> Result<CelestialPosition, ProviderError> {
    let malformed = |message: String| ProviderError::Malformed {
        body: body.to_string(),
        instant,
        message,
    };
    if pos.body != body {
        return Err(malformed(format!("expected {} but got {}", body, pos.body)));
    }
    if !pos.lon.is_finite() || !pos.lat.is_finite() {
        return Err(malformed(format!(
            "non-finite coordinates (lon {}, lat {})",
            pos.lon, pos.lat
        )));
    }
    if let Some(speed) = pos.speed_lon {
        if !speed.is_finite() {
            return Err(malformed(format!("non-finite speed {}", speed)));
        }
    }
    Ok(CelestialPosition {
        lon: normalize_degrees(pos.lon),
        ..pos
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Broken;

    impl PositionProvider for Broken {
        fn position(
            &self,
            body: Body,
            instant: DateTime<Utc>,
        ) -> Result<CelestialPosition, ProviderError> {
            if instant.timestamp() > 0 {
                Ok(CelestialPosition::new(body, f64::NAN, 0.0, 1.0))
            } else {
                Ok(CelestialPosition::new(body, 10.0, 0.0, 1.0))
            }
        }
    }

    #[test]
    fn batch_fails_atomically_on_malformed_entry() {
        let good = Utc.timestamp_opt(0, 0).unwrap();
        let bad = Utc.timestamp_opt(3600, 0).unwrap();
        let result = fetch_series(&Broken, Body::Sun, &[good, bad, good]);
        assert!(matches!(result, Err(ProviderError::Malformed { .. })));
        assert_eq!(fetch_series(&Broken, Body::Sun, &[good]).unwrap().len(), 1);
    }

    #[test]
    fn mismatched_body_is_malformed() {
        struct WrongBody;
        impl PositionProvider for WrongBody {
            fn position(
                &self,
                _body: Body,
                _instant: DateTime<Utc>,
            ) -> Result<CelestialPosition, ProviderError> {
                Ok(CelestialPosition::new(Body::Moon, 1.0, 0.0, 13.0))
            }
        }
        let at = Utc.timestamp_opt(0, 0).unwrap();
        assert!(fetch_one(&WrongBody, Body::Sun, at).is_err());
    }
}

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use urania::ephemeris::days_between;
use urania::{Body, CelestialPosition, PositionProvider, ProviderError};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Constant-speed motion from `lon0` at `start`.
pub struct LinearProvider {
    pub body: Body,
    pub start: DateTime<Utc>,
    pub lon0: f64,
    pub speed: f64,
}

impl PositionProvider for LinearProvider {
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        if body != self.body {
            return Err(ProviderError::UnknownBody(body.to_string()));
        }
        let t = days_between(self.start, instant);
        Ok(CelestialPosition::new(body, self.lon0 + self.speed * t, 0.0, self.speed))
    }
}

/// Back-and-forth motion around `center`: direct, station, retrograde.
pub struct OscillatingProvider {
    pub body: Body,
    pub start: DateTime<Utc>,
    pub center: f64,
    pub amplitude: f64,
    pub period_days: f64,
}

impl PositionProvider for OscillatingProvider {
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        let w = 2.0 * std::f64::consts::PI / self.period_days;
        let t = days_between(self.start, instant);
        let lon = self.center + self.amplitude * (w * t).cos();
        let speed = -self.amplitude * w * (w * t).sin();
        Ok(CelestialPosition::new(body, lon, 0.0, speed))
    }
}

/// Fixed longitude and speed per body.
pub struct FixedProvider {
    pub positions: HashMap<Body, (f64, f64)>,
}

impl FixedProvider {
    pub fn new(entries: &[(Body, f64, f64)]) -> Self {
        Self {
            positions: entries
                .iter()
                .map(|&(body, lon, speed)| (body, (lon, speed)))
                .collect(),
        }
    }
}

impl PositionProvider for FixedProvider {
    fn position(
        &self,
        body: Body,
        _instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        self.positions
            .get(&body)
            .map(|&(lon, speed)| CelestialPosition::new(body, lon, 0.0, speed))
            .ok_or_else(|| ProviderError::UnknownBody(body.to_string()))
    }
}

/// Always times out.
pub struct FailingProvider;

impl PositionProvider for FailingProvider {
    fn position(
        &self,
        _body: Body,
        _instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        Err(ProviderError::Timeout(std::time::Duration::from_secs(5)))
    }
}

/// Counts batch round-trips made to the wrapped provider.
pub struct CountingProvider<P> {
    pub inner: P,
    pub batches: AtomicUsize,
    pub singles: AtomicUsize,
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            batches: AtomicUsize::new(0),
            singles: AtomicUsize::new(0),
        }
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

impl<P: PositionProvider> PositionProvider for CountingProvider<P> {
    fn position(
        &self,
        body: Body,
        instant: DateTime<Utc>,
    ) -> Result<CelestialPosition, ProviderError> {
        self.singles.fetch_add(1, Ordering::SeqCst);
        self.inner.position(body, instant)
    }

    fn positions(
        &self,
        body: Body,
        instants: &[DateTime<Utc>],
    ) -> Result<Vec<CelestialPosition>, ProviderError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        instants
            .iter()
            .map(|instant| self.inner.position(body, *instant))
            .collect()
    }
}

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Failures reported by a [`crate::ephemeris::PositionProvider`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown body: {0}")]
    UnknownBody(String),
    #[error("Position provider timed out after {0:?}")]
    Timeout(Duration),
    #[error("Position provider I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed position for {body} at {instant}: {message}")]
    Malformed {
        body: String,
        instant: DateTime<Utc>,
        message: String,
    },
    #[error("Failed to calculate position for {body} at {instant}: {message}")]
    CalculationFailed {
        body: String,
        instant: DateTime<Utc>,
        message: String,
    },
}

/// Errors surfaced by the chart computations.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Unknown body identifier: {0}")]
    UnknownBody(String),
    #[error("Latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("Observer longitude {0} is not a finite value in [-180, 360]")]
    InvalidLongitude(f64),
    #[error("Invalid orb configuration: {0}")]
    InvalidOrbConfig(String),
    #[error("Invalid orb {0}: must be finite and within [0, 180]")]
    InvalidOrb(f64),
    #[error("Invalid search window: {0}")]
    InvalidWindow(String),
    #[error("Invalid house cusps: {0}")]
    InvalidCusps(String),
    #[error("Invalid eclipse: {0}")]
    InvalidEclipse(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Background task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for ChartError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownBody(id) => ChartError::UnknownBody(id),
            other => ChartError::Provider(other),
        }
    }
}

/// Reject orbs that are negative, non-finite or wider than a half circle.
pub(crate) fn validate_orb(orb: f64) -> Result<f64, ChartError> {
    if orb.is_finite() && (0.0..=180.0).contains(&orb) {
        Ok(orb)
    } else {
        Err(ChartError::InvalidOrb(orb))
    }
}

use crate::angles::normalize_degrees;
use crate::bodies::Body;
use crate::zodiac::ZodiacPosition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a solar or lunar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EclipseKind {
    SolarTotal,
    SolarAnnular,
    SolarHybrid,
    SolarPartial,
    LunarTotal,
    LunarPartial,
    LunarPenumbral,
}

impl EclipseKind {
    pub fn is_solar(&self) -> bool {
        matches!(
            self,
            EclipseKind::SolarTotal
                | EclipseKind::SolarAnnular
                | EclipseKind::SolarHybrid
                | EclipseKind::SolarPartial
        )
    }

    pub fn is_lunar(&self) -> bool {
        !self.is_solar()
    }
}

/// An eclipse event supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eclipse {
    pub instant: DateTime<Utc>,
    /// Ecliptic longitude of the eclipse point: the Sun for a solar
    /// eclipse, the Moon for a lunar one
    pub longitude: f64,
    pub kind: EclipseKind,
}

impl Eclipse {
    pub fn new(instant: DateTime<Utc>, longitude: f64, kind: EclipseKind) -> Self {
        Self {
            instant,
            longitude: normalize_degrees(longitude),
            kind,
        }
    }
}

/// A natal point within orb of an eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectedBody {
    pub body: Body,
    pub orb: f64,
}

/// How one eclipse falls on a natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseImpact {
    pub eclipse: Eclipse,
    pub position: ZodiacPosition,
    /// Tightest first
    pub affected_bodies: Vec<AffectedBody>,
    /// 1-based house of the eclipse point, when houses are known
    pub house: Option<u8>,
}

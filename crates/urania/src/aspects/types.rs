use crate::bodies::Body;
use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Angular relationship classes, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    Semisextile,
}

impl AspectKind {
    /// All kinds, highest priority first.
    pub const ALL: [AspectKind; 7] = [
        AspectKind::Conjunction,
        AspectKind::Opposition,
        AspectKind::Trine,
        AspectKind::Square,
        AspectKind::Sextile,
        AspectKind::Quincunx,
        AspectKind::Semisextile,
    ];

    /// Lower value wins when two orb windows contain the same distance.
    pub fn priority(&self) -> u8 {
        match self {
            AspectKind::Conjunction => 0,
            AspectKind::Opposition => 1,
            AspectKind::Trine => 2,
            AspectKind::Square => 3,
            AspectKind::Sextile => 4,
            AspectKind::Quincunx => 5,
            AspectKind::Semisextile => 6,
        }
    }

    /// Conventional exact angle in degrees.
    pub fn default_angle(&self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Opposition => 180.0,
            AspectKind::Trine => 120.0,
            AspectKind::Square => 90.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Semisextile => 30.0,
        }
    }

    /// Base orb before the multiplier is applied.
    pub fn default_orb(&self) -> f64 {
        match self {
            AspectKind::Conjunction | AspectKind::Opposition => 8.0,
            AspectKind::Trine => 7.0,
            AspectKind::Square => 6.0,
            AspectKind::Sextile => 4.0,
            AspectKind::Quincunx => 3.0,
            AspectKind::Semisextile => 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Opposition => "opposition",
            AspectKind::Trine => "trine",
            AspectKind::Square => "square",
            AspectKind::Sextile => "sextile",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Semisextile => "semisextile",
        }
    }

    pub fn is_major(&self) -> bool {
        !matches!(self, AspectKind::Quincunx | AspectKind::Semisextile)
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact angle and base orb for one aspect kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    pub angle: f64,
    pub orb: f64,
}

impl AspectDefinition {
    pub fn new(kind: AspectKind, angle: f64, orb: f64) -> Self {
        Self { kind, angle, orb }
    }

    /// Definition with the conventional angle and orb for `kind`.
    pub fn standard(kind: AspectKind) -> Self {
        Self::new(kind, kind.default_angle(), kind.default_orb())
    }
}

/// Orb configuration: aspect definitions scaled by a single multiplier.
///
/// Definitions are held in priority order whatever order they were given
/// in, so classification never depends on caller iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrbConfigRepr", into = "OrbConfigRepr")]
pub struct OrbConfig {
    definitions: Vec<AspectDefinition>,
    multiplier: f64,
}

/// Wire form of [`OrbConfig`]; deserialized values go through
/// [`OrbConfig::new`].
#[derive(Serialize, Deserialize)]
struct OrbConfigRepr {
    definitions: Vec<AspectDefinition>,
    multiplier: f64,
}

impl TryFrom<OrbConfigRepr> for OrbConfig {
    type Error = ChartError;

    fn try_from(value: OrbConfigRepr) -> Result<Self, Self::Error> {
        Self::new(value.definitions, value.multiplier)
    }
}

impl From<OrbConfig> for OrbConfigRepr {
    fn from(value: OrbConfig) -> Self {
        Self {
            definitions: value.definitions,
            multiplier: value.multiplier,
        }
    }
}

impl OrbConfig {
    pub fn new(
        definitions: Vec<AspectDefinition>,
        multiplier: f64,
    ) -> Result<Self, ChartError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ChartError::InvalidOrbConfig(format!(
                "multiplier must be positive, got {}",
                multiplier
            )));
        }
        let mut definitions = definitions;
        definitions.sort_by_key(|def| def.kind.priority());
        for pair in definitions.windows(2) {
            if pair[0].kind == pair[1].kind {
                return Err(ChartError::InvalidOrbConfig(format!(
                    "{} defined more than once",
                    pair[0].kind
                )));
            }
        }
        for def in &definitions {
            if !def.angle.is_finite() || !(0.0..=180.0).contains(&def.angle) {
                return Err(ChartError::InvalidOrbConfig(format!(
                    "{} angle {} is outside [0, 180]",
                    def.kind, def.angle
                )));
            }
            if !def.orb.is_finite() || def.orb < 0.0 {
                return Err(ChartError::InvalidOrbConfig(format!(
                    "{} orb {} is negative or not finite",
                    def.kind, def.orb
                )));
            }
        }
        Ok(Self {
            definitions,
            multiplier,
        })
    }

    /// Same definitions with a different multiplier.
    pub fn with_multiplier(&self, multiplier: f64) -> Result<Self, ChartError> {
        Self::new(self.definitions.clone(), multiplier)
    }

    /// Only the listed kinds, with their current definitions.
    pub fn restricted_to(&self, kinds: &[AspectKind]) -> Self {
        Self {
            definitions: self
                .definitions
                .iter()
                .filter(|def| kinds.contains(&def.kind))
                .copied()
                .collect(),
            multiplier: self.multiplier,
        }
    }

    pub fn definitions(&self) -> &[AspectDefinition] {
        &self.definitions
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn definition(&self, kind: AspectKind) -> Option<&AspectDefinition> {
        self.definitions.iter().find(|def| def.kind == kind)
    }

    /// Orb for `kind` after scaling, if the kind is configured.
    pub fn effective_orb(&self, kind: AspectKind) -> Option<f64> {
        self.definition(kind).map(|def| def.orb * self.multiplier)
    }

    /// Widest effective orb across all definitions.
    pub fn max_orb(&self) -> f64 {
        self.definitions
            .iter()
            .map(|def| def.orb * self.multiplier)
            .fold(0.0, f64::max)
    }
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            definitions: AspectKind::ALL
                .iter()
                .map(|kind| AspectDefinition::standard(*kind))
                .collect(),
            multiplier: 1.0,
        }
    }
}

/// A classified angular relationship between two chart points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub body_a: Body,
    pub body_b: Body,
    pub kind: AspectKind,
    /// Exact angle of the matched definition
    pub exact_angle: f64,
    /// Deviation from the exact angle, >= 0
    pub orb: f64,
    /// Shortest angular distance between the two points, [0, 180]
    pub distance: f64,
    /// `Some(true)` applying, `Some(false)` separating, `None` when a speed
    /// is unknown or the gap is not changing
    pub applying: Option<bool>,
}

impl Aspect {
    pub fn involves(&self, body: Body) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// The other end of the aspect, if `body` is one end.
    pub fn other(&self, body: Body) -> Option<Body> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }

    /// Whether this aspect joins exactly `a` and `b`, in either order.
    pub fn connects(&self, a: Body, b: Body) -> bool {
        (self.body_a == a && self.body_b == b) || (self.body_a == b && self.body_b == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialized_config_is_validated_and_sorted() {
        let json = r#"{
            "definitions": [
                {"kind": "semisextile", "angle": 30.0, "orb": 8.0},
                {"kind": "conjunction", "angle": 0.0, "orb": 30.0}
            ],
            "multiplier": 1.0
        }"#;
        let config: OrbConfig = serde_json::from_str(json).unwrap();
        let kinds: Vec<_> = config.definitions().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![AspectKind::Conjunction, AspectKind::Semisextile]);

        let negative = r#"{"definitions": [], "multiplier": -1.0}"#;
        assert!(serde_json::from_str::<OrbConfig>(negative).is_err());
        let duplicate = r#"{
            "definitions": [
                {"kind": "trine", "angle": 120.0, "orb": 7.0},
                {"kind": "trine", "angle": 120.0, "orb": 5.0}
            ],
            "multiplier": 1.0
        }"#;
        assert!(serde_json::from_str::<OrbConfig>(duplicate).is_err());
    }

    #[test]
    fn serialized_config_reads_back() {
        let config = OrbConfig::default().with_multiplier(0.5).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<OrbConfig>(&json).unwrap(), config);
    }

    #[test]
    fn definitions_sorted_by_priority() {
        let config = OrbConfig::new(
            vec![
                AspectDefinition::standard(AspectKind::Sextile),
                AspectDefinition::standard(AspectKind::Conjunction),
                AspectDefinition::standard(AspectKind::Trine),
            ],
            1.0,
        )
        .unwrap();
        let kinds: Vec<_> = config.definitions().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![AspectKind::Conjunction, AspectKind::Trine, AspectKind::Sextile]
        );
    }

    #[test]
    fn rejects_bad_configuration() {
        let dup = vec![
            AspectDefinition::standard(AspectKind::Trine),
            AspectDefinition::new(AspectKind::Trine, 120.0, 2.0),
        ];
        assert!(OrbConfig::new(dup, 1.0).is_err());
        assert!(OrbConfig::new(vec![], 0.0).is_err());
        assert!(OrbConfig::new(vec![AspectDefinition::new(AspectKind::Square, 200.0, 1.0)], 1.0).is_err());
        assert!(OrbConfig::new(vec![AspectDefinition::new(AspectKind::Square, 90.0, -1.0)], 1.0).is_err());
    }

    #[test]
    fn multiplier_scales_orbs() {
        let config = OrbConfig::default().with_multiplier(0.5).unwrap();
        assert_eq!(config.effective_orb(AspectKind::Conjunction), Some(4.0));
        assert_eq!(config.max_orb(), 4.0);
        let only = config.restricted_to(&[AspectKind::Square]);
        assert_eq!(only.effective_orb(AspectKind::Trine), None);
        assert_eq!(only.effective_orb(AspectKind::Square), Some(3.0));
    }
}

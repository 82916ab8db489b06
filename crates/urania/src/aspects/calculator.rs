use crate::angles::angular_distance;
use crate::aspects::types::{Aspect, AspectKind, OrbConfig};
use crate::ephemeris::CelestialPosition;

/// Look-ahead used to decide applying versus separating (days).
pub const APPLYING_STEP_DAYS: f64 = 0.125;

/// Orb changes smaller than this count as "not moving".
const STATIONARY_EPSILON: f64 = 1e-12;

/// Aspect calculator over a fixed orb configuration.
#[derive(Debug, Clone, Default)]
pub struct AspectCalculator {
    orbs: OrbConfig,
}

/// Classification of one angular distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectMatch {
    pub kind: AspectKind,
    pub exact_angle: f64,
    pub orb: f64,
}

impl AspectCalculator {
    pub fn new(orbs: OrbConfig) -> Self {
        Self { orbs }
    }

    pub fn orbs(&self) -> &OrbConfig {
        &self.orbs
    }

    /// Aspects among one set of positions, each unordered pair once.
    ///
    /// Pairs are visited as `(i, j)` with `i < j` in the caller's order.
    pub fn compute_within(&self, positions: &[CelestialPosition]) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                if a.body == b.body {
                    continue;
                }
                if let Some(aspect) = self.aspect_between(a, b) {
                    aspects.push(aspect);
                }
            }
        }
        aspects
    }

    /// Aspects from every position in `a` to every position in `b`.
    ///
    /// A body may appear in both sets (a transit to its own natal place).
    pub fn compute_between(
        &self,
        a: &[CelestialPosition],
        b: &[CelestialPosition],
    ) -> Vec<Aspect> {
        a.iter()
            .flat_map(|pa| b.iter().filter_map(move |pb| self.aspect_between(pa, pb)))
            .collect()
    }

    /// Aspect between two positions, if any definition matches.
    pub fn aspect_between(&self, a: &CelestialPosition, b: &CelestialPosition) -> Option<Aspect> {
        let distance = angular_distance(a.lon, b.lon);
        let found = self.classify(distance)?;
        Some(Aspect {
            body_a: a.body,
            body_b: b.body,
            kind: found.kind,
            exact_angle: found.exact_angle,
            orb: found.orb,
            distance,
            applying: is_applying(a, b, found.exact_angle, found.orb),
        })
    }

    /// First definition, in priority order, whose window contains `distance`.
    pub fn classify(&self, distance: f64) -> Option<AspectMatch> {
        let multiplier = self.orbs.multiplier();
        self.orbs.definitions().iter().find_map(|def| {
            let orb = (distance - def.angle).abs();
            (orb <= def.orb * multiplier).then_some(AspectMatch {
                kind: def.kind,
                exact_angle: def.angle,
                orb,
            })
        })
    }
}

/// Applying when the orb shrinks over [`APPLYING_STEP_DAYS`].
///
/// Both points are advanced by their own speed, so the answer is the same
/// whichever point is listed first.
fn is_applying(
    a: &CelestialPosition,
    b: &CelestialPosition,
    exact_angle: f64,
    orb: f64,
) -> Option<bool> {
    let (speed_a, speed_b) = (a.speed_lon?, b.speed_lon?);
    let future_distance = angular_distance(
        a.lon + speed_a * APPLYING_STEP_DAYS,
        b.lon + speed_b * APPLYING_STEP_DAYS,
    );
    let future_orb = (future_distance - exact_angle).abs();
    if (future_orb - orb).abs() < STATIONARY_EPSILON {
        None
    } else {
        Some(future_orb < orb)
    }
}

/// Aspects within `a`, or between `a` and `b` when a second set is given.
pub fn compute_aspects(
    a: &[CelestialPosition],
    b: Option<&[CelestialPosition]>,
    orbs: &OrbConfig,
) -> Vec<Aspect> {
    let calculator = AspectCalculator::new(orbs.clone());
    match b {
        Some(b) => calculator.compute_between(a, b),
        None => calculator.compute_within(a),
    }
}

//! Pattern search over an already-classified aspect graph.
//!
//! Bodies are indexed by their position in the caller's roster and every
//! enumeration walks that order, so identical input always yields the same
//! patterns in the same order.

use crate::aspects::{Aspect, AspectKind};
use crate::bodies::Body;
use crate::cancel::CancelFlag;
use crate::error::ChartError;
use crate::patterns::types::AspectPattern;
use std::collections::HashMap;

/// Aspect lookup by roster index pair.
pub struct PatternDetector<'a> {
    roster: Vec<Body>,
    pairs: HashMap<(usize, usize), &'a Aspect>,
}

fn key(i: usize, j: usize) -> (usize, usize) {
    if i < j {
        (i, j)
    } else {
        (j, i)
    }
}

impl<'a> PatternDetector<'a> {
    /// Index `aspects` against `bodies`.
    ///
    /// Aspects touching a body outside the roster are ignored. When two
    /// aspects join the same pair, the first one listed is used.
    pub fn new(aspects: &'a [Aspect], bodies: &[Body]) -> Self {
        let mut roster = Vec::with_capacity(bodies.len());
        let mut index = HashMap::new();
        for body in bodies {
            if !index.contains_key(body) {
                index.insert(*body, roster.len());
                roster.push(*body);
            }
        }

        let mut pairs = HashMap::new();
        for aspect in aspects {
            if let (Some(&i), Some(&j)) = (index.get(&aspect.body_a), index.get(&aspect.body_b)) {
                if i != j {
                    pairs.entry(key(i, j)).or_insert(aspect);
                }
            }
        }
        Self { roster, pairs }
    }

    fn aspect(&self, i: usize, j: usize) -> Option<&'a Aspect> {
        self.pairs.get(&key(i, j)).copied()
    }

    fn kind(&self, i: usize, j: usize) -> Option<AspectKind> {
        self.aspect(i, j).map(|a| a.kind)
    }

    fn is(&self, i: usize, j: usize, kind: AspectKind) -> bool {
        self.kind(i, j) == Some(kind)
    }

    /// Pairs carrying `kind`, in roster order of their first body.
    fn pairs_of(&self, kind: AspectKind) -> Vec<(usize, usize)> {
        let n = self.roster.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.is(i, j, kind))
            .collect()
    }

    /// All patterns, grouped by kind: Yods, T-Squares, Grand Trines,
    /// Grand Crosses, Kites.
    pub fn detect(&self, cancel: &CancelFlag) -> Result<Vec<AspectPattern>, ChartError> {
        let mut patterns = self.yods(cancel)?;
        patterns.extend(self.t_squares(cancel)?);
        let trines = self.grand_trines(cancel)?;
        patterns.extend(trines.iter().map(|&t| self.grand_trine(t)));
        patterns.extend(self.grand_crosses(cancel)?);
        patterns.extend(self.kites(&trines, cancel)?);
        Ok(patterns)
    }

    /// Sextile base with both ends quincunx a common apex.
    pub fn yods(&self, cancel: &CancelFlag) -> Result<Vec<AspectPattern>, ChartError> {
        self.apex_patterns(AspectKind::Sextile, AspectKind::Quincunx, cancel, |base, apex, aspects| {
            AspectPattern::Yod {
                base,
                apex,
                aspects,
            }
        })
    }

    /// Opposition with both ends square a common apex.
    pub fn t_squares(&self, cancel: &CancelFlag) -> Result<Vec<AspectPattern>, ChartError> {
        self.apex_patterns(AspectKind::Opposition, AspectKind::Square, cancel, |opposition, apex, aspects| {
            AspectPattern::TSquare {
                opposition,
                apex,
                aspects,
            }
        })
    }

    fn apex_patterns<F>(
        &self,
        base_kind: AspectKind,
        leg_kind: AspectKind,
        cancel: &CancelFlag,
        build: F,
    ) -> Result<Vec<AspectPattern>, ChartError>
    where
        F: Fn([Body; 2], Body, Vec<Aspect>) -> AspectPattern,
    {
        let mut found = Vec::new();
        for (a, b) in self.pairs_of(base_kind) {
            cancel.checkpoint()?;
            let Some(base) = self.aspect(a, b) else {
                continue;
            };
            for c in 0..self.roster.len() {
                if c == a || c == b {
                    continue;
                }
                if let (Some(ac), Some(bc)) = (self.aspect(a, c), self.aspect(b, c)) {
                    if ac.kind == leg_kind && bc.kind == leg_kind {
                        found.push(build(
                            [self.roster[a], self.roster[b]],
                            self.roster[c],
                            vec![base.clone(), ac.clone(), bc.clone()],
                        ));
                    }
                }
            }
        }
        Ok(found)
    }

    /// Index triples `i < j < k` in mutual trine.
    fn grand_trines(&self, cancel: &CancelFlag) -> Result<Vec<[usize; 3]>, ChartError> {
        let n = self.roster.len();
        let mut found = Vec::new();
        for i in 0..n {
            cancel.checkpoint()?;
            for j in i + 1..n {
                if !self.is(i, j, AspectKind::Trine) {
                    continue;
                }
                for k in j + 1..n {
                    if self.is(i, k, AspectKind::Trine) && self.is(j, k, AspectKind::Trine) {
                        found.push([i, j, k]);
                    }
                }
            }
        }
        Ok(found)
    }

    fn grand_trine(&self, [i, j, k]: [usize; 3]) -> AspectPattern {
        AspectPattern::GrandTrine {
            bodies: [self.roster[i], self.roster[j], self.roster[k]],
            aspects: self.collect(&[(i, j), (i, k), (j, k)]),
        }
    }

    /// Quadruples where two disjoint oppositions are crossed by four squares.
    ///
    /// Every pair inside a Grand Cross is an opposition or a square, so
    /// any other pair prunes the branch before the next index is tried.
    pub fn grand_crosses(&self, cancel: &CancelFlag) -> Result<Vec<AspectPattern>, ChartError> {
        let n = self.roster.len();
        let hard = |i: usize, j: usize| {
            matches!(
                self.kind(i, j),
                Some(AspectKind::Opposition) | Some(AspectKind::Square)
            )
        };
        let mut found = Vec::new();
        for i in 0..n {
            cancel.checkpoint()?;
            for j in i + 1..n {
                if !hard(i, j) {
                    continue;
                }
                for k in j + 1..n {
                    if !hard(i, k) || !hard(j, k) {
                        continue;
                    }
                    for l in k + 1..n {
                        if !hard(i, l) || !hard(j, l) || !hard(k, l) {
                            continue;
                        }
                        if let Some(cycle) = self.cross_cycle([i, j, k, l]) {
                            found.push(self.grand_cross(cycle));
                        }
                    }
                }
            }
        }
        Ok(found)
    }

    /// Order four indices around the cross, if they form one.
    ///
    /// Tries each way of splitting them into two disjoint oppositions, then
    /// requires the four remaining pairs to be squares.
    fn cross_cycle(&self, [i, j, k, l]: [usize; 4]) -> Option<[usize; 4]> {
        let matchings = [((i, j), (k, l)), ((i, k), (j, l)), ((i, l), (j, k))];
        matchings.iter().find_map(|&((a, b), (c, d))| {
            let opposed = self.is(a, b, AspectKind::Opposition)
                && self.is(c, d, AspectKind::Opposition);
            let squared = opposed
                && self.is(a, c, AspectKind::Square)
                && self.is(c, b, AspectKind::Square)
                && self.is(b, d, AspectKind::Square)
                && self.is(d, a, AspectKind::Square);
            squared.then_some([a, c, b, d])
        })
    }

    fn grand_cross(&self, [a, c, b, d]: [usize; 4]) -> AspectPattern {
        AspectPattern::GrandCross {
            bodies: [self.roster[a], self.roster[c], self.roster[b], self.roster[d]],
            aspects: self.collect(&[(a, b), (c, d), (a, c), (c, b), (b, d), (d, a)]),
        }
    }

    /// Each Grand Trine with an apex opposite exactly one vertex and
    /// sextile the other two.
    fn kites(
        &self,
        trines: &[[usize; 3]],
        cancel: &CancelFlag,
    ) -> Result<Vec<AspectPattern>, ChartError> {
        let mut found = Vec::new();
        for &trine in trines {
            cancel.checkpoint()?;
            for apex in 0..self.roster.len() {
                if trine.contains(&apex) {
                    continue;
                }
                let opposed: Vec<usize> = trine
                    .iter()
                    .copied()
                    .filter(|&v| self.is(apex, v, AspectKind::Opposition))
                    .collect();
                let &[vertex] = opposed.as_slice() else {
                    continue;
                };
                let others: Vec<usize> = trine.iter().copied().filter(|&v| v != vertex).collect();
                if others
                    .iter()
                    .all(|&v| self.is(apex, v, AspectKind::Sextile))
                {
                    let [i, j, k] = trine;
                    let mut aspects = self.collect(&[(i, j), (i, k), (j, k), (apex, vertex)]);
                    aspects.extend(self.collect(&[(apex, others[0]), (apex, others[1])]));
                    found.push(AspectPattern::Kite {
                        trine: [self.roster[i], self.roster[j], self.roster[k]],
                        apex: self.roster[apex],
                        opposite: self.roster[vertex],
                        aspects,
                    });
                }
            }
        }
        Ok(found)
    }

    fn collect(&self, pairs: &[(usize, usize)]) -> Vec<Aspect> {
        pairs
            .iter()
            .filter_map(|&(i, j)| self.aspect(i, j).cloned())
            .collect()
    }
}

/// Every pattern among `bodies` supported by `aspects`.
pub fn detect_patterns(aspects: &[Aspect], bodies: &[Body]) -> Vec<AspectPattern> {
    // A fresh flag is never raised, so the search cannot be cancelled
    PatternDetector::new(aspects, bodies)
        .detect(&CancelFlag::new())
        .unwrap_or_default()
}

/// [`detect_patterns`] with a cooperative cancellation signal.
pub fn detect_patterns_cancellable(
    aspects: &[Aspect],
    bodies: &[Body],
    cancel: &CancelFlag,
) -> Result<Vec<AspectPattern>, ChartError> {
    PatternDetector::new(aspects, bodies).detect(cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::{compute_aspects, OrbConfig};
    use crate::ephemeris::CelestialPosition;

    fn chart(points: &[(Body, f64)]) -> (Vec<Aspect>, Vec<Body>) {
        let positions: Vec<_> = points
            .iter()
            .map(|&(body, lon)| CelestialPosition::fixed(body, lon))
            .collect();
        let bodies = points.iter().map(|&(body, _)| body).collect();
        (compute_aspects(&positions, None, &OrbConfig::default()), bodies)
    }

    #[test]
    fn yod_found_once() {
        let (aspects, bodies) = chart(&[
            (Body::Sun, 0.0),
            (Body::Moon, 60.0),
            (Body::Mars, 210.0),
        ]);
        let patterns = detect_patterns(&aspects, &bodies);
        assert_eq!(patterns.len(), 1);
        match &patterns[0] {
            AspectPattern::Yod { base, apex, aspects } => {
                assert_eq!(*base, [Body::Sun, Body::Moon]);
                assert_eq!(*apex, Body::Mars);
                assert_eq!(aspects[0].kind, AspectKind::Sextile);
                assert_eq!(aspects[1].kind, AspectKind::Quincunx);
            }
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn t_square() {
        let (aspects, bodies) = chart(&[
            (Body::Sun, 10.0),
            (Body::Moon, 190.0),
            (Body::Saturn, 100.0),
        ]);
        let patterns = detect_patterns(&aspects, &bodies);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].name(), "t_square");
        assert_eq!(patterns[0].bodies(), vec![Body::Sun, Body::Moon, Body::Saturn]);
    }

    #[test]
    fn grand_cross_contains_four_t_squares() {
        let (aspects, bodies) = chart(&[
            (Body::Sun, 0.0),
            (Body::Moon, 90.0),
            (Body::Mars, 180.0),
            (Body::Venus, 270.0),
        ]);
        let patterns = detect_patterns(&aspects, &bodies);
        let names: Vec<_> = patterns.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["t_square", "t_square", "t_square", "t_square", "grand_cross"]
        );
        match patterns.last() {
            Some(AspectPattern::GrandCross { bodies, aspects }) => {
                assert_eq!(*bodies, [Body::Sun, Body::Moon, Body::Mars, Body::Venus]);
                assert_eq!(aspects.len(), 6);
                assert_eq!(aspects[0].kind, AspectKind::Opposition);
                assert_eq!(aspects[1].kind, AspectKind::Opposition);
                assert!(aspects[2..].iter().all(|a| a.kind == AspectKind::Square));
            }
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn kite_extends_grand_trine() {
        let (aspects, bodies) = chart(&[
            (Body::Sun, 0.0),
            (Body::Moon, 120.0),
            (Body::Jupiter, 240.0),
            (Body::Venus, 180.0),
        ]);
        let patterns = detect_patterns(&aspects, &bodies);
        let kite = patterns
            .iter()
            .find(|p| p.name() == "kite")
            .expect("kite");
        match kite {
            AspectPattern::Kite {
                apex,
                opposite,
                aspects,
                ..
            } => {
                assert_eq!(*apex, Body::Venus);
                assert_eq!(*opposite, Body::Sun);
                assert_eq!(aspects.len(), 6);
            }
            _ => unreachable!(),
        }
        assert_eq!(patterns.iter().filter(|p| p.name() == "grand_trine").count(), 1);
    }

    #[test]
    fn unknown_bodies_are_ignored() {
        let (aspects, _) = chart(&[(Body::Sun, 10.0), (Body::Moon, 130.0), (Body::Mars, 250.0)]);
        assert!(detect_patterns(&aspects, &[Body::Sun, Body::Moon]).is_empty());
    }

    #[test]
    fn cancelled_search_stops() {
        let (aspects, bodies) = chart(&[(Body::Sun, 10.0), (Body::Moon, 130.0), (Body::Mars, 250.0)]);
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = detect_patterns_cancellable(&aspects, &bodies, &cancel);
        assert!(matches!(result, Err(ChartError::Cancelled)));
    }
}

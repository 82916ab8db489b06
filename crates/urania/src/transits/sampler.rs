//! Coarse stage: locate local minima of the orb in a sampled series.

/// Signed distance from an exact aspect point at one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Offset from the window start, days
    pub days: f64,
    /// Longitude minus target, in [-180, 180)
    pub signed: f64,
}

impl Sample {
    pub fn new(days: f64, signed: f64) -> Self {
        Self { days, signed }
    }

    pub fn orb(&self) -> f64 {
        self.signed.abs()
    }
}

/// Three consecutive samples whose middle one is a local orb minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub before: Sample,
    pub at: Sample,
    pub after: Sample,
}

impl Bracket {
    /// The half of the bracket in which the body passes exact, if any.
    pub fn crossing(&self) -> Option<(Sample, Sample)> {
        if crosses_exact(&self.before, &self.at) {
            Some((self.before, self.at))
        } else if crosses_exact(&self.at, &self.after) {
            Some((self.at, self.after))
        } else {
            None
        }
    }
}

/// Whether the body passes the target between two samples.
///
/// A sign flip between values near ±180 is the far side of the circle
/// wrapping, not a pass through the target.
pub fn crosses_exact(a: &Sample, b: &Sample) -> bool {
    let flipped = (a.signed < 0.0 && b.signed >= 0.0) || (a.signed >= 0.0 && b.signed < 0.0);
    flipped && (a.signed - b.signed).abs() < 180.0
}

/// Local minima of the orb that can hold a hit within `max_orb`.
///
/// A sample qualifies when the orb falls into it and does not fall further
/// after it, and it is either within `max_orb` itself or next to a pass
/// through exact.
pub fn find_brackets(samples: &[Sample], max_orb: f64) -> Vec<Bracket> {
    let mut scanner = BracketScanner::new(max_orb);
    for sample in samples {
        scanner.push(*sample);
    }
    scanner.into_brackets()
}

/// [`find_brackets`] over samples that arrive a batch at a time.
///
/// Only the last two samples are held between pushes.
#[derive(Debug, Clone)]
pub struct BracketScanner {
    max_orb: f64,
    previous: Option<(Sample, Option<Sample>)>,
    brackets: Vec<Bracket>,
}

impl BracketScanner {
    pub fn new(max_orb: f64) -> Self {
        Self {
            max_orb,
            previous: None,
            brackets: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.previous = match self.previous {
            None => Some((sample, None)),
            Some((last, None)) => Some((sample, Some(last))),
            Some((last, Some(before))) => {
                let bracket = Bracket {
                    before,
                    at: last,
                    after: sample,
                };
                if self.qualifies(&bracket) {
                    self.brackets.push(bracket);
                }
                Some((sample, Some(last)))
            }
        };
    }

    fn qualifies(&self, bracket: &Bracket) -> bool {
        let minimum =
            bracket.before.orb() > bracket.at.orb() && bracket.at.orb() <= bracket.after.orb();
        let reachable = bracket.at.orb() <= self.max_orb || bracket.crossing().is_some();
        minimum && reachable
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn into_brackets(self) -> Vec<Bracket> {
        self.brackets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i as f64, v))
            .collect()
    }

    #[test]
    fn finds_each_local_minimum() {
        let samples = series(&[-3.0, -1.0, 0.5, 2.0, 1.0, 0.2, 1.5]);
        let brackets = find_brackets(&samples, 1.0);
        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[0].at.days, 2.0);
        assert_eq!(brackets[1].at.days, 5.0);
        assert!(brackets[0].crossing().is_some());
        assert!(brackets[1].crossing().is_none());
    }

    #[test]
    fn wide_minimum_without_crossing_is_skipped() {
        let samples = series(&[5.0, 3.0, 4.0]);
        assert!(find_brackets(&samples, 1.0).is_empty());
    }

    #[test]
    fn wide_sample_next_to_crossing_is_kept() {
        // Fast body: samples straddle exact but both are outside the orb
        let samples = series(&[-6.0, -2.0, 3.0]);
        let brackets = find_brackets(&samples, 1.0);
        assert_eq!(brackets.len(), 1);
        assert_eq!(brackets[0].crossing(), Some((samples[1], samples[2])));
    }

    #[test]
    fn wraparound_is_not_a_crossing() {
        let a = Sample::new(0.0, 179.0);
        let b = Sample::new(1.0, -179.5);
        assert!(!crosses_exact(&a, &b));
        assert!(crosses_exact(&Sample::new(0.0, -0.1), &Sample::new(1.0, 0.1)));
    }

    #[test]
    fn scanner_matches_across_batches() {
        let samples = series(&[-3.0, -1.0, 0.5, 2.0, 1.0, 0.2, 1.5]);
        let mut scanner = BracketScanner::new(1.0);
        for batch in samples.chunks(2) {
            for sample in batch {
                scanner.push(*sample);
            }
        }
        assert_eq!(scanner.brackets(), find_brackets(&samples, 1.0).as_slice());
    }

    #[test]
    fn monotone_series_has_no_brackets() {
        let samples = series(&[-10.0, -8.0, -6.0, -4.0]);
        assert!(find_brackets(&samples, 20.0).is_empty());
    }
}

use crate::angles::normalize_signed;
use crate::aspects::AspectKind;
use crate::bodies::Body;
use crate::cancel::CancelFlag;
use crate::ephemeris::provider::{fetch_one, fetch_series};
use crate::ephemeris::{PositionProvider, TimeWindow};
use crate::error::ChartError;
use crate::transits::refine::refine;
use crate::transits::sampler::{BracketScanner, Sample};
use crate::transits::types::{TransitHit, TransitQuery};
use log::{debug, trace};

/// Instants requested from the provider per round-trip.
pub const SAMPLE_BATCH_SIZE: usize = 256;

/// Minimum number of samples across a window.
const MIN_SAMPLES: usize = 3;

/// Times the passes of a moving body through exact aspect points.
pub struct TransitSearch<'p, P: PositionProvider + ?Sized> {
    provider: &'p P,
    cancel: CancelFlag,
}

impl<'p, P: PositionProvider + ?Sized> TransitSearch<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            cancel: CancelFlag::new(),
        }
    }

    /// Observe `cancel` between batches and between brackets.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Every local orb minimum within `query.max_orb`, in instant order.
    ///
    /// A body that stations can return to the same point several times in
    /// one window; each pass is its own hit. No hits is an empty list.
    pub fn find_hits(&self, query: &TransitQuery) -> Result<Vec<TransitHit>, ChartError> {
        query.validate()?;
        let grid = SampleGrid::new(&query.window, query.body.sample_step_days());
        let targets = query.targets();
        let scanners = self.scan(query, &grid, &targets)?;

        let mut hits = Vec::new();
        for (target, scanner) in targets.iter().copied().zip(scanners) {
            let brackets = scanner.into_brackets();
            debug!(
                "{} {} {:.4}: {} brackets in {} samples",
                query.body,
                query.aspect,
                target,
                brackets.len(),
                grid.len()
            );

            for bracket in &brackets {
                self.cancel.checkpoint()?;
                let refined = refine(bracket, |days| {
                    let instant = query.window.instant_at(days);
                    let pos = fetch_one(self.provider, query.body, instant)?;
                    Ok::<_, ChartError>(normalize_signed(pos.lon - target))
                })?;
                let instant = query.window.instant_at(refined.days);
                if instant < query.window.start || instant >= query.window.end {
                    continue;
                }
                let pos = fetch_one(self.provider, query.body, instant)?;
                let orb = normalize_signed(pos.lon - target).abs();
                trace!(
                    "bracket at day {:.4} refined to day {:.6}, orb {:.8}",
                    bracket.at.days,
                    refined.days,
                    orb
                );
                if orb <= query.max_orb {
                    hits.push(TransitHit {
                        instant,
                        orb,
                        transiting_longitude: pos.lon,
                        is_retrograde: pos.is_retrograde(),
                        target_longitude: target,
                        aspect: query.aspect,
                    });
                }
            }
        }
        hits.sort_by_key(|hit| hit.instant);
        debug!("{} {}: {} hits", query.body, query.aspect, hits.len());
        Ok(hits)
    }

    /// Sample the grid batch by batch, feeding one scanner per target.
    fn scan(
        &self,
        query: &TransitQuery,
        grid: &SampleGrid,
        targets: &[f64],
    ) -> Result<Vec<BracketScanner>, ChartError> {
        let mut scanners: Vec<BracketScanner> = targets
            .iter()
            .map(|_| BracketScanner::new(query.max_orb))
            .collect();
        let mut first = 0;
        while first < grid.len() {
            self.cancel.checkpoint()?;
            let last = (first + SAMPLE_BATCH_SIZE).min(grid.len());
            let offsets: Vec<f64> = (first..last).map(|i| grid.offset(i)).collect();
            let instants: Vec<_> = offsets.iter().map(|&d| query.window.instant_at(d)).collect();
            let positions = fetch_series(self.provider, query.body, &instants)?;
            for (&days, pos) in offsets.iter().zip(&positions) {
                for (scanner, target) in scanners.iter_mut().zip(targets) {
                    scanner.push(Sample::new(days, normalize_signed(pos.lon - target)));
                }
            }
            first = last;
        }
        Ok(scanners)
    }
}

/// Evenly spaced sample offsets in days over a window.
///
/// The grid covers the window start and end, plus one step before the
/// start and one after the end so that a minimum in the first or last
/// step still has a sample on each side. Offsets are computed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    step: f64,
    span: f64,
    /// Whole steps from the start up to the end
    steps: usize,
    /// Whether the end falls between steps and needs its own sample
    ragged_end: bool,
}

impl SampleGrid {
    /// The step is shrunk when the window would otherwise hold fewer than
    /// three samples.
    pub fn new(window: &TimeWindow, step_days: f64) -> Self {
        let span = window.span_days();
        let step = step_days.min(span / (MIN_SAMPLES - 1) as f64);
        let steps = (span / step).floor() as usize;
        Self {
            step,
            span,
            steps,
            ragged_end: span - steps as f64 * step > 1e-9,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.steps + 3 + usize::from(self.ragged_end)
    }

    /// A grid always holds at least five samples.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Offset of sample `index`; the first sample is one step before the
    /// window start.
    pub fn offset(&self, index: usize) -> f64 {
        let interior = self.steps + 1 + usize::from(self.ragged_end);
        match index {
            0 => -self.step,
            i if i <= self.steps + 1 => (i - 1) as f64 * self.step,
            i if i <= interior => self.span,
            _ => self.span + self.step,
        }
    }

    pub fn offsets(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.offset(i))
    }
}

/// Exact-hit instants of `body` making `aspect` to `natal_longitude`
/// within `window`.
pub fn find_transit_hits<P: PositionProvider + ?Sized>(
    provider: &P,
    body: Body,
    aspect: AspectKind,
    natal_longitude: f64,
    window: TimeWindow,
    max_orb: f64,
) -> Result<Vec<TransitHit>, ChartError> {
    let query = TransitQuery::new(body, aspect, natal_longitude, window, max_orb);
    TransitSearch::new(provider).find_hits(&query)
}

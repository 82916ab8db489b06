//! Fine stage: narrow a confirmed bracket down to the instant of closest
//! approach.

use crate::transits::sampler::{Bracket, Sample};

/// Iteration cap for the root search.
pub const MAX_REFINE_ITERATIONS: usize = 30;
/// Stop once the signed distance is this close to zero (degrees).
pub const ORB_TOLERANCE_DEG: f64 = 1e-7;
/// Stop once the root is pinned to this interval (days).
pub const TIME_TOLERANCE_DAYS: f64 = 1e-6;

/// Best estimate of the closest approach inside `bracket`.
///
/// `eval` returns the signed distance at an offset in days. A bracket that
/// passes through exact is solved by regula falsi (Illinois variant);
/// one that only skims the target gets the vertex of the parabola through
/// its three samples. Whichever of the estimate and the bracket's middle
/// sample has the smaller orb is returned.
pub fn refine<F, E>(bracket: &Bracket, mut eval: F) -> Result<Sample, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let estimate = match bracket.crossing() {
        Some((lo, hi)) => regula_falsi(lo, hi, &mut eval)?,
        None => {
            let days = parabolic_vertex(bracket);
            Sample::new(days, eval(days)?)
        }
    };
    if estimate.orb() <= bracket.at.orb() {
        Ok(estimate)
    } else {
        Ok(bracket.at)
    }
}

fn regula_falsi<F, E>(lo: Sample, hi: Sample, eval: &mut F) -> Result<Sample, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let (mut a, mut fa) = (lo.days, lo.signed);
    let (mut b, mut fb) = (hi.days, hi.signed);
    let mut best = if lo.orb() <= hi.orb() { lo } else { hi };
    // Which end moved last: -1 for b, 1 for a
    let mut side = 0;

    for _ in 0..MAX_REFINE_ITERATIONS {
        if (b - a).abs() < TIME_TOLERANCE_DAYS || fb == fa {
            break;
        }
        let c = (a * fb - b * fa) / (fb - fa);
        let fc = eval(c)?;
        let sample = Sample::new(c, fc);
        if sample.orb() < best.orb() {
            best = sample;
        }
        if fc.abs() < ORB_TOLERANCE_DEG {
            break;
        }
        if (fc < 0.0) == (fb < 0.0) {
            b = c;
            fb = fc;
            if side == -1 {
                fa /= 2.0;
            }
            side = -1;
        } else {
            a = c;
            fa = fc;
            if side == 1 {
                fb /= 2.0;
            }
            side = 1;
        }
    }
    Ok(best)
}

/// Abscissa of the vertex of the parabola through the bracket samples,
/// clamped to the bracket. Falls back to the middle sample when the
/// samples are collinear or open downwards.
pub fn parabolic_vertex(bracket: &Bracket) -> f64 {
    let (t0, o0) = (bracket.before.days, bracket.before.orb());
    let (t1, o1) = (bracket.at.days, bracket.at.orb());
    let (t2, o2) = (bracket.after.days, bracket.after.orb());
    let denom = (t0 - t1) * (t0 - t2) * (t1 - t2);
    if denom == 0.0 {
        return t1;
    }
    let a = (t2 * (o1 - o0) + t1 * (o0 - o2) + t0 * (o2 - o1)) / denom;
    let b = (t2 * t2 * (o0 - o1) + t1 * t1 * (o2 - o0) + t0 * t0 * (o1 - o2)) / denom;
    if !a.is_finite() || a <= 0.0 {
        return t1;
    }
    (-b / (2.0 * a)).clamp(t0, t2)
}

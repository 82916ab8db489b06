//! Placidus house division by semi-arc trisection.
//!
//! Cusps 11 and 12 sit one and two thirds of the diurnal semi-arc east of
//! the meridian; cusps 2 and 3 sit two and one thirds of the nocturnal
//! semi-arc west of the lower meridian. Each cusp's semi-arc depends on its
//! own declination, so the right ascension is solved iteratively. Cusps 5,
//! 6, 8 and 9 are the opposites of 11, 12, 2 and 3.
//!
//! Sources: standard spherical astronomy (Meeus ch. 13, Montenbruck &
//! Pfleger).

use crate::angles::{arc_forward, normalize_degrees, signed_delta};

/// Iteration cap per cusp.
pub const MAX_ITERATIONS: usize = 10;
/// Convergence threshold on the right ascension, degrees.
pub const CONVERGENCE_DEG: f64 = 1e-4;

/// Offset for the numerical derivative, degrees.
const DERIVATIVE_STEP_DEG: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntermediateCusp {
    Eleventh,
    Twelfth,
    Second,
    Third,
}

impl IntermediateCusp {
    pub(crate) const ALL: [IntermediateCusp; 4] = [
        IntermediateCusp::Eleventh,
        IntermediateCusp::Twelfth,
        IntermediateCusp::Second,
        IntermediateCusp::Third,
    ];

    /// Zero-based position in the cusp array.
    pub(crate) fn index(&self) -> usize {
        match self {
            IntermediateCusp::Eleventh => 10,
            IntermediateCusp::Twelfth => 11,
            IntermediateCusp::Second => 1,
            IntermediateCusp::Third => 2,
        }
    }

    /// Equal-division starting estimate of the right ascension.
    fn first_guess(&self, ramc: f64) -> f64 {
        let offset = match self {
            IntermediateCusp::Eleventh => 30.0,
            IntermediateCusp::Twelfth => 60.0,
            IntermediateCusp::Second => 120.0,
            IntermediateCusp::Third => 150.0,
        };
        normalize_degrees(ramc + offset)
    }

    /// Right ascension implied by a diurnal semi-arc `dsa` (degrees).
    fn right_ascension(&self, ramc: f64, dsa: f64) -> f64 {
        let nsa = 180.0 - dsa;
        let ra = match self {
            IntermediateCusp::Eleventh => ramc + dsa / 3.0,
            IntermediateCusp::Twelfth => ramc + 2.0 * dsa / 3.0,
            IntermediateCusp::Second => ramc + 180.0 - 2.0 * nsa / 3.0,
            IntermediateCusp::Third => ramc + 180.0 - nsa / 3.0,
        };
        normalize_degrees(ra)
    }
}

/// Declination of the ecliptic point with right ascension `ra`.
///
/// tan δ = sin α · tan ε
pub(crate) fn ecliptic_declination(ra: f64, obliquity: f64) -> f64 {
    (ra.to_radians().sin() * obliquity.to_radians().tan())
        .atan()
        .to_degrees()
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra`.
///
/// λ = atan2(sin α, cos α · cos ε)
pub(crate) fn ecliptic_longitude_of_ra(ra: f64, obliquity: f64) -> f64 {
    let ra = ra.to_radians();
    normalize_degrees(
        ra.sin()
            .atan2(ra.cos() * obliquity.to_radians().cos())
            .to_degrees(),
    )
}

/// Diurnal semi-arc in degrees: acos(−tan φ · tan δ).
///
/// `None` when the point never rises or never sets at this latitude.
pub(crate) fn diurnal_semi_arc(declination: f64, latitude: f64) -> Option<f64> {
    let cos_h = -(latitude.to_radians().tan() * declination.to_radians().tan());
    if !cos_h.is_finite() || cos_h.abs() > 1.0 + 1e-12 {
        return None;
    }
    Some(cos_h.clamp(-1.0, 1.0).acos().to_degrees())
}

/// MC longitude from RAMC: atan2(sin θ, cos θ · cos ε).
pub(crate) fn midheaven(ramc: f64, obliquity: f64) -> f64 {
    ecliptic_longitude_of_ra(ramc, obliquity)
}

/// Ascendant longitude: atan2(cos θ, −(sin θ · cos ε + tan φ · sin ε)).
///
/// Beyond the polar circles the formula can return the western horizon
/// point; the result is kept within the half circle after the MC.
pub(crate) fn ascendant(ramc: f64, obliquity: f64, latitude: f64) -> f64 {
    let theta = ramc.to_radians();
    let eps = obliquity.to_radians();
    let phi = latitude.to_radians();
    let asc = normalize_degrees(
        theta
            .cos()
            .atan2(-(theta.sin() * eps.cos() + phi.tan() * eps.sin()))
            .to_degrees(),
    );
    let mc = midheaven(ramc, obliquity);
    if arc_forward(mc, asc) >= 180.0 {
        normalize_degrees(asc + 180.0)
    } else {
        asc
    }
}

/// Mismatch between a right-ascension estimate and the one it implies.
fn residual(cusp: IntermediateCusp, ra: f64, ramc: f64, obliquity: f64, latitude: f64) -> Option<f64> {
    let dec = ecliptic_declination(ra, obliquity);
    let dsa = diurnal_semi_arc(dec, latitude)?;
    Some(signed_delta(ra, cusp.right_ascension(ramc, dsa)))
}

/// Solve one intermediate cusp.
///
/// Returns the cusp longitude and whether the iteration converged within
/// [`MAX_ITERATIONS`], or `None` when the semi-arc is undefined at some
/// estimate (circumpolar declination).
///
/// Each step is a Newton step on the fixed-point residual; where the
/// residual is flat it degrades to a plain fixed-point step.
pub(crate) fn solve_cusp(
    cusp: IntermediateCusp,
    ramc: f64,
    obliquity: f64,
    latitude: f64,
) -> Option<(f64, bool)> {
    let mut ra = cusp.first_guess(ramc);
    for _ in 0..MAX_ITERATIONS {
        let g = residual(cusp, ra, ramc, obliquity, latitude)?;
        let g_ahead = residual(cusp, ra + DERIVATIVE_STEP_DEG, ramc, obliquity, latitude)?;
        let slope = (g_ahead - g) / DERIVATIVE_STEP_DEG;
        let step = if slope.abs() > 1e-6 { -g / slope } else { g };
        ra = normalize_degrees(ra + step);
        if step.abs() < CONVERGENCE_DEG {
            return Some((ecliptic_longitude_of_ra(ra, obliquity), true));
        }
    }
    Some((ecliptic_longitude_of_ra(ra, obliquity), false))
}

/// Quadrant trisection between the angles.
pub(crate) fn porphyry_cusps(asc: f64, mc: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[9] = mc;
    let upper = arc_forward(mc, asc);
    cusps[10] = normalize_degrees(mc + upper / 3.0);
    cusps[11] = normalize_degrees(mc + 2.0 * upper / 3.0);
    let ic = normalize_degrees(mc + 180.0);
    let lower = arc_forward(asc, ic);
    cusps[1] = normalize_degrees(asc + lower / 3.0);
    cusps[2] = normalize_degrees(asc + 2.0 * lower / 3.0);
    fill_opposites(&mut cusps);
    cusps
}

/// Derive cusps 4-9 from 10-12 and 1-3.
pub(crate) fn fill_opposites(cusps: &mut [f64; 12]) {
    for i in 0..3 {
        cusps[i + 3] = normalize_degrees(cusps[(i + 9) % 12] + 180.0);
        cusps[i + 6] = normalize_degrees(cusps[i] + 180.0);
    }
}

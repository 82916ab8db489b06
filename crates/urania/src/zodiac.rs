//! Zodiac sign placement for ecliptic longitudes.

use crate::angles::normalize_degrees;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const SIGN_ORDER: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// Sign containing an ecliptic longitude.
    pub fn from_longitude(longitude: f64) -> Self {
        SIGN_ORDER[sign_index(longitude)]
    }

    /// Zero-based index, Aries = 0.
    pub fn index(&self) -> usize {
        SIGN_ORDER.iter().position(|s| s == self).unwrap_or(0)
    }
}

fn sign_index(longitude: f64) -> usize {
    ((normalize_degrees(longitude) / 30.0) as usize).min(11)
}

/// A longitude expressed as sign plus degree within the sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZodiacPosition {
    pub sign: Sign,
    /// Degrees into the sign, in [0, 30)
    pub degree_in_sign: f64,
}

impl ZodiacPosition {
    pub fn from_longitude(longitude: f64) -> Self {
        let lon = normalize_degrees(longitude);
        let index = sign_index(lon);
        Self {
            sign: SIGN_ORDER[index],
            degree_in_sign: lon - index as f64 * 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_boundaries() {
        assert_eq!(Sign::from_longitude(0.0), Sign::Aries);
        assert_eq!(Sign::from_longitude(29.999), Sign::Aries);
        assert_eq!(Sign::from_longitude(30.0), Sign::Taurus);
        assert_eq!(Sign::from_longitude(359.9), Sign::Pisces);
        assert_eq!(Sign::from_longitude(-1.0), Sign::Pisces);
    }

    #[test]
    fn degree_in_sign() {
        let pos = ZodiacPosition::from_longitude(135.5);
        assert_eq!(pos.sign, Sign::Leo);
        assert!((pos.degree_in_sign - 15.5).abs() < 1e-12);
    }

    #[test]
    fn sign_index_is_zero_based() {
        assert_eq!(Sign::Aries.index(), 0);
        assert_eq!(Sign::Leo.index(), 4);
        assert_eq!(Sign::Pisces.index(), 11);
    }
}

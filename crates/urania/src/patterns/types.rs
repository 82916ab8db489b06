use crate::aspects::Aspect;
use crate::bodies::Body;
use serde::{Deserialize, Serialize};

/// A named multi-body configuration and the aspects that form it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AspectPattern {
    /// Two bodies in sextile, both quincunx a third
    Yod {
        base: [Body; 2],
        apex: Body,
        /// Sextile, then the two quincunxes
        aspects: Vec<Aspect>,
    },
    /// Two bodies in opposition, both square a third
    TSquare {
        opposition: [Body; 2],
        apex: Body,
        /// Opposition, then the two squares
        aspects: Vec<Aspect>,
    },
    /// Three bodies in mutual trine
    GrandTrine {
        bodies: [Body; 3],
        aspects: Vec<Aspect>,
    },
    /// Four bodies, two oppositions crossed by four squares
    GrandCross {
        /// Listed around the cross, so neighbours are square
        bodies: [Body; 4],
        /// The two oppositions, then the four squares
        aspects: Vec<Aspect>,
    },
    /// A Grand Trine plus an apex opposite one vertex and sextile the others
    Kite {
        trine: [Body; 3],
        apex: Body,
        /// The trine vertex opposed by the apex
        opposite: Body,
        /// The three trines, the opposition, then the two sextiles
        aspects: Vec<Aspect>,
    },
}

impl AspectPattern {
    pub fn name(&self) -> &'static str {
        match self {
            AspectPattern::Yod { .. } => "yod",
            AspectPattern::TSquare { .. } => "t_square",
            AspectPattern::GrandTrine { .. } => "grand_trine",
            AspectPattern::GrandCross { .. } => "grand_cross",
            AspectPattern::Kite { .. } => "kite",
        }
    }

    /// Every body in the pattern.
    pub fn bodies(&self) -> Vec<Body> {
        match self {
            AspectPattern::Yod { base, apex, .. } => vec![base[0], base[1], *apex],
            AspectPattern::TSquare {
                opposition, apex, ..
            } => vec![opposition[0], opposition[1], *apex],
            AspectPattern::GrandTrine { bodies, .. } => bodies.to_vec(),
            AspectPattern::GrandCross { bodies, .. } => bodies.to_vec(),
            AspectPattern::Kite { trine, apex, .. } => {
                vec![trine[0], trine[1], trine[2], *apex]
            }
        }
    }

    pub fn aspects(&self) -> &[Aspect] {
        match self {
            AspectPattern::Yod { aspects, .. }
            | AspectPattern::TSquare { aspects, .. }
            | AspectPattern::GrandTrine { aspects, .. }
            | AspectPattern::GrandCross { aspects, .. }
            | AspectPattern::Kite { aspects, .. } => aspects,
        }
    }
}

pub mod calculator;
pub mod types;

pub use calculator::{compute_aspects, AspectCalculator, AspectMatch, APPLYING_STEP_DAYS};
pub use types::{Aspect, AspectDefinition, AspectKind, OrbConfig};

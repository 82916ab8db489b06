//! Transit timing: a coarse scan for orb minima, then per-bracket
//! refinement.

pub mod refine;
pub mod sampler;
pub mod search;
pub mod types;

pub use refine::refine;
pub use sampler::{find_brackets, Bracket, BracketScanner, Sample};
pub use search::{find_transit_hits, SampleGrid, TransitSearch, SAMPLE_BATCH_SIZE};
pub use types::{TransitHit, TransitQuery};

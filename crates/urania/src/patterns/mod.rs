pub mod detector;
pub mod types;

pub use detector::{detect_patterns, detect_patterns_cancellable, PatternDetector};
pub use types::AspectPattern;

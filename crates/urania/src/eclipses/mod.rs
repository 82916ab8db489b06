pub mod analyzer;
pub mod types;

pub use analyzer::{analyze_eclipse_impacts, EclipseAnalyzer};
pub use types::{AffectedBody, Eclipse, EclipseImpact, EclipseKind};

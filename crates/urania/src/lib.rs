//! Astrological chart facts from raw body positions: Placidus houses,
//! aspects, aspect patterns, transit timing and eclipse impacts.

pub mod angles;
pub mod aspects;
pub mod bodies;
pub mod cancel;
pub mod chart;
pub mod config;
pub mod eclipses;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod patterns;
pub mod task;
pub mod transits;
pub mod zodiac;

pub use angles::{angular_distance, normalize_degrees};
pub use aspects::{compute_aspects, Aspect, AspectDefinition, AspectKind, OrbConfig};
pub use bodies::Body;
pub use cancel::CancelFlag;
pub use chart::{compute_transit_aspects, derive_chart_facts, ChartFacts, NatalChart, Placement};
pub use config::{load_settings, load_settings_from_str, Settings};
pub use eclipses::{analyze_eclipse_impacts, Eclipse, EclipseImpact, EclipseKind};
pub use ephemeris::{CelestialPosition, GeoLocation, PositionProvider, TimeWindow};
pub use error::{ChartError, ProviderError};
pub use houses::{compute_houses, HouseChart, HouseCusps};
pub use patterns::{detect_patterns, AspectPattern};
pub use transits::{find_transit_hits, TransitHit, TransitQuery};
pub use zodiac::{Sign, ZodiacPosition};

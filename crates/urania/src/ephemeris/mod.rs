pub mod provider;
pub mod types;

#[cfg(feature = "swisseph")]
pub mod adapter;

pub use provider::PositionProvider;
pub use types::{days_between, offset_by_days, CelestialPosition, GeoLocation, TimeWindow};

#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisProvider;

//! Profile providers: the per-asset time series that drive the simulation.

/// CSV profile loading and hourly resampling.
pub mod csv;
/// Seeded synthetic profile generators.
pub mod synthetic;
pub mod types;

pub use csv::CsvProfile;
pub use synthetic::SyntheticProfile;
pub use types::{BoundaryPolicy, GapPolicy, Profile, ProfileError, ProfileUnits};

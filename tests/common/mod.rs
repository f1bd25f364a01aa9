//! Shared fixtures for integration tests.

use town_energy_sim::assets::{Asset, AssetKind, StorageController, StorageSpec};
use town_energy_sim::profiles::Profile;
use town_energy_sim::sim::SimGrid;

/// A grid of `intervals` equal slots over one day.
pub fn day_grid(intervals: usize) -> SimGrid {
    SimGrid::new(intervals, 1)
}

/// A flat energy-per-interval asset spanning `intervals`.
pub fn flat_asset(name: &str, kind: AssetKind, kwh: f64, intervals: usize) -> Asset {
    Asset::new(name, kind, Profile::energy_kwh(vec![kwh; intervals]), 1.0)
}

/// A lossless battery with a clean per-interval power limit.
pub fn lossless_battery(
    name: &str,
    capacity_kwh: f64,
    kwh_per_interval: f64,
    grid: &SimGrid,
) -> StorageController {
    let spec = StorageSpec::new(
        name,
        capacity_kwh,
        kwh_per_interval / grid.dt_hours,
        1.0,
        1.0,
    );
    StorageController::new(&spec, grid)
}

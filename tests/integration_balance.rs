//! End-to-end balance properties on hand-checkable systems.

mod common;

use common::{day_grid, flat_asset, lossless_battery};
use town_energy_sim::assets::{AssetKind, StorageController, StorageSpec};
use town_energy_sim::sim::{BalanceError, EnergySystem};

#[test]
fn net_load_decomposes_into_components() {
    let grid = day_grid(8);
    let assets = vec![
        flat_asset("homes", AssetKind::DomesticLoad, 12.0, 8),
        flat_asset("shops", AssetKind::NonDomesticLoad, 4.0, 8),
        flat_asset("pv", AssetKind::Pv, 6.0, 8),
    ];
    let bat = lossless_battery("bat", 20.0, 4.0, &grid);
    let mut system = EnergySystem::new(assets, vec![bat], grid);
    let outcome = system.balance().unwrap();

    for t in 0..8 {
        let recomposed = outcome.non_dispatchable_total[t] + outcome.dispatchable_net[t];
        assert!((outcome.net_load[t] - recomposed).abs() < 1e-12);
    }
    // 12 + 4 - 6 = 10 kWh deficit before storage
    assert_eq!(outcome.non_dispatchable_total, vec![10.0; 8]);
}

#[test]
fn storage_never_overshoots_a_deficit() {
    // discharge is clamped to the residual, so net load never goes negative
    // from a positive residual
    let grid = day_grid(6);
    let load = flat_asset("homes", AssetKind::DomesticLoad, 2.0, 6);
    let big = lossless_battery("oversized", 1000.0, 500.0, &grid);
    let mut system = EnergySystem::new(vec![load], vec![big], grid);
    let outcome = system.balance().unwrap();
    for &v in &outcome.net_load {
        assert!(v.abs() < 1e-12);
    }
}

#[test]
fn surplus_charges_then_deficit_discharges() {
    let grid = day_grid(4);
    let assets = vec![
        flat_asset("homes", AssetKind::DomesticLoad, 5.0, 4),
        town_energy_sim::assets::Asset::new(
            "pv",
            AssetKind::Pv,
            town_energy_sim::profiles::Profile::energy_kwh(vec![15.0, 15.0, 0.0, 0.0]),
            1.0,
        ),
    ];
    // start empty so the morning surplus has somewhere to go
    let spec = StorageSpec::new("bat", 30.0, 10.0 / grid.dt_hours, 1.0, 1.0)
        .with_initial_fill(0.0);
    let bat = StorageController::new(&spec, &grid);

    let mut system = EnergySystem::new(assets, vec![bat], grid);
    let outcome = system.balance().unwrap();

    // residual [-10, -10, 5, 5]: charge 10+10, then discharge 5+5
    assert_eq!(system.storage[0].output(), &[-10.0, -10.0, 5.0, 5.0]);
    assert_eq!(outcome.net_load, vec![0.0; 4]);
    assert_eq!(system.storage[0].soc(), &[10.0, 20.0, 15.0, 10.0]);
}

#[test]
fn lossy_round_trip_loses_energy_end_to_end() {
    let grid = day_grid(4);
    let assets = vec![town_energy_sim::assets::Asset::new(
        "pv",
        AssetKind::Pv,
        town_energy_sim::profiles::Profile::energy_kwh(vec![10.0, 0.0, 0.0, 0.0]),
        1.0,
    )];
    let spec = StorageSpec::new("bat", 100.0, 10.0 / grid.dt_hours, 0.8, 1.0)
        .with_initial_fill(0.0);
    let bat = StorageController::new(&spec, &grid);
    let mut system = EnergySystem::new(assets, vec![bat], grid);
    system.balance().unwrap();

    // 10 kWh drawn stores 8; nothing to discharge later (no deficit)
    assert_eq!(system.storage[0].output()[0], -10.0);
    assert!((system.storage[0].soc()[0] - 8.0).abs() < 1e-9);
}

#[test]
fn mismatched_asset_aborts_the_whole_run() {
    let grid = day_grid(8);
    let good = flat_asset("homes", AssetKind::DomesticLoad, 1.0, 8);
    let bad = flat_asset("stale pv", AssetKind::Pv, 1.0, 7);
    let mut system = EnergySystem::new(vec![good, bad], Vec::new(), grid);
    match system.balance().unwrap_err() {
        BalanceError::SeriesLength { name, .. } => assert_eq!(name, "stale pv"),
        other => panic!("expected SeriesLength, got {other}"),
    }
}

#[test]
fn merit_order_grants_first_claim_on_surplus() {
    // one interval of surplus smaller than either battery can absorb:
    // the first controller takes all of it
    let grid = day_grid(2);
    let pv = town_energy_sim::assets::Asset::new(
        "pv",
        AssetKind::Pv,
        town_energy_sim::profiles::Profile::energy_kwh(vec![6.0, 0.0]),
        1.0,
    );
    let first = StorageController::new(
        &StorageSpec::new("first", 50.0, 20.0 / grid.dt_hours, 1.0, 1.0).with_initial_fill(0.0),
        &grid,
    );
    let second = StorageController::new(
        &StorageSpec::new("second", 50.0, 20.0 / grid.dt_hours, 1.0, 1.0).with_initial_fill(0.0),
        &grid,
    );
    let mut system = EnergySystem::new(vec![pv], vec![first, second], grid);
    let outcome = system.balance().unwrap();

    assert_eq!(system.storage[0].output()[0], -6.0);
    assert_eq!(system.storage[1].output()[0], 0.0);
    assert_eq!(outcome.net_load, vec![0.0, 0.0]);
}

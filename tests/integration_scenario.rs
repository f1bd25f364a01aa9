//! Scenario-level tests: presets, TOML round trips, and full annual runs.

use std::io::Write as _;
use std::path::PathBuf;

use town_energy_sim::averaging::quintile_daily_means;
use town_energy_sim::config::ScenarioConfig;
use town_energy_sim::io::write_csv;
use town_energy_sim::report::AnnualSummary;
use town_energy_sim::scenario::Scenario;

#[test]
fn town_preset_full_year_run() {
    let mut scenario = Scenario::build(&ScenarioConfig::town()).unwrap();
    let outcome = scenario.run().unwrap();
    assert_eq!(outcome.net_load.len(), 17_520);

    // every storage SoC stays within its capacity
    for c in &scenario.system.storage {
        for &soc in c.soc() {
            assert!((0.0..=c.capacity() + 1e-9).contains(&soc));
        }
        for &out in c.output() {
            assert!(out.abs() <= c.power_limit() + 1e-9);
        }
    }
}

#[test]
fn town_run_is_deterministic() {
    let run = || {
        let mut s = Scenario::build(&ScenarioConfig::town()).unwrap();
        s.run().unwrap().net_load
    };
    assert_eq!(run(), run());
}

#[test]
fn storage_never_increases_imports() {
    // same assets with and without storage: the battery can only shift
    // energy toward deficits, so imports never increase
    let config = ScenarioConfig::town();
    let mut with_storage = Scenario::build(&config).unwrap();
    let net_with = with_storage.run().unwrap().net_load;

    let mut no_storage_cfg = config.clone();
    no_storage_cfg.storage.clear();
    let mut without = Scenario::build(&no_storage_cfg).unwrap();
    let net_without = without.run().unwrap().net_load;

    let imports = |net: &[f64]| net.iter().filter(|v| **v > 0.0).sum::<f64>();
    assert!(imports(&net_with) <= imports(&net_without) + 1e-6);
}

#[test]
fn summary_cost_and_emissions_present_for_town() {
    let mut scenario = Scenario::build(&ScenarioConfig::town()).unwrap();
    let outcome = scenario.run().unwrap();
    let grid = scenario.system.grid().clone();

    let mut summary = AnnualSummary::from_outcome(
        &outcome,
        &scenario.system.assets,
        &scenario.system.storage,
        &grid,
    );
    let market = scenario.market.as_ref().unwrap();
    let cost = market
        .total_cost_gbp(
            &outcome.net_load,
            &scenario.system.assets,
            &scenario.system.storage,
        )
        .unwrap();
    summary = summary.with_cost(cost);
    let emissions = scenario.emissions.as_ref().unwrap();
    summary = summary.with_emissions(emissions.annual_total(&outcome.net_load).unwrap());

    assert!(summary.total_demand_kwh > 0.0);
    assert!(summary.total_generation_kwh > 0.0);
    assert!(summary.annual_cost_gbp.is_some());
    assert!(summary.annual_emissions_t.is_some());
    // import + export partition covers every nonzero net-load interval
    let nonzero: f64 = outcome.net_load.iter().map(|v| v.abs()).sum();
    assert!((summary.imported_kwh + summary.exported_kwh - nonzero).abs() < 1e-6);
}

#[test]
fn quintile_reduction_of_a_full_run() {
    let mut scenario = Scenario::build(&ScenarioConfig::bau()).unwrap();
    let outcome = scenario.run().unwrap();
    let means = quintile_daily_means(&outcome.net_load, 48).unwrap();
    for mean in &means {
        assert_eq!(mean.len(), 48);
        // demand-only scenario: every averaged interval is a net import
        assert!(mean.iter().all(|&v| v >= 0.0));
    }
}

#[test]
fn toml_round_trip_matches_direct_build() {
    let toml = r#"
[simulation]
steps_per_day = 24
days = 10

[[asset]]
name = "homes"
kind = "domestic_load"
count = 100.0
[asset.profile]
source = "sinusoid"
base_kw = 0.5
amp_kw = 0.2
seed = 3

[[storage]]
name = "bat"
capacity_kwh = 10.0
power_kw = 5.0
efficiency = 0.9
units = 4.0
initial_fill = 0.5
"#;
    let config = ScenarioConfig::from_toml_str(toml).unwrap();
    let mut scenario = Scenario::build(&config).unwrap();
    let outcome = scenario.run().unwrap();
    assert_eq!(outcome.net_load.len(), 240);
    assert_eq!(scenario.system.storage[0].capacity(), 40.0);
    assert_eq!(scenario.system.storage[0].initial_soc(), 20.0);
}

#[test]
fn scenario_file_loads_from_disk() {
    let mut path = PathBuf::from(std::env::temp_dir());
    path.push(format!("town_energy_sim_scn_{}.toml", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(b"[simulation]\nsteps_per_day = 12\ndays = 5\n")
        .unwrap();
    drop(f);

    let config = ScenarioConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.simulation.steps_per_day, 12);
    assert_eq!(config.simulation.days, 5);
    std::fs::remove_file(path).ok();
}

#[test]
fn export_covers_every_interval_and_controller() {
    let mut scenario = Scenario::build(&ScenarioConfig::town()).unwrap();
    let outcome = scenario.run().unwrap();
    let grid = scenario.system.grid().clone();

    let mut buf = Vec::new();
    write_csv(&mut buf, &outcome, &scenario.system.storage, &grid).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.contains("net_load_kwh"));
    assert!(header.contains("domestic_batteries_soc_kwh"));
    assert!(header.contains("community_battery_output_kwh"));
    assert_eq!(lines.count(), 17_520);
}

//! Simulator entry point — CLI wiring and scenario-driven balance runs.

use std::path::Path;
use std::process;

use town_energy_sim::averaging::{QUINTILES, quintile_daily_means};
use town_energy_sim::config::ScenarioConfig;
use town_energy_sim::io::export::export_csv;
use town_energy_sim::report::AnnualSummary;
use town_energy_sim::scenario::Scenario;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    export_path: Option<String>,
    quintiles: bool,
}

fn print_help() {
    eprintln!("town-energy-sim — town-scale annual energy balance simulator");
    eprintln!();
    eprintln!("Usage: town-energy-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (town, bau)");
    eprintln!("  --export <path>     Export per-interval results to CSV");
    eprintln!("  --quintiles         Print seasonal mean daily net-load profiles");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the town preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        export_path: None,
        quintiles: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--export" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --export requires a path argument");
                    process::exit(1);
                }
                cli.export_path = Some(args[i].clone());
            }
            "--quintiles" => {
                cli.quintiles = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then the town default
    let config = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::town()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut scenario = match Scenario::build(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let outcome = match scenario.run() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let grid = scenario.system.grid().clone();
    let mut summary = AnnualSummary::from_outcome(
        &outcome,
        &scenario.system.assets,
        &scenario.system.storage,
        &grid,
    );

    if let Some(market) = &scenario.market {
        match market.total_cost_gbp(
            &outcome.net_load,
            &scenario.system.assets,
            &scenario.system.storage,
        ) {
            Ok(cost) => summary = summary.with_cost(cost),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }

    if let Some(emissions) = &scenario.emissions {
        match emissions.annual_total(&outcome.net_load) {
            Ok(t) => summary = summary.with_emissions(t),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        let skipped = emissions.skipped_intervals();
        if skipped > 0 {
            eprintln!("warning: {skipped} carbon intensity samples missing, counted as zero");
        }
    }

    println!("{summary}");

    if cli.quintiles {
        match quintile_daily_means(&outcome.net_load, grid.steps_per_day) {
            Ok(means) => {
                println!("mean daily net load by year-quintile (kWh per interval)");
                for q in 0..QUINTILES {
                    let row: Vec<String> =
                        means[q].iter().map(|v| format!("{v:.1}")).collect();
                    println!("  q{}: {}", q + 1, row.join(" "));
                }
            }
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = cli.export_path {
        if let Err(e) = export_csv(
            Path::new(path),
            &outcome,
            &scenario.system.storage,
            &grid,
        ) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {path}");
    }
}

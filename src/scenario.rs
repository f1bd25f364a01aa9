//! Scenario assembly: turning a validated configuration into a runnable
//! energy system with its evaluators.

use std::fmt;
use std::path::Path;

use crate::assets::nondispatchable::Asset;
use crate::assets::storage::{StorageController, StorageSpec};
use crate::config::{
    ConfigError, IntensityConfig, PriceConfig, ProfileConfig, ScenarioConfig,
};
use crate::emissions::EmissionsEvaluator;
use crate::market::Market;
use crate::profiles::csv::CsvProfile;
use crate::profiles::synthetic::SyntheticProfile;
use crate::profiles::types::{GapPolicy, Profile, ProfileError, ProfileUnits};
use crate::sim::balance::{BalanceOutcome, EnergySystem};
use crate::sim::types::{BalanceError, SimGrid};

/// Errors raised while assembling or running a scenario.
#[derive(Debug)]
pub enum BuildError {
    /// The configuration failed validation.
    Invalid(Vec<ConfigError>),
    /// A source profile could not be loaded.
    Profile(ProfileError),
    /// The balance (or an evaluator) rejected a series.
    Balance(BalanceError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(errors) => {
                writeln!(f, "invalid scenario:")?;
                for e in errors {
                    writeln!(f, "  {e}")?;
                }
                Ok(())
            }
            Self::Profile(e) => write!(f, "{e}"),
            Self::Balance(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<ProfileError> for BuildError {
    fn from(e: ProfileError) -> Self {
        Self::Profile(e)
    }
}

impl From<BalanceError> for BuildError {
    fn from(e: BalanceError) -> Self {
        Self::Balance(e)
    }
}

/// A fully assembled scenario: the energy system plus optional market and
/// emissions evaluators.
#[derive(Debug)]
pub struct Scenario {
    /// The assembled energy system.
    pub system: EnergySystem,
    /// Market evaluator, when the scenario prices grid exchange.
    pub market: Option<Market>,
    /// Emissions evaluator, when the scenario tracks carbon.
    pub emissions: Option<EmissionsEvaluator>,
}

impl Scenario {
    /// Builds a scenario from a configuration, loading any CSV sources.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid, a profile file cannot be
    /// loaded, or a loaded series does not span the simulation horizon.
    pub fn build(config: &ScenarioConfig) -> Result<Self, BuildError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(BuildError::Invalid(errors));
        }

        let grid = SimGrid::new(config.simulation.steps_per_day, config.simulation.days);

        let mut assets = Vec::with_capacity(config.assets.len());
        for a in &config.assets {
            let profile = build_profile(&a.profile, &grid)?;
            let scale = a.count * a.unit_kw;
            assets.push(
                Asset::new(a.name.clone(), a.kind, profile, scale)
                    .with_derate(a.derate)
                    .with_capacity_kw(scale)
                    .with_economics(a.economics),
            );
        }

        let storage = config
            .storage
            .iter()
            .map(|b| {
                let spec = StorageSpec::new(
                    b.name.clone(),
                    b.capacity_kwh,
                    b.power_kw,
                    b.efficiency,
                    b.units,
                )
                .with_initial_fill(b.initial_fill)
                .with_economics(b.economics);
                StorageController::new(&spec, &grid)
            })
            .collect();

        let market = match &config.market {
            Some(m) => {
                let market = match &m.price {
                    PriceConfig::Flat { p_per_kwh } => {
                        Market::new(vec![*p_per_kwh; grid.intervals()], m.export_rate_p_per_kwh)
                    }
                    PriceConfig::Csv {
                        path,
                        column,
                        gap_policy,
                    } => {
                        let raw = load_series(path, *column, *gap_policy)?;
                        Market::from_system_buy_price(
                            &raw,
                            m.bill_energy_fraction,
                            m.export_rate_p_per_kwh,
                        )
                    }
                };
                Some(market)
            }
            None => None,
        };

        let emissions = match &config.emissions {
            Some(e) => {
                let intensity = match &e.intensity {
                    IntensityConfig::Flat { g_per_kwh } => vec![*g_per_kwh; grid.intervals()],
                    IntensityConfig::Csv {
                        path,
                        column,
                        gap_policy,
                    } => load_series(path, *column, *gap_policy)?,
                };
                Some(EmissionsEvaluator::new(intensity, e.loss_fraction))
            }
            None => None,
        };

        Ok(Self {
            system: EnergySystem::new(assets, storage, grid),
            market,
            emissions,
        })
    }

    /// Runs the energy balance.
    pub fn run(&mut self) -> Result<BalanceOutcome, BuildError> {
        Ok(self.system.balance()?)
    }
}

fn build_profile(config: &ProfileConfig, grid: &SimGrid) -> Result<Profile, ProfileError> {
    match config {
        ProfileConfig::Csv {
            path,
            column,
            units,
            gap_policy,
            resample_hourly,
            boundary,
        } => {
            let mut loader = CsvProfile::new(path, *column, *units).with_gap_policy(*gap_policy);
            if *resample_hourly {
                loader = loader.with_hourly_resampling(*boundary);
            }
            loader.load()
        }
        ProfileConfig::Sinusoid {
            base_kw,
            amp_kw,
            phase_rad,
            noise_std,
            seed,
        } => Ok(SyntheticProfile::Sinusoid {
            base_kw: *base_kw,
            amp_kw: *amp_kw,
            phase_rad: *phase_rad,
            noise_std: *noise_std,
            seed: *seed,
        }
        .generate(grid)),
        ProfileConfig::Solar {
            kw_peak,
            sunrise_idx,
            sunset_idx,
            noise_std,
            seed,
        } => Ok(SyntheticProfile::Solar {
            kw_peak: *kw_peak,
            sunrise_idx: *sunrise_idx,
            sunset_idx: *sunset_idx,
            noise_std: *noise_std,
            seed: *seed,
        }
        .generate(grid)),
        ProfileConfig::Constant { kw } => Ok(SyntheticProfile::Constant { kw: *kw }.generate(grid)),
    }
}

/// Loads one raw value series from a CSV column, without unit handling.
fn load_series(path: &str, column: usize, gap_policy: GapPolicy) -> Result<Vec<f64>, ProfileError> {
    let profile = CsvProfile::new(Path::new(path), column, ProfileUnits::PowerKw)
        .with_gap_policy(gap_policy)
        .load()?;
    Ok(profile.samples)
}

//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::assets::types::{AssetEconomics, AssetKind};
use crate::profiles::types::{BoundaryPolicy, GapPolicy, ProfileUnits};

/// Top-level scenario configuration parsed from TOML.
///
/// `[simulation]` has defaults (the nominal half-hourly year); assets and
/// storage are explicit lists because their order is meaningful — storage
/// list order is the merit order. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use a named preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Non-dispatchable assets.
    #[serde(default, rename = "asset")]
    pub assets: Vec<AssetConfig>,
    /// Storage controllers, in merit order.
    #[serde(default, rename = "storage")]
    pub storage: Vec<StorageConfig>,
    /// Optional market evaluation.
    #[serde(default)]
    pub market: Option<MarketConfig>,
    /// Optional emissions evaluation.
    #[serde(default)]
    pub emissions: Option<EmissionsConfig>,
}

/// Simulation timing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of intervals per simulated day (must be > 0).
    pub steps_per_day: usize,
    /// Number of days to simulate (must be > 0).
    pub days: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_day: 48,
            days: 365,
        }
    }
}

/// One non-dispatchable asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    /// Display name used in reports and errors.
    pub name: String,
    /// Classification; determines the aggregation sign.
    pub kind: AssetKind,
    /// Unit count: installations, households, vehicles, pumps.
    pub count: f64,
    /// Per-unit rating in kW (e.g. kWp per installation). The effective
    /// scale is `count * unit_kw`.
    #[serde(default = "one")]
    pub unit_kw: f64,
    /// Derating factor, e.g. lifetime panel degradation.
    #[serde(default = "one")]
    pub derate: f64,
    /// Where the per-unit profile comes from.
    pub profile: ProfileConfig,
    /// Economic attributes.
    #[serde(default)]
    pub economics: AssetEconomics,
}

/// One storage controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Display name used in reports and errors.
    pub name: String,
    /// Usable capacity per unit, kWh.
    pub capacity_kwh: f64,
    /// Power rating per unit, kW.
    pub power_kw: f64,
    /// Efficiency in (0, 1].
    pub efficiency: f64,
    /// Number of units (households, packs, vehicles).
    #[serde(default = "one")]
    pub units: f64,
    /// Initial state of charge fraction in [0, 1].
    #[serde(default = "one")]
    pub initial_fill: f64,
    /// Economic attributes; install cost is per kWh.
    #[serde(default)]
    pub economics: AssetEconomics,
}

/// Profile source for an asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case", deny_unknown_fields)]
pub enum ProfileConfig {
    /// One value column of a CSV file.
    Csv {
        /// File path.
        path: String,
        /// 0-based value column index.
        #[serde(default = "default_column")]
        column: usize,
        /// Unit interpretation of the samples.
        #[serde(default = "default_units")]
        units: ProfileUnits,
        /// Missing-sample policy.
        #[serde(default)]
        gap_policy: GapPolicy,
        /// Whether the source is hourly and must be upsampled.
        #[serde(default)]
        resample_hourly: bool,
        /// Final half-interval policy when resampling.
        #[serde(default)]
        boundary: BoundaryPolicy,
    },
    /// Seeded sinusoidal daily demand.
    Sinusoid {
        /// Baseline power, kW per unit.
        base_kw: f64,
        /// Daily variation amplitude, kW per unit.
        amp_kw: f64,
        /// Phase offset, radians.
        #[serde(default)]
        phase_rad: f64,
        /// Gaussian noise standard deviation, kW per unit.
        #[serde(default)]
        noise_std: f64,
        /// RNG seed.
        #[serde(default)]
        seed: u64,
    },
    /// Seeded half-cosine daylight window.
    Solar {
        /// Peak output, kW per unit.
        kw_peak: f64,
        /// First daylight interval of the day (inclusive).
        sunrise_idx: usize,
        /// First dark interval of the day (exclusive).
        sunset_idx: usize,
        /// Noise standard deviation as a fraction of output.
        #[serde(default)]
        noise_std: f64,
        /// RNG seed.
        #[serde(default)]
        seed: u64,
    },
    /// Flat output.
    Constant {
        /// Power, kW per unit.
        kw: f64,
    },
}

/// Market evaluation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Flat export rate, pence per kWh.
    #[serde(default = "default_export_rate")]
    pub export_rate_p_per_kwh: f64,
    /// Fraction of a retail bill that is energy, used when converting a
    /// raw system-buy-price series.
    #[serde(default = "default_bill_fraction")]
    pub bill_energy_fraction: f64,
    /// Import price source.
    pub price: PriceConfig,
}

/// Import price source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case", deny_unknown_fields)]
pub enum PriceConfig {
    /// Flat time-of-use price in pence per kWh.
    Flat {
        /// Price, p/kWh.
        p_per_kwh: f64,
    },
    /// Raw system buy price in £/MWh from a CSV column, converted via
    /// `/ 10 / bill_energy_fraction`.
    Csv {
        /// File path.
        path: String,
        /// 0-based value column index.
        #[serde(default = "default_column")]
        column: usize,
        /// Missing-sample policy.
        #[serde(default)]
        gap_policy: GapPolicy,
    },
}

/// Emissions evaluation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionsConfig {
    /// Transmission loss fraction in [0, 1).
    #[serde(default = "default_loss_fraction")]
    pub loss_fraction: f64,
    /// Carbon intensity source.
    pub intensity: IntensityConfig,
}

/// Carbon intensity source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case", deny_unknown_fields)]
pub enum IntensityConfig {
    /// Flat intensity in gCO2 per kWh.
    Flat {
        /// Intensity, g/kWh.
        g_per_kwh: f64,
    },
    /// Intensity series from a CSV column, g/kWh.
    Csv {
        /// File path.
        path: String,
        /// 0-based value column index.
        #[serde(default = "default_column")]
        column: usize,
        /// Missing-sample policy.
        #[serde(default)]
        gap_policy: GapPolicy,
    },
}

fn one() -> f64 {
    1.0
}

fn default_column() -> usize {
    1
}

fn default_units() -> ProfileUnits {
    ProfileUnits::PowerKw
}

fn default_export_rate() -> f64 {
    5.5
}

fn default_bill_fraction() -> f64 {
    0.33
}

fn default_loss_fraction() -> f64 {
    0.08
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g. `"simulation.steps_per_day"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["town", "bau"];

    /// The "with energy system" preset: the town's generation and
    /// storage portfolio on synthetic profiles.
    pub fn town() -> Self {
        let mut cfg = Self::bau();
        cfg.assets.extend([
            AssetConfig {
                name: "domestic pv".to_string(),
                kind: AssetKind::Pv,
                count: 1500.0,
                unit_kw: 4.0,
                derate: 1.0,
                profile: ProfileConfig::Solar {
                    kw_peak: 1.0,
                    sunrise_idx: 14,
                    sunset_idx: 38,
                    noise_std: 0.1,
                    seed: 11,
                },
                economics: AssetEconomics {
                    install_cost_p: 150_000.0,
                    maintenance_p_per_year: 10_000.0,
                    ..AssetEconomics::default()
                },
            },
            AssetConfig {
                name: "solar farm".to_string(),
                kind: AssetKind::SolarFarm,
                count: 180.0,
                unit_kw: 4.0,
                derate: 0.85,
                profile: ProfileConfig::Solar {
                    kw_peak: 1.0,
                    sunrise_idx: 14,
                    sunset_idx: 38,
                    noise_std: 0.1,
                    seed: 12,
                },
                economics: AssetEconomics {
                    install_cost_p: 150_000.0,
                    maintenance_p_per_year: 10_000.0,
                    ..AssetEconomics::default()
                },
            },
            AssetConfig {
                name: "hydro".to_string(),
                kind: AssetKind::Hydro,
                count: 1.0,
                unit_kw: 450.0,
                derate: 1.0,
                profile: ProfileConfig::Constant { kw: 1.0 },
                economics: AssetEconomics {
                    maintenance_p_per_year: 10_000_000.0,
                    ..AssetEconomics::default()
                },
            },
        ]);
        cfg.storage = vec![
            StorageConfig {
                name: "domestic batteries".to_string(),
                capacity_kwh: 36.0,
                power_kw: 50.0,
                efficiency: 0.7,
                units: 700.0,
                initial_fill: 1.0,
                economics: AssetEconomics {
                    install_cost_p: 500.0 / (36.0 * 0.8) * 100.0,
                    ..AssetEconomics::default()
                },
            },
            StorageConfig {
                name: "community battery".to_string(),
                capacity_kwh: 36.0,
                power_kw: 50.0,
                efficiency: 0.7,
                units: 200.0,
                initial_fill: 1.0,
                economics: AssetEconomics {
                    install_cost_p: 100.0,
                    ..AssetEconomics::default()
                },
            },
        ];
        cfg
    }

    /// The business-as-usual preset: demand only, no local generation or
    /// storage, for baseline comparison.
    pub fn bau() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            assets: vec![
                AssetConfig {
                    name: "households".to_string(),
                    kind: AssetKind::DomesticLoad,
                    count: 1728.0,
                    unit_kw: 1.0,
                    derate: 1.0,
                    profile: ProfileConfig::Sinusoid {
                        base_kw: 0.45,
                        amp_kw: 0.3,
                        phase_rad: 1.2,
                        noise_std: 0.04,
                        seed: 1,
                    },
                    economics: AssetEconomics::default(),
                },
                AssetConfig {
                    name: "businesses".to_string(),
                    kind: AssetKind::NonDomesticLoad,
                    count: 36.0,
                    unit_kw: 1.0,
                    derate: 1.0,
                    profile: ProfileConfig::Sinusoid {
                        base_kw: 5.0,
                        amp_kw: 3.0,
                        phase_rad: -1.57,
                        noise_std: 0.2,
                        seed: 2,
                    },
                    economics: AssetEconomics::default(),
                },
            ],
            storage: Vec::new(),
            market: Some(MarketConfig {
                export_rate_p_per_kwh: 5.5,
                bill_energy_fraction: 0.33,
                price: PriceConfig::Flat { p_per_kwh: 16.0 },
            }),
            emissions: Some(EmissionsConfig {
                loss_fraction: 0.08,
                intensity: IntensityConfig::Flat { g_per_kwh: 200.0 },
            }),
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "town" => Ok(Self::town()),
            "bau" => Ok(Self::bau()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.steps_per_day == 0 {
            errors.push(ConfigError::new("simulation.steps_per_day", "must be > 0"));
        }
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }

        for (i, a) in self.assets.iter().enumerate() {
            let at = |field: &str| format!("asset[{i}].{field}");
            if a.name.is_empty() {
                errors.push(ConfigError::new(at("name"), "must not be empty"));
            }
            if !(a.count >= 0.0 && a.count.is_finite()) {
                errors.push(ConfigError::new(at("count"), "must be finite and >= 0"));
            }
            if !(a.unit_kw >= 0.0 && a.unit_kw.is_finite()) {
                errors.push(ConfigError::new(at("unit_kw"), "must be finite and >= 0"));
            }
            if !(a.derate >= 0.0 && a.derate <= 1.0) {
                errors.push(ConfigError::new(at("derate"), "must be in [0.0, 1.0]"));
            }
            if let ProfileConfig::Solar {
                sunrise_idx,
                sunset_idx,
                ..
            } = a.profile
            {
                if sunrise_idx >= sunset_idx {
                    errors.push(ConfigError::new(
                        at("profile.sunrise_idx"),
                        "must be < profile.sunset_idx",
                    ));
                }
                if s.steps_per_day > 0 && sunset_idx > s.steps_per_day {
                    errors.push(ConfigError::new(
                        at("profile.sunset_idx"),
                        "must be <= simulation.steps_per_day",
                    ));
                }
            }
        }

        for (i, b) in self.storage.iter().enumerate() {
            let at = |field: &str| format!("storage[{i}].{field}");
            if b.name.is_empty() {
                errors.push(ConfigError::new(at("name"), "must not be empty"));
            }
            if !(b.efficiency > 0.0 && b.efficiency <= 1.0) {
                errors.push(ConfigError::new(at("efficiency"), "must be in (0.0, 1.0]"));
            }
            if !(0.0..=1.0).contains(&b.initial_fill) {
                errors.push(ConfigError::new(at("initial_fill"), "must be in [0.0, 1.0]"));
            }
            if !b.units.is_finite() {
                errors.push(ConfigError::new(at("units"), "must be finite"));
            }
            // non-positive capacity/power is a valid disabled asset, not an error
        }

        if let Some(m) = &self.market {
            if !(m.bill_energy_fraction > 0.0 && m.bill_energy_fraction <= 1.0) {
                errors.push(ConfigError::new(
                    "market.bill_energy_fraction",
                    "must be in (0.0, 1.0]",
                ));
            }
            if !m.export_rate_p_per_kwh.is_finite() {
                errors.push(ConfigError::new(
                    "market.export_rate_p_per_kwh",
                    "must be finite",
                ));
            }
        }

        if let Some(e) = &self.emissions {
            if !(0.0..1.0).contains(&e.loss_fraction) {
                errors.push(ConfigError::new(
                    "emissions.loss_fraction",
                    "must be in [0.0, 1.0)",
                ));
            }
        }

        errors
    }
}

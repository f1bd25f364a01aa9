//! Non-dispatchable assets: exogenous generation and demand.

use crate::profiles::types::{Profile, ProfileUnits};
use crate::sim::types::{BalanceError, SimGrid, check_series};

use super::types::{AssetEconomics, AssetKind};

/// A non-dispatchable asset: a profile, a scale, and a classification.
///
/// The asset's energy series is `profile * scale * derate`, with `dt`
/// applied when the profile is a power trace. Output is a positive
/// magnitude in kWh per interval; the balance engine applies the sign for
/// the asset's [`AssetKind`].
///
/// The computed series is cached on first use so downstream reporting
/// (quintile averages, FiT revenue) reads the same numbers the balance saw.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Display name used in reports and error messages.
    pub name: String,
    /// Classification determining the aggregation sign.
    pub kind: AssetKind,
    profile: Profile,
    /// Multiplier: installation, household, vehicle, or pump count,
    /// times any per-unit rating folded in by the builder.
    pub scale: f64,
    /// Derating factor, e.g. lifetime panel degradation. 1.0 = none.
    pub derate: f64,
    /// Rated capacity in kW, the basis for install-cost accounting.
    pub capacity_kw: f64,
    /// Economic attributes consumed by the market evaluator.
    pub economics: AssetEconomics,
    output: Option<Vec<f64>>,
}

impl Asset {
    /// Creates an asset with unit derating, zero rated capacity, and
    /// default economics.
    pub fn new(name: impl Into<String>, kind: AssetKind, profile: Profile, scale: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            profile,
            scale,
            derate: 1.0,
            capacity_kw: 0.0,
            economics: AssetEconomics::default(),
            output: None,
        }
    }

    /// Sets a derating factor (e.g. `1 - annual_degradation * lifetime`).
    pub fn with_derate(mut self, derate: f64) -> Self {
        self.derate = derate;
        self
    }

    /// Sets the rated capacity used for install-cost accounting.
    pub fn with_capacity_kw(mut self, capacity_kw: f64) -> Self {
        self.capacity_kw = capacity_kw;
        self
    }

    /// Sets the economic attributes.
    pub fn with_economics(mut self, economics: AssetEconomics) -> Self {
        self.economics = economics;
        self
    }

    /// Computes (or returns the cached) energy series in kWh per interval.
    ///
    /// Fails when the profile does not span the horizon or produces a
    /// non-finite sample; the error names this asset.
    pub fn output(&mut self, grid: &SimGrid) -> Result<&[f64], BalanceError> {
        if self.output.is_none() {
            let factor = match self.profile.units {
                ProfileUnits::PowerKw => self.scale * self.derate * grid.dt_hours,
                ProfileUnits::EnergyKwhPerInterval => self.scale * self.derate,
            };
            let series: Vec<f64> = self.profile.samples.iter().map(|v| v * factor).collect();
            check_series(&self.name, &series, grid.intervals())?;
            self.output = Some(series);
        }
        Ok(self.output.as_deref().unwrap_or_default())
    }

    /// The cached energy series, if [`Asset::output`] has run.
    pub fn cached_output(&self) -> Option<&[f64]> {
        self.output.as_deref()
    }
}

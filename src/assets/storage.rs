//! Battery storage: the sequential state-of-charge dispatch policy.

use crate::sim::types::{BalanceError, SimGrid};

use super::types::AssetEconomics;

/// Sizing and policy parameters for one storage controller, before unit
/// scaling. One struct covers every battery role the system models —
/// domestic second-life packs, a community battery, V2G fleets — which
/// differ only in these numbers and the meaning of `units`.
#[derive(Debug, Clone)]
pub struct StorageSpec {
    /// Display name used in reports and error messages.
    pub name: String,
    /// Usable capacity per unit, kWh.
    pub capacity_kwh: f64,
    /// Power rating per unit, kW.
    pub power_kw: f64,
    /// Round-trip efficiency component in (0, 1]. Applied asymmetrically:
    /// charging stores `eff * drawn`, discharging removes `delivered / eff`.
    pub efficiency: f64,
    /// Number of units (households, packs, vehicles).
    pub units: f64,
    /// Initial state of charge as a fraction of capacity, in [0, 1].
    /// 1.0 starts the year full.
    pub initial_fill: f64,
    /// Economic attributes; install cost is per kWh of capacity.
    pub economics: AssetEconomics,
}

impl StorageSpec {
    /// A spec with the given sizing, starting full, default economics.
    pub fn new(
        name: impl Into<String>,
        capacity_kwh: f64,
        power_kw: f64,
        efficiency: f64,
        units: f64,
    ) -> Self {
        Self {
            name: name.into(),
            capacity_kwh,
            power_kw,
            efficiency,
            units,
            initial_fill: 1.0,
            economics: AssetEconomics::default(),
        }
    }

    /// Sets the initial state of charge fraction.
    pub fn with_initial_fill(mut self, initial_fill: f64) -> Self {
        self.initial_fill = initial_fill;
        self
    }

    /// Sets the economic attributes.
    pub fn with_economics(mut self, economics: AssetEconomics) -> Self {
        self.economics = economics;
        self
    }
}

/// Simulates charge/discharge of one storage asset against a residual-load
/// series, enforcing power, capacity, and efficiency constraints.
///
/// Output convention: positive = energy delivered to the system
/// (discharge), negative = energy absorbed from surplus (charge), kWh per
/// interval. The SoC trajectory is written once, left to right, per pass.
///
/// A spec with non-positive capacity or power is a valid "disabled asset":
/// the controller runs and yields all-zero output rather than erroring.
#[derive(Debug, Clone)]
pub struct StorageController {
    /// Display name used in reports and error messages.
    pub name: String,
    capacity: f64,
    power_limit: f64,
    efficiency: f64,
    initial_soc: f64,
    /// Economic attributes; install cost basis is total capacity in kWh.
    pub economics: AssetEconomics,
    soc: Vec<f64>,
    output: Vec<f64>,
}

impl StorageController {
    /// Builds a controller from a spec, scaling capacity by unit count and
    /// power by unit count and interval length.
    ///
    /// # Panics
    ///
    /// Panics if `efficiency` is outside (0, 1] or `initial_fill` is
    /// outside [0, 1]. Non-positive capacity or power is not an error;
    /// it is clamped to zero and the controller becomes a no-op.
    pub fn new(spec: &StorageSpec, grid: &SimGrid) -> Self {
        assert!(
            spec.efficiency > 0.0 && spec.efficiency <= 1.0,
            "efficiency must be in (0, 1]"
        );
        assert!(
            (0.0..=1.0).contains(&spec.initial_fill),
            "initial_fill must be in [0, 1]"
        );

        let capacity = (spec.capacity_kwh * spec.units).max(0.0);
        let power_limit = (spec.power_kw * grid.dt_hours * spec.units).max(0.0);
        let horizon = grid.intervals();
        Self {
            name: spec.name.clone(),
            capacity,
            power_limit,
            efficiency: spec.efficiency,
            initial_soc: spec.initial_fill * capacity,
            economics: spec.economics,
            soc: vec![0.0; horizon],
            output: vec![0.0; horizon],
        }
    }

    /// One full pass over the residual series.
    ///
    /// For each interval, in order: a positive residual is met by
    /// discharging up to the power limit, the residual itself, and the
    /// deliverable energy `eff * soc`; a negative residual charges up to
    /// the power limit, the surplus magnitude, and the acceptable draw
    /// `(capacity - soc) / eff`. SoC stays within `[0, capacity]` by
    /// construction of the clamps.
    ///
    /// Returns the energy delivered (+) or absorbed (−) per interval. The
    /// same series and the SoC trajectory remain readable on the
    /// controller afterwards.
    pub fn step(&mut self, residual: &[f64]) -> Result<&[f64], BalanceError> {
        if residual.len() != self.soc.len() {
            return Err(BalanceError::SeriesLength {
                name: self.name.clone(),
                expected: self.soc.len(),
                actual: residual.len(),
            });
        }

        for (t, &r) in residual.iter().enumerate() {
            let soc_prev = if t == 0 { self.initial_soc } else { self.soc[t - 1] };

            if r > 0.0 {
                // deficit: discharge
                let discharge = self
                    .power_limit
                    .min(r)
                    .min(self.efficiency * soc_prev)
                    .max(0.0);
                self.soc[t] = soc_prev - discharge / self.efficiency;
                self.output[t] = discharge;
            } else if r < 0.0 {
                // surplus: charge
                let charge = self
                    .power_limit
                    .min(-r)
                    .min((self.capacity - soc_prev) / self.efficiency)
                    .max(0.0);
                self.soc[t] = soc_prev + self.efficiency * charge;
                self.output[t] = -charge;
            } else {
                self.soc[t] = soc_prev;
                self.output[t] = 0.0;
            }
        }

        Ok(&self.output)
    }

    /// Total scaled capacity in kWh.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Power limit in kWh per interval.
    pub fn power_limit(&self) -> f64 {
        self.power_limit
    }

    /// State of charge at interval 0 before any dispatch, kWh.
    pub fn initial_soc(&self) -> f64 {
        self.initial_soc
    }

    /// SoC trajectory from the most recent pass, kWh.
    pub fn soc(&self) -> &[f64] {
        &self.soc
    }

    /// Output series from the most recent pass, kWh per interval.
    pub fn output(&self) -> &[f64] {
        &self.output
    }
}

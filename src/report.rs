//! Annual summary figures derived from a balance run.

use std::fmt;

use crate::assets::nondispatchable::Asset;
use crate::assets::storage::StorageController;
use crate::assets::types::FlowDirection;
use crate::sim::balance::BalanceOutcome;
use crate::sim::types::SimGrid;

/// Per-controller storage figures for the summary.
#[derive(Debug, Clone)]
pub struct StorageSummary {
    /// Controller name.
    pub name: String,
    /// Total energy moved in either direction, kWh.
    pub throughput_kwh: f64,
    /// Throughput divided by twice the capacity; one full cycle is a
    /// complete charge plus a complete discharge.
    pub equivalent_cycles: f64,
    /// State of charge at the final interval, kWh.
    pub final_soc_kwh: f64,
}

/// Headline annual figures for one balance run.
#[derive(Debug, Clone)]
pub struct AnnualSummary {
    /// Total demand across all load assets, kWh.
    pub total_demand_kwh: f64,
    /// Total output across all generation assets, kWh.
    pub total_generation_kwh: f64,
    /// Energy imported from the grid (positive net load), kWh.
    pub imported_kwh: f64,
    /// Energy exported to the grid (negative net load), kWh.
    pub exported_kwh: f64,
    /// Largest import power over any interval, kW.
    pub peak_import_kw: f64,
    /// Largest export power over any interval, kW.
    pub peak_export_kw: f64,
    /// Per-controller storage figures, in merit order.
    pub storage: Vec<StorageSummary>,
    /// Annual operating cost in pounds, when a market is configured.
    pub annual_cost_gbp: Option<f64>,
    /// Annual emissions in tonnes CO2, when emissions are configured.
    pub annual_emissions_t: Option<f64>,
}

impl AnnualSummary {
    /// Derives the summary from a completed balance run.
    ///
    /// Assets must have produced output (the balance does this); an asset
    /// with no cached output contributes zero.
    pub fn from_outcome(
        outcome: &BalanceOutcome,
        assets: &[Asset],
        storage: &[StorageController],
        grid: &SimGrid,
    ) -> Self {
        let mut total_demand_kwh = 0.0;
        let mut total_generation_kwh = 0.0;
        for a in assets {
            let energy: f64 = a.cached_output().map_or(0.0, |out| out.iter().sum());
            match a.kind.direction() {
                FlowDirection::Demand => total_demand_kwh += energy,
                FlowDirection::Generation => total_generation_kwh += energy,
            }
        }

        let imported_kwh: f64 = outcome.net_load.iter().filter(|v| **v > 0.0).sum();
        let exported_kwh: f64 = -outcome.net_load.iter().filter(|v| **v < 0.0).sum::<f64>();
        let peak_import_kw = outcome
            .net_load
            .iter()
            .fold(0.0_f64, |m, &v| m.max(v / grid.dt_hours));
        let peak_export_kw = outcome
            .net_load
            .iter()
            .fold(0.0_f64, |m, &v| m.max(-v / grid.dt_hours));

        let storage = storage
            .iter()
            .map(|c| {
                let throughput_kwh: f64 = c.output().iter().map(|v| v.abs()).sum();
                let equivalent_cycles = if c.capacity() > 0.0 {
                    throughput_kwh / (2.0 * c.capacity())
                } else {
                    0.0
                };
                StorageSummary {
                    name: c.name.clone(),
                    throughput_kwh,
                    equivalent_cycles,
                    final_soc_kwh: c.soc().last().copied().unwrap_or(0.0),
                }
            })
            .collect();

        Self {
            total_demand_kwh,
            total_generation_kwh,
            imported_kwh,
            exported_kwh,
            peak_import_kw,
            peak_export_kw,
            storage,
            annual_cost_gbp: None,
            annual_emissions_t: None,
        }
    }

    /// Attaches the annual operating cost.
    pub fn with_cost(mut self, gbp: f64) -> Self {
        self.annual_cost_gbp = Some(gbp);
        self
    }

    /// Attaches the annual emissions total.
    pub fn with_emissions(mut self, tonnes: f64) -> Self {
        self.annual_emissions_t = Some(tonnes);
        self
    }
}

impl fmt::Display for AnnualSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "annual summary")?;
        writeln!(f, "  demand        {:>14.1} kWh", self.total_demand_kwh)?;
        writeln!(f, "  generation    {:>14.1} kWh", self.total_generation_kwh)?;
        writeln!(f, "  imported      {:>14.1} kWh", self.imported_kwh)?;
        writeln!(f, "  exported      {:>14.1} kWh", self.exported_kwh)?;
        writeln!(f, "  peak import   {:>14.1} kW", self.peak_import_kw)?;
        writeln!(f, "  peak export   {:>14.1} kW", self.peak_export_kw)?;
        for s in &self.storage {
            writeln!(
                f,
                "  storage \"{}\": {:.1} kWh throughput, {:.1} cycles, final SoC {:.1} kWh",
                s.name, s.throughput_kwh, s.equivalent_cycles, s.final_soc_kwh
            )?;
        }
        if let Some(cost) = self.annual_cost_gbp {
            writeln!(f, "  annual cost   {cost:>14.2} GBP")?;
        }
        if let Some(t) = self.annual_emissions_t {
            writeln!(f, "  emissions     {t:>14.1} t CO2")?;
        }
        Ok(())
    }
}

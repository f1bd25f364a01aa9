//! Market evaluation: import/export cost, feed-in-tariff revenue, and
//! install-cost accounting over the final net load.

use crate::assets::nondispatchable::Asset;
use crate::assets::storage::StorageController;
use crate::sim::types::{BalanceError, check_series};

/// Pence per £.
const PENCE_PER_POUND: f64 = 100.0;

/// Import/export pricing applied to a net load series.
///
/// Import intervals (net load >= 0) are priced per-interval from the
/// time-of-use series; export intervals are paid a flat rate. All prices
/// in pence per kWh, costs in pence (negative = revenue).
#[derive(Debug, Clone)]
pub struct Market {
    import_price_p_per_kwh: Vec<f64>,
    export_rate_p_per_kwh: f64,
}

impl Market {
    /// Creates a market from a ready-made import price series (p/kWh) and
    /// a flat export rate (p/kWh).
    pub fn new(import_price_p_per_kwh: Vec<f64>, export_rate_p_per_kwh: f64) -> Self {
        Self {
            import_price_p_per_kwh,
            export_rate_p_per_kwh,
        }
    }

    /// Creates a market from a raw system-buy-price series in £/MWh, as
    /// published in settlement data. Converted to p/kWh (`/ 10`) and
    /// grossed up by the fraction of a retail bill that is energy
    /// (`/ bill_energy_fraction`, conventionally 0.33).
    pub fn from_system_buy_price(
        raw_gbp_per_mwh: &[f64],
        bill_energy_fraction: f64,
        export_rate_p_per_kwh: f64,
    ) -> Self {
        let import = raw_gbp_per_mwh
            .iter()
            .map(|v| v / 10.0 / bill_energy_fraction)
            .collect();
        Self::new(import, export_rate_p_per_kwh)
    }

    /// The import price series, p/kWh.
    pub fn import_price(&self) -> &[f64] {
        &self.import_price_p_per_kwh
    }

    /// Per-interval grid cost in pence: import energy priced at the
    /// time-of-use rate, export energy at the flat export rate (net load
    /// negative, rate positive, so exports come out negative — revenue).
    pub fn grid_cost_profile(&self, net_load: &[f64]) -> Result<Vec<f64>, BalanceError> {
        check_series(
            "import price",
            &self.import_price_p_per_kwh,
            net_load.len(),
        )?;
        Ok(net_load
            .iter()
            .zip(&self.import_price_p_per_kwh)
            .map(|(&e, &p)| {
                if e >= 0.0 {
                    e * p
                } else {
                    e * self.export_rate_p_per_kwh
                }
            })
            .collect())
    }

    /// Splits the grid cost into purchased (>= 0) and sold (< 0) series,
    /// both in pence, both spanning the horizon.
    pub fn grid_breakdown(&self, net_load: &[f64]) -> Result<(Vec<f64>, Vec<f64>), BalanceError> {
        let cost = self.grid_cost_profile(net_load)?;
        let purchased = cost.iter().map(|&c| if c >= 0.0 { c } else { 0.0 }).collect();
        let sold = cost.iter().map(|&c| if c < 0.0 { c } else { 0.0 }).collect();
        Ok((purchased, sold))
    }

    /// Total feed-in-tariff revenue in pence: each generation asset's
    /// cached output times its FiT rate. Assets that have not produced
    /// output yet contribute nothing.
    pub fn fit_revenue(&self, assets: &[Asset]) -> f64 {
        assets
            .iter()
            .filter(|a| a.kind.sign() < 0.0)
            .filter_map(|a| {
                a.cached_output()
                    .map(|out| out.iter().sum::<f64>() * a.economics.fit_rate_p_per_kwh)
            })
            .sum()
    }

    /// Total and annualized install cost in pence across assets and
    /// storage. Asset basis is rated kW capacity, storage basis is kWh.
    pub fn install_cost(
        &self,
        assets: &[Asset],
        storage: &[StorageController],
    ) -> (f64, f64) {
        let mut total = 0.0;
        let mut per_year = 0.0;
        for a in assets {
            let cost = a.economics.install_cost_p * a.capacity_kw;
            total += cost;
            per_year += cost / a.economics.lifetime_years;
        }
        for s in storage {
            let cost = s.economics.install_cost_p * s.capacity();
            total += cost;
            per_year += cost / s.economics.lifetime_years;
        }
        (total, per_year)
    }

    /// Total annual maintenance cost in pence across assets and storage.
    pub fn maintenance_cost(&self, assets: &[Asset], storage: &[StorageController]) -> f64 {
        let a: f64 = assets.iter().map(|a| a.economics.maintenance_p_per_year).sum();
        let s: f64 = storage
            .iter()
            .map(|s| s.economics.maintenance_p_per_year)
            .sum();
        a + s
    }

    /// Total annual operating cost in pounds: grid cost, minus FiT
    /// revenue, plus annualized install cost and maintenance.
    pub fn total_cost_gbp(
        &self,
        net_load: &[f64],
        assets: &[Asset],
        storage: &[StorageController],
    ) -> Result<f64, BalanceError> {
        let grid: f64 = self.grid_cost_profile(net_load)?.iter().sum();
        let fit = self.fit_revenue(assets);
        let (_, install_per_year) = self.install_cost(assets, storage);
        let maintenance = self.maintenance_cost(assets, storage);
        Ok((grid - fit + install_per_year + maintenance) / PENCE_PER_POUND)
    }
}

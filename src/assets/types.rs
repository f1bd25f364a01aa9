//! Asset classification and economic attributes.

use std::fmt;

use serde::Deserialize;

/// Closed set of non-dispatchable asset kinds.
///
/// Replaces string tags so that adding a kind is a compile-time decision:
/// every match over `AssetKind` is exhaustive, and an asset that the
/// balance engine does not know how to sign cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Domestic rooftop photovoltaics.
    Pv,
    /// Ground-mounted solar farm.
    SolarFarm,
    /// Run-of-river hydro.
    Hydro,
    /// Household electricity demand.
    DomesticLoad,
    /// Business / school / non-domestic demand.
    NonDomesticLoad,
    /// Electric vehicle charging demand.
    EvLoad,
    /// Heat pump electricity demand.
    HeatPumpLoad,
}

/// Whether an asset injects energy into the system or draws from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Output is subtracted from net load.
    Generation,
    /// Output is added to net load.
    Demand,
}

impl AssetKind {
    /// The flow direction of this kind. Exhaustive by construction.
    pub fn direction(self) -> FlowDirection {
        match self {
            Self::Pv | Self::SolarFarm | Self::Hydro => FlowDirection::Generation,
            Self::DomesticLoad | Self::NonDomesticLoad | Self::EvLoad | Self::HeatPumpLoad => {
                FlowDirection::Demand
            }
        }
    }

    /// Aggregation sign: +1 for demand, -1 for generation.
    pub fn sign(self) -> f64 {
        match self.direction() {
            FlowDirection::Generation => -1.0,
            FlowDirection::Demand => 1.0,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pv => "pv",
            Self::SolarFarm => "solar_farm",
            Self::Hydro => "hydro",
            Self::DomesticLoad => "domestic_load",
            Self::NonDomesticLoad => "non_domestic_load",
            Self::EvLoad => "ev_load",
            Self::HeatPumpLoad => "heat_pump_load",
        };
        f.write_str(s)
    }
}

/// Economic attributes attached to an asset.
///
/// Plain data consumed by the market evaluator, replacing the original
/// shared-defaults inheritance hierarchy. Pence throughout.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetEconomics {
    /// Install cost in pence per unit of rated capacity (kWp or kWh).
    pub install_cost_p: f64,
    /// Expected lifetime in years, for annualizing install cost.
    pub lifetime_years: f64,
    /// Feed-in tariff for generated energy, pence per kWh.
    pub fit_rate_p_per_kwh: f64,
    /// Annual maintenance cost in pence.
    pub maintenance_p_per_year: f64,
}

impl Default for AssetEconomics {
    fn default() -> Self {
        Self {
            install_cost_p: 0.0,
            lifetime_years: 25.0,
            fit_rate_p_per_kwh: 5.24,
            maintenance_p_per_year: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_kinds_are_negative() {
        for kind in [AssetKind::Pv, AssetKind::SolarFarm, AssetKind::Hydro] {
            assert_eq!(kind.direction(), FlowDirection::Generation);
            assert_eq!(kind.sign(), -1.0);
        }
    }

    #[test]
    fn demand_kinds_are_positive() {
        for kind in [
            AssetKind::DomesticLoad,
            AssetKind::NonDomesticLoad,
            AssetKind::EvLoad,
            AssetKind::HeatPumpLoad,
        ] {
            assert_eq!(kind.direction(), FlowDirection::Demand);
            assert_eq!(kind.sign(), 1.0);
        }
    }

    #[test]
    fn kind_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: AssetKind,
        }
        let w: Wrapper = toml::from_str("kind = \"solar_farm\"").unwrap();
        assert_eq!(w.kind, AssetKind::SolarFarm);
    }

    #[test]
    fn unknown_kind_fails_to_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[expect(dead_code)]
            kind: AssetKind,
        }
        assert!(toml::from_str::<Wrapper>("kind = \"fusion\"").is_err());
    }

    #[test]
    fn default_economics_match_shared_defaults() {
        let e = AssetEconomics::default();
        assert_eq!(e.lifetime_years, 25.0);
        assert_eq!(e.fit_rate_p_per_kwh, 5.24);
        assert_eq!(e.install_cost_p, 0.0);
    }
}

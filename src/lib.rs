//! Town-scale annual energy balance simulator.
//!
//! Models a year of half-hourly electricity flows for a small town:
//! non-dispatchable generation and demand are aggregated into a residual
//! load, battery storage is dispatched against it in merit order, and the
//! resulting net load is priced and carbon-accounted.
//!
//! The core sequence lives in [`sim::EnergySystem`]; [`scenario::Scenario`]
//! assembles one from a [`config::ScenarioConfig`] (TOML file or named
//! preset) and [`report::AnnualSummary`] condenses a run into headline
//! figures.

pub mod assets;
pub mod averaging;
pub mod config;
pub mod emissions;
pub mod io;
pub mod market;
pub mod profiles;
pub mod report;
pub mod scenario;
pub mod sim;

//! The energy balance engine: non-dispatchable aggregation followed by
//! merit-order storage dispatch.

use crate::assets::nondispatchable::Asset;
use crate::assets::storage::StorageController;

use super::types::{BalanceError, SimGrid};

/// The three series a balance run produces, each spanning the horizon.
///
/// Sign convention throughout: positive = net consumption, negative = net
/// generation, kWh per interval.
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    /// Residual after aggregation and all storage dispatch.
    pub net_load: Vec<f64>,
    /// Net effect of the storage fleet: `net_load - non_dispatchable_total`.
    pub dispatchable_net: Vec<f64>,
    /// Signed sum of all non-dispatchable assets before storage acted.
    pub non_dispatchable_total: Vec<f64>,
}

/// One energy system: non-dispatchable assets, storage controllers in
/// merit order, and the time grid they share.
///
/// Controller list order is part of the configuration: each controller
/// sees the residual left by the ones before it, and gets first claim on
/// whatever surplus or deficit remains. Exactly one pass per controller,
/// no iteration to convergence.
#[derive(Debug)]
pub struct EnergySystem {
    /// Non-dispatchable generation and demand.
    pub assets: Vec<Asset>,
    /// Storage controllers in merit order.
    pub storage: Vec<StorageController>,
    grid: SimGrid,
}

impl EnergySystem {
    /// Creates a system over the given grid.
    pub fn new(assets: Vec<Asset>, storage: Vec<StorageController>, grid: SimGrid) -> Self {
        Self {
            assets,
            storage,
            grid,
        }
    }

    /// The shared time grid.
    pub fn grid(&self) -> &SimGrid {
        &self.grid
    }

    /// Runs the balance: aggregate non-dispatchables with their
    /// classification sign, then deploy each storage controller in list
    /// order against the current residual.
    ///
    /// Any malformed asset output (wrong length, non-finite sample) aborts
    /// the run; nothing partial is returned.
    pub fn balance(&mut self) -> Result<BalanceOutcome, BalanceError> {
        let horizon = self.grid.intervals();

        // sum non-dispatchable assets, signed by kind
        let mut residual = vec![0.0; horizon];
        for asset in &mut self.assets {
            let sign = asset.kind.sign();
            let output = asset.output(&self.grid)?;
            for (acc, &v) in residual.iter_mut().zip(output) {
                *acc += sign * v;
            }
        }
        let non_dispatchable_total = residual.clone();

        // deploy storage in merit order, each against the current residual
        for controller in &mut self.storage {
            let delivered = controller.step(&residual)?;
            for (acc, &d) in residual.iter_mut().zip(delivered) {
                *acc -= d;
            }
        }

        let net_load = residual;
        let dispatchable_net: Vec<f64> = net_load
            .iter()
            .zip(&non_dispatchable_total)
            .map(|(n, d)| n - d)
            .collect();

        Ok(BalanceOutcome {
            net_load,
            dispatchable_net,
            non_dispatchable_total,
        })
    }
}

//! Energy balance engine and core simulation types.

/// The aggregation and merit-order dispatch engine.
pub mod balance;
pub mod types;

pub use balance::{BalanceOutcome, EnergySystem};
pub use types::{BalanceError, SimGrid};

//! Result output.

/// CSV export of balance results.
pub mod export;

pub use export::{export_csv, write_csv};

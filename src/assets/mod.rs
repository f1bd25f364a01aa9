//! Energy system assets: non-dispatchable generation/demand and storage.

/// Non-dispatchable asset wrapping a profile and a scale.
pub mod nondispatchable;
/// State-of-charge battery controller.
pub mod storage;
pub mod types;

pub use nondispatchable::Asset;
pub use storage::{StorageController, StorageSpec};
pub use types::{AssetEconomics, AssetKind, FlowDirection};

//! Strategic map layer: grid analysis computed off the tick thread
//!
//! Recomputation is expensive and runs in a background worker on its own
//! wall-clock cadence. The tick thread submits cheap world samples, never
//! waits, and reads whichever finished result is newest through a shared
//! latest-version handle.

pub mod grids;
pub mod latest;
pub mod worker;

pub use grids::{WorldSample, StrategicMaps};
pub use latest::Latest;
pub use worker::MapWorkerHandle;

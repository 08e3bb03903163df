//! World state: per-tick observation, unit registry, static type data,
//! queued orders and map queries
//!
//! Everything here is read-only for the duration of a tick except the
//! resource ledger (mutated only by the build layer as it commits spending)
//! and the order sink (appended to by every layer, flushed at end of tick).

pub mod map;
pub mod orders;
pub mod snapshot;
pub mod typedata;
pub mod units;

//! Hierarchical goal state machines
//!
//! The strategic manager holds the long-horizon economic/military posture;
//! the tactical manager holds the current military stance plus an optional
//! target point read by every squad each tick.

pub mod strategic;
pub mod tactical;

pub use strategic::{EconomySnapshot, StrategicGoal, StrategicGoalManager};
pub use tactical::{TacticalGoal, TacticalGoalManager};

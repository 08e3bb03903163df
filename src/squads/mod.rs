//! Squad layer: named unit groups driven by interchangeable controllers
//!
//! Every squad holds member tags and a controller that translates the
//! current tactical goal into concrete orders each tick. The manager owns
//! all squads, keeps their members out of the labor pool, and applies
//! disbands only after the tick's iteration completes.

pub mod controller;
pub mod manager;
pub mod scout;
pub mod squad;

pub use controller::{CombatController, SquadController, SquadVerdict};
pub use manager::SquadManager;
pub use scout::ScoutController;
pub use squad::Squad;

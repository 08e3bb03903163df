//! Overseer - tick-synchronous decision core for a real-time strategy agent
//!
//! Each game tick the pipeline observes the world snapshot, runs stateful
//! sensors over it, re-evaluates strategic and tactical goals, resolves the
//! next step of the active build order under resource and tech constraints,
//! and dispatches squad controllers. All emitted unit commands are queued and
//! flushed as one batch at the end of the tick; nothing blocks mid-tick.

pub mod bot;
pub mod build;
pub mod core;
pub mod goals;
pub mod maps;
pub mod sensors;
pub mod squads;
pub mod world;

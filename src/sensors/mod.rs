//! Sensor layer: stateful detectors over diffed snapshots
//!
//! A sensor remembers what it saw last tick and fires a notification when a
//! tracked condition newly holds. The first tick after construction is
//! always a dry run: state is captured but nothing fires, so a bot joining
//! a game in progress does not receive a spurious burst of "new" events.

pub mod detectors;
pub mod registry;

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::types::UnitTag;
use crate::world::typedata::TypeCatalog;
use crate::world::units::UnitRegistry;

pub use registry::SensorRegistry;

/// Which condition a sensor tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    OwnStructureCompleted,
    OwnMilitaryUnitCompleted,
    OwnMilitaryUnitDied,
    OwnUnitChangedType,
    EnemyUnitSighted,
    EnemyResourceCenterSighted,
}

/// A fired notification: the set of units newly matching the tracked
/// predicate this tick.
#[derive(Debug, Clone)]
pub struct SensorEvent {
    pub kind: SensorKind,
    pub tags: Vec<UnitTag>,
}

/// A stateful per-tick detector.
///
/// `tick` diffs the current registry against the sensor's private remembered
/// state and returns the affected set if the condition newly holds. A tag
/// that vanished without its expected event is treated as "not yet true",
/// never as an error.
pub trait Sensor {
    fn kind(&self) -> SensorKind;
    fn tick(&mut self, units: &UnitRegistry, types: &TypeCatalog) -> Option<SensorEvent>;
}

/// Shared mailbox a subscription delivers into.
///
/// Delivery happens synchronously inside the registry tick; the subscriber
/// drains its inbox during its own tick phase. This replaces handler-list
/// mutation during dispatch with plain data handoff.
#[derive(Debug, Clone, Default)]
pub struct SensorInbox {
    events: Rc<RefCell<Vec<SensorEvent>>>,
}

impl SensorInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, event: SensorEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Take all delivered events, oldest first
    pub fn drain(&self) -> Vec<SensorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

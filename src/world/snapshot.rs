//! Per-tick observation snapshot and the resource spending ledger

use serde::{Deserialize, Serialize};

use crate::core::types::{AbilityId, Alliance, Point2, Tick, UnitTag, UnitTypeId, UpgradeId};

/// A unit's current engine-side order, as observed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObservedOrder {
    pub ability: AbilityId,
}

/// One observed unit as reported by the game engine this tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitObservation {
    pub tag: UnitTag,
    pub type_id: UnitTypeId,
    pub alliance: Alliance,
    pub position: Point2,
    pub health: f32,
    pub energy: f32,
    /// 1.0 means fully constructed/trained
    pub build_progress: f32,
    pub orders: Vec<ObservedOrder>,
    pub buffs: Vec<crate::core::types::BuffId>,
    /// Engine-side hint that this worker is kept aside for construction duty
    pub is_dedicated_builder: bool,
}

impl UnitObservation {
    pub fn is_complete(&self) -> bool {
        self.build_progress >= 1.0
    }
}

/// Read-only view of the game state for one tick.
///
/// Immutable for the duration of the tick; every pipeline stage sees the
/// same snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    pub tick: Tick,
    pub minerals: u32,
    pub vespene: u32,
    pub supply_used: u32,
    pub supply_cap: u32,
    pub units: Vec<UnitObservation>,
    pub completed_upgrades: Vec<UpgradeId>,
}

/// The single mutable resource ledger for one tick.
///
/// Initialized from the observation before the pipeline starts and
/// decremented in place by build steps as they commit spending. Only the
/// build layer touches it, so spending order within a tick follows the
/// fixed pipeline order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceLedger {
    pub minerals: u32,
    pub vespene: u32,
    pub supply_used: u32,
    pub supply_cap: u32,
}

impl ResourceLedger {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            minerals: obs.minerals,
            vespene: obs.vespene,
            supply_used: obs.supply_used,
            supply_cap: obs.supply_cap,
        }
    }

    /// Check affordability without committing
    pub fn can_afford(&self, minerals: u32, vespene: u32, food: u32) -> bool {
        self.minerals >= minerals
            && self.vespene >= vespene
            && self.supply_used + food <= self.supply_cap
    }

    /// Commit spending. Returns false (and deducts nothing) if unaffordable;
    /// a failed spend is transient, never an error.
    pub fn spend(&mut self, minerals: u32, vespene: u32, food: u32) -> bool {
        if !self.can_afford(minerals, vespene, food) {
            return false;
        }
        self.minerals -= minerals;
        self.vespene -= vespene;
        self.supply_used += food;
        true
    }

    /// Free supply remaining on the ledger
    pub fn supply_left(&self) -> u32 {
        self.supply_cap.saturating_sub(self.supply_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_deducts_immediately() {
        let mut ledger = ResourceLedger {
            minerals: 400,
            vespene: 100,
            supply_used: 20,
            supply_cap: 30,
        };
        assert!(ledger.spend(150, 0, 2));
        // The ledger reads M - C immediately after a successful spend
        assert_eq!(ledger.minerals, 250);
        assert_eq!(ledger.supply_used, 22);
    }

    #[test]
    fn test_failed_spend_is_a_no_op() {
        let mut ledger = ResourceLedger {
            minerals: 100,
            vespene: 0,
            supply_used: 10,
            supply_cap: 20,
        };
        assert!(!ledger.spend(150, 0, 0));
        assert_eq!(ledger.minerals, 100);
        // Supply-blocked spend also commits nothing
        assert!(!ledger.spend(50, 0, 11));
        assert_eq!(ledger.minerals, 100);
        assert_eq!(ledger.supply_used, 10);
    }
}

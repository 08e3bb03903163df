//! The concrete sensor implementations
//!
//! Each detector owns a private remembered set (or tag-to-value map for the
//! "changed" detector) and honors the dry-run invariant through `primed`.

use ahash::{AHashMap, AHashSet};

use crate::core::types::{Alliance, UnitTag, UnitTypeId};
use crate::sensors::{Sensor, SensorEvent, SensorKind};
use crate::world::typedata::TypeCatalog;
use crate::world::units::UnitRegistry;

/// Fires when an own structure finishes construction
#[derive(Debug, Default)]
pub struct OwnStructureCompleted {
    known: AHashSet<UnitTag>,
    primed: bool,
}

impl Sensor for OwnStructureCompleted {
    fn kind(&self) -> SensorKind {
        SensorKind::OwnStructureCompleted
    }

    fn tick(&mut self, units: &UnitRegistry, types: &TypeCatalog) -> Option<SensorEvent> {
        let mut fresh = Vec::new();
        for unit in units.iter() {
            if unit.alliance != Alliance::Own || !unit.is_complete() {
                continue;
            }
            let is_structure = types.unit(unit.type_id).map(|d| d.is_structure).unwrap_or(false);
            if is_structure && self.known.insert(unit.tag) {
                fresh.push(unit.tag);
            }
        }
        let kind = self.kind();
        emit(&mut self.primed, kind, fresh)
    }
}

/// Fires when an own military unit finishes training
#[derive(Debug, Default)]
pub struct OwnMilitaryUnitCompleted {
    known: AHashSet<UnitTag>,
    primed: bool,
}

impl Sensor for OwnMilitaryUnitCompleted {
    fn kind(&self) -> SensorKind {
        SensorKind::OwnMilitaryUnitCompleted
    }

    fn tick(&mut self, units: &UnitRegistry, types: &TypeCatalog) -> Option<SensorEvent> {
        let mut fresh = Vec::new();
        for unit in units.iter() {
            if unit.alliance != Alliance::Own || !unit.is_complete() {
                continue;
            }
            let is_military = types.unit(unit.type_id).map(|d| d.is_military).unwrap_or(false);
            if is_military && self.known.insert(unit.tag) {
                fresh.push(unit.tag);
            }
        }
        let kind = self.kind();
        emit(&mut self.primed, kind, fresh)
    }
}

/// Fires when a previously tracked own military unit disappears from the
/// snapshot. Disappearance is the only death signal available; a unit that
/// merely left vision cannot be our own, so absence means death here.
#[derive(Debug, Default)]
pub struct OwnMilitaryUnitDied {
    tracked: AHashSet<UnitTag>,
    primed: bool,
}

impl Sensor for OwnMilitaryUnitDied {
    fn kind(&self) -> SensorKind {
        SensorKind::OwnMilitaryUnitDied
    }

    fn tick(&mut self, units: &UnitRegistry, types: &TypeCatalog) -> Option<SensorEvent> {
        let dead: Vec<UnitTag> = self
            .tracked
            .iter()
            .copied()
            .filter(|tag| !units.contains(*tag))
            .collect();
        for tag in &dead {
            self.tracked.remove(tag);
        }

        for unit in units.iter() {
            if unit.alliance != Alliance::Own {
                continue;
            }
            let is_military = types.unit(unit.type_id).map(|d| d.is_military).unwrap_or(false);
            if is_military {
                self.tracked.insert(unit.tag);
            }
        }

        let kind = self.kind();
        emit(&mut self.primed, kind, dead)
    }
}

/// Fires when a tracked own unit's type diverges from what was remembered,
/// e.g. a command center morphing into an orbital command.
#[derive(Debug, Default)]
pub struct OwnUnitChangedType {
    remembered: AHashMap<UnitTag, UnitTypeId>,
    primed: bool,
}

impl Sensor for OwnUnitChangedType {
    fn kind(&self) -> SensorKind {
        SensorKind::OwnUnitChangedType
    }

    fn tick(&mut self, units: &UnitRegistry, _types: &TypeCatalog) -> Option<SensorEvent> {
        let mut changed = Vec::new();
        for unit in units.iter() {
            if unit.alliance != Alliance::Own {
                continue;
            }
            match self.remembered.insert(unit.tag, unit.type_id) {
                Some(previous) if previous != unit.type_id => changed.push(unit.tag),
                _ => {}
            }
        }
        self.remembered.retain(|tag, _| units.contains(*tag));
        let kind = self.kind();
        emit(&mut self.primed, kind, changed)
    }
}

/// Fires the first time each enemy unit is ever sighted
#[derive(Debug, Default)]
pub struct EnemyUnitSighted {
    seen: AHashSet<UnitTag>,
    primed: bool,
}

impl Sensor for EnemyUnitSighted {
    fn kind(&self) -> SensorKind {
        SensorKind::EnemyUnitSighted
    }

    fn tick(&mut self, units: &UnitRegistry, _types: &TypeCatalog) -> Option<SensorEvent> {
        let mut fresh = Vec::new();
        for unit in units.iter() {
            if unit.alliance == Alliance::Enemy && self.seen.insert(unit.tag) {
                fresh.push(unit.tag);
            }
        }
        // Enemies leaving vision stay in `seen`: the condition is "sighted
        // for the first time", not "currently visible".
        let kind = self.kind();
        emit(&mut self.primed, kind, fresh)
    }
}

/// Fires the first time each enemy town hall is sighted
#[derive(Debug, Default)]
pub struct EnemyResourceCenterSighted {
    seen: AHashSet<UnitTag>,
    primed: bool,
}

impl Sensor for EnemyResourceCenterSighted {
    fn kind(&self) -> SensorKind {
        SensorKind::EnemyResourceCenterSighted
    }

    fn tick(&mut self, units: &UnitRegistry, types: &TypeCatalog) -> Option<SensorEvent> {
        let mut fresh = Vec::new();
        for unit in units.iter() {
            if unit.alliance != Alliance::Enemy {
                continue;
            }
            let is_townhall = types.unit(unit.type_id).map(|d| d.is_townhall).unwrap_or(false);
            if is_townhall && self.seen.insert(unit.tag) {
                fresh.push(unit.tag);
            }
        }
        let kind = self.kind();
        emit(&mut self.primed, kind, fresh)
    }
}

/// Shared dry-run gate: the first tick captures state but never fires.
fn emit(primed: &mut bool, kind: SensorKind, tags: Vec<UnitTag>) -> Option<SensorEvent> {
    if !*primed {
        *primed = true;
        return None;
    }
    if tags.is_empty() {
        return None;
    }
    Some(SensorEvent { kind, tags })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sanity::SanityMonitor;
    use crate::core::types::{Point2, UnitTag};
    use crate::world::snapshot::{Observation, UnitObservation};
    use crate::world::typedata::UnitTypeData;

    fn plain_type(name: &str, military: bool, structure: bool, townhall: bool) -> UnitTypeData {
        UnitTypeData {
            name: name.into(),
            mineral_cost: 0,
            vespene_cost: 0,
            food_required: 0,
            food_provided: 0,
            is_structure: structure,
            is_worker: false,
            is_townhall: townhall,
            is_military: military,
            build_ability: None,
            produced_by: None,
            train_ability: None,
            tech_requirement: None,
        }
    }

    fn catalog() -> TypeCatalog {
        let mut types = TypeCatalog::new();
        types.insert_unit(UnitTypeId(48), plain_type("Marine", true, false, false));
        types.insert_unit(UnitTypeId(19), plain_type("Depot", false, true, false));
        types.insert_unit(UnitTypeId(18), plain_type("CC", false, true, true));
        types.insert_unit(UnitTypeId(132), plain_type("Orbital", false, true, true));
        types
    }

    fn refresh(registry: &mut UnitRegistry, units: Vec<UnitObservation>, tick: u64) {
        let mut sanity = SanityMonitor::new();
        let obs = Observation { tick, units, ..Default::default() };
        registry.refresh(&obs, &mut sanity);
        assert_eq!(sanity.failure_count(), 0);
    }

    fn own_unit(tag: u64, type_id: u32) -> UnitObservation {
        UnitObservation {
            tag: UnitTag(tag),
            type_id: UnitTypeId(type_id),
            alliance: Alliance::Own,
            position: Point2::default(),
            health: 45.0,
            energy: 0.0,
            build_progress: 1.0,
            orders: vec![],
            buffs: vec![],
            is_dedicated_builder: false,
        }
    }

    fn enemy_unit(tag: u64, type_id: u32) -> UnitObservation {
        UnitObservation { alliance: Alliance::Enemy, ..own_unit(tag, type_id) }
    }

    #[test]
    fn test_first_tick_is_a_dry_run() {
        let types = catalog();
        let mut registry = UnitRegistry::new();
        refresh(&mut registry, vec![own_unit(1, 48), enemy_unit(2, 48)], 1);

        let mut completed = OwnMilitaryUnitCompleted::default();
        let mut sighted = EnemyUnitSighted::default();
        // Content is irrelevant: the priming tick never fires
        assert!(completed.tick(&registry, &types).is_none());
        assert!(sighted.tick(&registry, &types).is_none());
    }

    #[test]
    fn test_fires_exactly_once_on_first_appearance() {
        let types = catalog();
        let mut registry = UnitRegistry::new();
        refresh(&mut registry, vec![], 1);

        let mut sensor = EnemyUnitSighted::default();
        assert!(sensor.tick(&registry, &types).is_none()); // dry run

        refresh(&mut registry, vec![enemy_unit(9, 48)], 2);
        let event = sensor.tick(&registry, &types).expect("should fire on first sighting");
        assert_eq!(event.tags, vec![UnitTag(9)]);

        // Same unit still visible: no repeat notification
        refresh(&mut registry, vec![enemy_unit(9, 48)], 3);
        assert!(sensor.tick(&registry, &types).is_none());
    }

    #[test]
    fn test_death_detected_on_disappearance() {
        let types = catalog();
        let mut registry = UnitRegistry::new();
        refresh(&mut registry, vec![own_unit(5, 48)], 1);

        let mut sensor = OwnMilitaryUnitDied::default();
        assert!(sensor.tick(&registry, &types).is_none()); // dry run, captures tag 5

        refresh(&mut registry, vec![], 2);
        let event = sensor.tick(&registry, &types).expect("death should fire");
        assert_eq!(event.tags, vec![UnitTag(5)]);

        // Gone means gone: no repeat
        refresh(&mut registry, vec![], 3);
        assert!(sensor.tick(&registry, &types).is_none());
    }

    #[test]
    fn test_type_change_fires_on_divergence() {
        let types = catalog();
        let mut registry = UnitRegistry::new();
        refresh(&mut registry, vec![own_unit(3, 18)], 1);

        let mut sensor = OwnUnitChangedType::default();
        assert!(sensor.tick(&registry, &types).is_none()); // dry run

        refresh(&mut registry, vec![own_unit(3, 18)], 2);
        assert!(sensor.tick(&registry, &types).is_none()); // unchanged

        // Command center morphs into orbital
        refresh(&mut registry, vec![own_unit(3, 132)], 3);
        let event = sensor.tick(&registry, &types).expect("morph should fire");
        assert_eq!(event.tags, vec![UnitTag(3)]);
    }

    #[test]
    fn test_incomplete_structure_does_not_fire() {
        let types = catalog();
        let mut registry = UnitRegistry::new();
        refresh(&mut registry, vec![], 1);

        let mut sensor = OwnStructureCompleted::default();
        assert!(sensor.tick(&registry, &types).is_none()); // dry run

        let mut depot = own_unit(4, 19);
        depot.build_progress = 0.6;
        refresh(&mut registry, vec![depot], 2);
        assert!(sensor.tick(&registry, &types).is_none());

        refresh(&mut registry, vec![own_unit(4, 19)], 3);
        let event = sensor.tick(&registry, &types).expect("completion should fire");
        assert_eq!(event.tags, vec![UnitTag(4)]);
    }

    #[test]
    fn test_enemy_townhall_sighting() {
        let types = catalog();
        let mut registry = UnitRegistry::new();
        refresh(&mut registry, vec![], 1);

        let mut sensor = EnemyResourceCenterSighted::default();
        assert!(sensor.tick(&registry, &types).is_none()); // dry run

        // A marine is not a resource center
        refresh(&mut registry, vec![enemy_unit(10, 48), enemy_unit(11, 18)], 2);
        let event = sensor.tick(&registry, &types).expect("townhall sighting");
        assert_eq!(event.tags, vec![UnitTag(11)]);
    }
}

//! Unit registry keyed by stable tag
//!
//! Records are refreshed in place each tick so outstanding tag references
//! stay valid; tags that disappear from the snapshot are removed. Only the
//! snapshot-refresh step (which runs before the pipeline) mutates the
//! registry; every other component treats it as read-only for the tick.

use ahash::{AHashMap, AHashSet};

use crate::core::sanity::SanityMonitor;
use crate::core::types::{AbilityId, Alliance, BuffId, Point2, Tick, UnitTag, UnitTypeId, UpgradeId};
use crate::world::snapshot::Observation;
use crate::world::typedata::TypeCatalog;

/// A live unit record, refreshed in place each tick
#[derive(Debug, Clone)]
pub struct Unit {
    pub tag: UnitTag,
    pub type_id: UnitTypeId,
    pub alliance: Alliance,
    pub position: Point2,
    pub health: f32,
    pub energy: f32,
    pub build_progress: f32,
    pub orders: Vec<AbilityId>,
    pub buffs: Vec<BuffId>,
    pub is_dedicated_builder: bool,
    pub last_seen: Tick,
}

impl Unit {
    pub fn is_complete(&self) -> bool {
        self.build_progress >= 1.0
    }

    pub fn is_idle(&self) -> bool {
        self.orders.is_empty()
    }

    /// Is the unit currently executing the given ability?
    pub fn has_order(&self, ability: AbilityId) -> bool {
        self.orders.contains(&ability)
    }

    pub fn has_buff(&self, buff: BuffId) -> bool {
        self.buffs.contains(&buff)
    }
}

/// Filter over registry queries: type set, alliance, completion, idleness.
///
/// All criteria are optional; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub alliance: Option<Alliance>,
    pub types: Option<AHashSet<UnitTypeId>>,
    pub completed_only: bool,
    pub idle_only: bool,
    pub military_only: bool,
}

impl UnitFilter {
    pub fn own() -> Self {
        Self { alliance: Some(Alliance::Own), ..Default::default() }
    }

    pub fn enemy() -> Self {
        Self { alliance: Some(Alliance::Enemy), ..Default::default() }
    }

    pub fn with_type(mut self, type_id: UnitTypeId) -> Self {
        self.types.get_or_insert_with(AHashSet::new).insert(type_id);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed_only = true;
        self
    }

    pub fn idle(mut self) -> Self {
        self.idle_only = true;
        self
    }

    pub fn military(mut self) -> Self {
        self.military_only = true;
        self
    }

    pub fn matches(&self, unit: &Unit, types: &TypeCatalog) -> bool {
        if let Some(alliance) = self.alliance {
            if unit.alliance != alliance {
                return false;
            }
        }
        if let Some(ref wanted) = self.types {
            if !wanted.contains(&unit.type_id) {
                return false;
            }
        }
        if self.completed_only && !unit.is_complete() {
            return false;
        }
        if self.idle_only && !unit.is_idle() {
            return false;
        }
        if self.military_only {
            let military = types.unit(unit.type_id).map(|d| d.is_military).unwrap_or(false);
            if !military {
                return false;
            }
        }
        true
    }
}

/// Registry of all observed units, keyed by stable tag
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: AHashMap<UnitTag, Unit>,
    upgrades: AHashSet<UpgradeId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the registry from this tick's observation.
    ///
    /// Existing records are updated in place, new tags inserted, and tags
    /// absent from the observation removed. A tag appearing twice in one
    /// observation is a sanity failure (the engine guarantees uniqueness);
    /// the later record wins so the tick can continue.
    pub fn refresh(&mut self, obs: &Observation, sanity: &mut SanityMonitor) {
        let mut seen: AHashSet<UnitTag> = AHashSet::with_capacity(obs.units.len());

        for observed in &obs.units {
            if !seen.insert(observed.tag) {
                sanity.fail(format!("duplicate unit tag {:?} in one observation", observed.tag));
            }
            match self.units.get_mut(&observed.tag) {
                Some(unit) => {
                    unit.type_id = observed.type_id;
                    unit.alliance = observed.alliance;
                    unit.position = observed.position;
                    unit.health = observed.health;
                    unit.energy = observed.energy;
                    unit.build_progress = observed.build_progress;
                    unit.orders.clear();
                    unit.orders.extend(observed.orders.iter().map(|o| o.ability));
                    unit.buffs.clear();
                    unit.buffs.extend(observed.buffs.iter().copied());
                    unit.is_dedicated_builder = observed.is_dedicated_builder;
                    unit.last_seen = obs.tick;
                }
                None => {
                    self.units.insert(
                        observed.tag,
                        Unit {
                            tag: observed.tag,
                            type_id: observed.type_id,
                            alliance: observed.alliance,
                            position: observed.position,
                            health: observed.health,
                            energy: observed.energy,
                            build_progress: observed.build_progress,
                            orders: observed.orders.iter().map(|o| o.ability).collect(),
                            buffs: observed.buffs.clone(),
                            is_dedicated_builder: observed.is_dedicated_builder,
                            last_seen: obs.tick,
                        },
                    );
                }
            }
        }

        self.units.retain(|tag, _| seen.contains(tag));

        self.upgrades.clear();
        self.upgrades.extend(obs.completed_upgrades.iter().copied());
    }

    pub fn get(&self, tag: UnitTag) -> Option<&Unit> {
        self.units.get(&tag)
    }

    pub fn contains(&self, tag: UnitTag) -> bool {
        self.units.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// All units matching the filter
    pub fn matching<'a>(
        &'a self,
        filter: &'a UnitFilter,
        types: &'a TypeCatalog,
    ) -> impl Iterator<Item = &'a Unit> {
        self.units.values().filter(move |u| filter.matches(u, types))
    }

    /// Own units of the given type, completed or not
    pub fn count_own(&self, type_id: UnitTypeId) -> usize {
        self.units
            .values()
            .filter(|u| u.alliance == Alliance::Own && u.type_id == type_id)
            .count()
    }

    /// Own, fully constructed units of the given type
    pub fn count_own_completed(&self, type_id: UnitTypeId) -> usize {
        self.units
            .values()
            .filter(|u| u.alliance == Alliance::Own && u.type_id == type_id && u.is_complete())
            .count()
    }

    /// Own workers currently ordered to build the given structure
    ///
    /// Counted alongside placed structures to avoid double-queuing a
    /// structure whose builder is still walking to the site.
    pub fn count_builders_en_route(&self, structure: UnitTypeId, types: &TypeCatalog) -> usize {
        let Some(build_ability) = types.unit(structure).and_then(|d| d.build_ability) else {
            return 0;
        };
        self.units
            .values()
            .filter(|u| u.alliance == Alliance::Own && u.has_order(build_ability))
            .count()
    }

    /// Has this upgrade finished researching?
    pub fn upgrade_done(&self, upgrade: UpgradeId) -> bool {
        self.upgrades.contains(&upgrade)
    }
}

//! Shared fixtures for the integration tests

#![allow(dead_code)]

use overseer::core::config::BotConfig;
use overseer::core::types::{AbilityId, Alliance, Point2, UnitTag, UnitTypeId};
use overseer::world::map::MapInfo;
use overseer::world::snapshot::{Observation, ObservedOrder, UnitObservation};
use overseer::world::typedata::{TypeCatalog, UnitTypeData, UpgradeData};

pub const WORKER_BUILD_HOUSE: AbilityId = AbilityId(319);
pub const WORKER_BUILD_BARRACKS: AbilityId = AbilityId(321);
pub const TRAIN_MARINE: AbilityId = AbilityId(560);
pub const RESEARCH_STIM: AbilityId = AbilityId(730);
pub const STIM: overseer::core::types::UpgradeId = overseer::core::types::UpgradeId(15);

/// Catalog matching the default config's Terran type ids
pub fn terran_catalog(config: &BotConfig) -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog.insert_unit(
        config.worker_type,
        UnitTypeData {
            name: "Worker".into(),
            mineral_cost: 50,
            vespene_cost: 0,
            food_required: 1,
            food_provided: 0,
            is_structure: false,
            is_worker: true,
            is_townhall: false,
            is_military: false,
            build_ability: None,
            produced_by: Some(config.townhall_type),
            train_ability: Some(AbilityId(524)),
            tech_requirement: None,
        },
    );
    catalog.insert_unit(
        config.townhall_type,
        UnitTypeData {
            name: "TownHall".into(),
            mineral_cost: 400,
            vespene_cost: 0,
            food_required: 0,
            food_provided: 15,
            is_structure: true,
            is_worker: false,
            is_townhall: true,
            is_military: false,
            build_ability: Some(AbilityId(318)),
            produced_by: None,
            train_ability: None,
            tech_requirement: None,
        },
    );
    catalog.insert_unit(
        config.house_type,
        UnitTypeData {
            name: "House".into(),
            mineral_cost: 100,
            vespene_cost: 0,
            food_required: 0,
            food_provided: 8,
            is_structure: true,
            is_worker: false,
            is_townhall: false,
            is_military: false,
            build_ability: Some(WORKER_BUILD_HOUSE),
            produced_by: None,
            train_ability: None,
            tech_requirement: None,
        },
    );
    catalog.insert_unit(
        config.production_type,
        UnitTypeData {
            name: "Barracks".into(),
            mineral_cost: 150,
            vespene_cost: 0,
            food_required: 0,
            food_provided: 0,
            is_structure: true,
            is_worker: false,
            is_townhall: false,
            is_military: false,
            build_ability: Some(WORKER_BUILD_BARRACKS),
            produced_by: None,
            train_ability: None,
            tech_requirement: Some(config.house_type),
        },
    );
    catalog.insert_unit(
        config.military_type,
        UnitTypeData {
            name: "Marine".into(),
            mineral_cost: 50,
            vespene_cost: 0,
            food_required: 1,
            food_provided: 0,
            is_structure: false,
            is_worker: false,
            is_townhall: false,
            is_military: true,
            build_ability: None,
            produced_by: Some(config.production_type),
            train_ability: Some(TRAIN_MARINE),
            tech_requirement: Some(config.production_type),
        },
    );
    catalog.insert_upgrade(
        STIM,
        UpgradeData {
            name: "Stimpack".into(),
            mineral_cost: 100,
            vespene_cost: 100,
            researched_by: config.production_type,
            research_ability: RESEARCH_STIM,
        },
    );
    catalog
}

pub fn test_map() -> MapInfo {
    MapInfo {
        width: 64,
        height: 64,
        own_start: Some(Point2::new(12.0, 12.0)),
        main_ramp: Some(Point2::new(18.0, 18.0)),
        natural_site: Some(Point2::new(24.0, 12.0)),
        enemy_base_guess: None,
        build_sites: (0..8)
            .map(|i| Point2::new(8.0 + 2.0 * (i % 4) as f32, 6.0 + 2.0 * (i / 4) as f32))
            .collect(),
    }
}

pub struct UnitBuilder(UnitObservation);

impl UnitBuilder {
    pub fn new(tag: u64, type_id: UnitTypeId) -> Self {
        Self(UnitObservation {
            tag: UnitTag(tag),
            type_id,
            alliance: Alliance::Own,
            position: Point2::new(12.0, 12.0),
            health: 100.0,
            energy: 0.0,
            build_progress: 1.0,
            orders: vec![],
            buffs: vec![],
            is_dedicated_builder: false,
        })
    }

    pub fn enemy(mut self) -> Self {
        self.0.alliance = Alliance::Enemy;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.0.position = Point2::new(x, y);
        self
    }

    pub fn energy(mut self, energy: f32) -> Self {
        self.0.energy = energy;
        self
    }

    pub fn progress(mut self, progress: f32) -> Self {
        self.0.build_progress = progress;
        self
    }

    pub fn ordered(mut self, ability: AbilityId) -> Self {
        self.0.orders.push(ObservedOrder { ability });
        self
    }

    pub fn with_buff(mut self, buff: overseer::core::types::BuffId) -> Self {
        self.0.buffs.push(buff);
        self
    }

    pub fn dedicated_builder(mut self) -> Self {
        self.0.is_dedicated_builder = true;
        self
    }

    pub fn build(self) -> UnitObservation {
        self.0
    }
}

pub struct ObsBuilder(Observation);

impl ObsBuilder {
    pub fn new(tick: u64) -> Self {
        Self(Observation {
            tick,
            minerals: 0,
            vespene: 0,
            supply_used: 0,
            supply_cap: 200,
            units: vec![],
            completed_upgrades: vec![],
        })
    }

    pub fn minerals(mut self, minerals: u32) -> Self {
        self.0.minerals = minerals;
        self
    }

    pub fn vespene(mut self, vespene: u32) -> Self {
        self.0.vespene = vespene;
        self
    }

    pub fn supply(mut self, used: u32, cap: u32) -> Self {
        self.0.supply_used = used;
        self.0.supply_cap = cap;
        self
    }

    pub fn unit(mut self, unit: UnitObservation) -> Self {
        self.0.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = UnitObservation>) -> Self {
        self.0.units.extend(units);
        self
    }

    pub fn upgrade_done(mut self, upgrade: overseer::core::types::UpgradeId) -> Self {
        self.0.completed_upgrades.push(upgrade);
        self
    }

    pub fn build(self) -> Observation {
        self.0
    }
}

/// A townhall plus `workers` workers, the usual game opening
pub fn starting_base(config: &BotConfig, workers: u64) -> Vec<UnitObservation> {
    let mut units = vec![UnitBuilder::new(1, config.townhall_type).energy(100.0).build()];
    for i in 0..workers {
        units.push(UnitBuilder::new(10 + i, config.worker_type).build());
    }
    units
}

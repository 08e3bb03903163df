//! Headless scripted run of the decision core
//!
//! Drives the pipeline against a tiny built-in world model: income trickles
//! in, accepted build/train commands complete after a fixed delay, and a
//! scattered enemy base sits in the far corner. Useful for watching goal
//! transitions and build-order pacing in the log without a game attached.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use overseer::bot::Overseer;
use overseer::core::config::BotConfig;
use overseer::core::types::{AbilityId, Alliance, Point2, UnitTag, UnitTypeId};
use overseer::world::map::MapInfo;
use overseer::world::orders::CommandTarget;
use overseer::world::snapshot::{Observation, UnitObservation};
use overseer::world::typedata::{TypeCatalog, UnitTypeData};

const TICKS: u64 = 8000;
const BUILD_DELAY: u64 = 60;
const TRAIN_DELAY: u64 = 40;

fn terran_catalog(config: &BotConfig) -> TypeCatalog {
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
            build_ability: Some(AbilityId(319)),
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
            build_ability: Some(AbilityId(321)),
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
            train_ability: Some(AbilityId(560)),
            tech_requirement: Some(config.production_type),
        },
    );
    catalog
}

struct SimUnit {
    tag: UnitTag,
    type_id: UnitTypeId,
    alliance: Alliance,
    position: Point2,
}

/// Queued production job inside the toy world
struct Job {
    type_id: UnitTypeId,
    position: Point2,
    done_at: u64,
    /// Worker or producer executing the job; its order stays visible in
    /// observations until the job finishes
    worker: UnitTag,
    ability: AbilityId,
}

struct SimWorld {
    units: Vec<SimUnit>,
    jobs: Vec<Job>,
    minerals: u32,
    next_tag: u64,
    catalog: TypeCatalog,
}

impl SimWorld {
    fn spawn(&mut self, type_id: UnitTypeId, alliance: Alliance, position: Point2) -> UnitTag {
        let tag = UnitTag(self.next_tag);
        self.next_tag += 1;
        self.units.push(SimUnit { tag, type_id, alliance, position });
        tag
    }

    fn observe(&self, tick: u64) -> Observation {
        let mut supply_cap = 0;
        let mut supply_used = 0;
        let units = self
            .units
            .iter()
            .map(|u| {
                if u.alliance == Alliance::Own {
                    if let Some(data) = self.catalog.unit(u.type_id) {
                        supply_cap += data.food_provided;
                        supply_used += data.food_required;
                    }
                }
                let orders = self
                    .jobs
                    .iter()
                    .filter(|j| j.worker == u.tag)
                    .map(|j| overseer::world::snapshot::ObservedOrder { ability: j.ability })
                    .collect();
                UnitObservation {
                    tag: u.tag,
                    type_id: u.type_id,
                    alliance: u.alliance,
                    position: u.position,
                    health: 100.0,
                    energy: 75.0,
                    build_progress: 1.0,
                    orders,
                    buffs: vec![],
                    is_dedicated_builder: false,
                }
            })
            .collect();
        Observation {
            tick,
            minerals: self.minerals,
            vespene: 0,
            supply_used,
            supply_cap: supply_cap.min(200),
            units,
            completed_upgrades: vec![],
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::default();
    let catalog = terran_catalog(&config);
    let map = MapInfo {
        width: 128,
        height: 128,
        own_start: Some(Point2::new(20.0, 20.0)),
        main_ramp: Some(Point2::new(28.0, 28.0)),
        natural_site: Some(Point2::new(36.0, 20.0)),
        enemy_base_guess: None,
        build_sites: (0..12)
            .map(|i| Point2::new(14.0 + 3.0 * (i % 4) as f32, 12.0 + 3.0 * (i / 4) as f32))
            .collect(),
    };

    let mut world = SimWorld {
        units: Vec::new(),
        jobs: Vec::new(),
        minerals: 50,
        next_tag: 1,
        catalog: catalog.clone(),
    };
    world.spawn(config.townhall_type, Alliance::Own, Point2::new(20.0, 20.0));
    for i in 0..12 {
        world.spawn(
            config.worker_type,
            Alliance::Own,
            Point2::new(18.0 + (i % 4) as f32, 22.0 + (i / 4) as f32),
        );
    }
    let mut rng = StdRng::seed_from_u64(7);
    let mut bot = Overseer::new(config.clone(), catalog.clone(), map);
    if let Err(err) = bot.start_map_worker() {
        tracing::error!(%err, "map worker failed to start");
        return;
    }

    for tick in 0..TICKS {
        // The enemy base "comes into vision" a while in, so the sighting
        // sensors see it appear rather than being primed with it
        if tick == 200 {
            world.spawn(config.townhall_type, Alliance::Enemy, Point2::new(108.0, 108.0));
            for _ in 0..6 {
                let jitter = Point2::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0));
                world.spawn(
                    config.military_type,
                    Alliance::Enemy,
                    Point2::new(104.0, 104.0) + jitter,
                );
            }
        }

        // Income: one mineral per worker every other tick
        let workers = world
            .units
            .iter()
            .filter(|u| u.alliance == Alliance::Own && u.type_id == config.worker_type)
            .count() as u32;
        if tick % 2 == 0 {
            world.minerals += workers;
        }

        // Finish due jobs
        let mut done = Vec::new();
        world.jobs.retain(|job| {
            if job.done_at <= tick {
                done.push((job.type_id, job.position));
                false
            } else {
                true
            }
        });
        for (type_id, position) in done {
            world.spawn(type_id, Alliance::Own, position);
        }

        let obs = world.observe(tick);
        let commands = match bot.on_frame(&obs) {
            Ok(commands) => commands,
            Err(err) => {
                tracing::error!(%err, tick, "fatal pipeline error");
                break;
            }
        };

        // Apply accepted build/train commands to the toy world
        for command in commands {
            let Some(&worker) = command.units.first() else {
                continue;
            };
            let built = catalog_build_target(&catalog, command.ability);
            let trained = catalog_train_target(&catalog, command.ability);
            if let Some(type_id) = built {
                let cost = world.catalog.unit(type_id).map(|d| d.mineral_cost).unwrap_or(0);
                if world.minerals >= cost {
                    world.minerals -= cost;
                    let position = match command.target {
                        CommandTarget::Point(p) => p,
                        _ => Point2::new(20.0, 20.0),
                    };
                    world.jobs.push(Job {
                        type_id,
                        position,
                        done_at: tick + BUILD_DELAY,
                        worker,
                        ability: command.ability,
                    });
                }
            } else if let Some(type_id) = trained {
                let cost = world.catalog.unit(type_id).map(|d| d.mineral_cost).unwrap_or(0);
                if world.minerals >= cost {
                    world.minerals -= cost;
                    world.jobs.push(Job {
                        type_id,
                        position: Point2::new(22.0, 22.0),
                        done_at: tick + TRAIN_DELAY,
                        worker,
                        ability: command.ability,
                    });
                }
            }
        }
    }

    tracing::info!(
        strategic = ?bot.strategic_goal(),
        tactical = ?bot.tactical_goal(),
        squads = bot.squads().len(),
        sanity_failures = bot.sanity().failure_count(),
        "run complete"
    );
    if let Err(err) = bot.shutdown() {
        tracing::error!(%err, "shutdown failed");
    }
}

fn catalog_build_target(catalog: &TypeCatalog, ability: AbilityId) -> Option<UnitTypeId> {
    for id in [UnitTypeId(18), UnitTypeId(19), UnitTypeId(21)] {
        if catalog.unit(id).and_then(|d| d.build_ability) == Some(ability) {
            return Some(id);
        }
    }
    None
}

fn catalog_train_target(catalog: &TypeCatalog, ability: AbilityId) -> Option<UnitTypeId> {
    for id in [UnitTypeId(45), UnitTypeId(48)] {
        if catalog.unit(id).and_then(|d| d.train_ability) == Some(ability) {
            return Some(id);
        }
    }
    None
}

//! The per-tick decision pipeline
//!
//! One `Overseer` instance owns every subsystem and runs them in a fixed
//! order each tick: snapshot refresh, sensors, goal updates, build phase,
//! squads. All shared tick state travels through an explicit `TickContext`
//! handed down the pipeline; nothing reaches around it through globals.

use ahash::AHashSet;
use std::time::Duration;

use crate::build::{standard_candidates, BuildOrderEngine};
use crate::core::config::BotConfig;
use crate::core::error::Result;
use crate::core::sanity::SanityMonitor;
use crate::core::types::{Alliance, Tick, UnitTag};
use crate::goals::{EconomySnapshot, StrategicGoal, StrategicGoalManager, TacticalGoal, TacticalGoalManager};
use crate::maps::{WorldSample, MapWorkerHandle};
use crate::sensors::{SensorInbox, SensorKind, SensorRegistry};
use crate::squads::{CombatController, ScoutController, Squad, SquadManager};
use crate::world::map::MapInfo;
use crate::world::orders::{Command, OrderSink};
use crate::world::snapshot::{Observation, ResourceLedger};
use crate::world::typedata::TypeCatalog;
use crate::world::units::{UnitFilter, UnitRegistry};

/// Name of the automatically formed scout squad
const SCOUT_SQUAD: &str = "scout";
/// Name of the main army squad fed by unit-completed notifications
const MAIN_SQUAD: &str = "main";

/// Everything a pipeline stage may need for one tick.
///
/// Read-only world state comes as shared borrows; the ledger, order sink
/// and sanity monitor are the tick's only mutable channels. `reserved`
/// holds squad members, which the build layer must not draft.
pub struct TickContext<'a> {
    pub tick: Tick,
    pub config: &'a BotConfig,
    pub units: &'a UnitRegistry,
    pub types: &'a TypeCatalog,
    pub map: &'a MapInfo,
    pub ledger: &'a mut ResourceLedger,
    pub orders: &'a mut OrderSink,
    pub sanity: &'a mut SanityMonitor,
    pub reserved: &'a AHashSet<UnitTag>,
}

/// The complete decision core
pub struct Overseer {
    config: BotConfig,
    types: TypeCatalog,
    map: MapInfo,
    units: UnitRegistry,
    sensors: SensorRegistry,
    strategic: StrategicGoalManager,
    tactical: TacticalGoalManager,
    engine: BuildOrderEngine,
    squads: SquadManager,
    sanity: SanityMonitor,
    map_worker: Option<MapWorkerHandle>,
    /// Enemy town-hall sightings update the base guess
    base_sightings: SensorInbox,
    /// Completed own military units, recruited into the main squad
    army_completions: SensorInbox,
    scout_dispatched: bool,
}

impl std::fmt::Debug for Overseer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overseer")
            .field("strategic", &self.strategic)
            .field("tactical", &self.tactical)
            .field("squads", &self.squads)
            .finish_non_exhaustive()
    }
}

impl Overseer {
    pub fn new(config: BotConfig, types: TypeCatalog, map: MapInfo) -> Self {
        let mut sensors = SensorRegistry::with_standard_sensors();
        let squads = SquadManager::new();
        squads.attach_sensors(&mut sensors);
        let base_sightings = SensorInbox::new();
        sensors.subscribe(
            SensorKind::EnemyResourceCenterSighted,
            None,
            false,
            base_sightings.clone(),
        );
        let army_completions = SensorInbox::new();
        sensors.subscribe(
            SensorKind::OwnMilitaryUnitCompleted,
            None,
            false,
            army_completions.clone(),
        );

        Self {
            config,
            types,
            map,
            units: UnitRegistry::new(),
            sensors,
            strategic: StrategicGoalManager::new(),
            tactical: TacticalGoalManager::new(),
            engine: BuildOrderEngine::new(standard_candidates()),
            squads,
            sanity: SanityMonitor::new(),
            map_worker: None,
            base_sightings,
            army_completions,
            scout_dispatched: false,
        }
    }

    /// Start the background strategic-map worker.
    pub fn start_map_worker(&mut self) -> Result<()> {
        let interval = Duration::from_millis(self.config.recompute_interval_ms);
        self.map_worker = Some(MapWorkerHandle::spawn(interval)?);
        Ok(())
    }

    /// Stop the background worker and wait for it.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(mut worker) = self.map_worker.take() {
            worker.shutdown()?;
        }
        Ok(())
    }

    /// Run one full decision tick and return the batched commands.
    ///
    /// Invariant violations along the way are counted by the sanity monitor
    /// and the tick continues; the error channel is reserved for fatal
    /// conditions.
    pub fn on_frame(&mut self, obs: &Observation) -> Result<Vec<Command>> {
        let tick = obs.tick;
        self.units.refresh(obs, &mut self.sanity);
        self.sensors.tick(&self.units, &self.types);
        self.absorb_base_sightings();
        self.absorb_army_completions();

        let economy = self.economy_snapshot(obs);
        self.strategic.tick(&economy, &self.config);
        self.update_tactical(&economy);
        self.tactical.validate(&mut self.sanity);

        self.maybe_dispatch_scout(tick);

        let mut ledger = ResourceLedger::from_observation(obs);
        let mut orders = OrderSink::new();
        let reserved = self.squads.reserved_tags();
        let (goal, point) = self.tactical.get();

        {
            let Overseer { config, types, map, units, engine, squads, sanity, .. } = self;
            let mut ctx = TickContext {
                tick,
                config,
                units,
                types,
                map,
                ledger: &mut ledger,
                orders: &mut orders,
                sanity,
                reserved: &reserved,
            };
            engine.tick(&mut ctx);
            squads.tick(&mut ctx, goal, point);
        }

        if let Some(worker) = &self.map_worker {
            worker.submit(self.map_sample(tick));
        }

        Ok(orders.flush())
    }

    /// Pull enemy town-hall sightings into the map's base guess. The first
    /// sighting locks the guess; later ones refine it only if the guess was
    /// still empty.
    fn absorb_base_sightings(&mut self) {
        for event in self.base_sightings.drain() {
            if self.map.enemy_base_guess.is_some() {
                continue;
            }
            if let Some(unit) = event.tags.iter().find_map(|tag| self.units.get(*tag)) {
                tracing::info!(position = ?unit.position, "enemy base located");
                self.map.enemy_base_guess = Some(unit.position);
            }
        }
    }

    /// Recruit freshly completed military units into the main squad,
    /// forming it on first recruitment.
    fn absorb_army_completions(&mut self) {
        let recruits: Vec<UnitTag> = self
            .army_completions
            .drain()
            .into_iter()
            .flat_map(|event| event.tags)
            .filter(|tag| self.units.contains(*tag))
            .collect();
        if recruits.is_empty() {
            return;
        }
        if self.squads.squad(MAIN_SQUAD).is_none() {
            self.squads.form(
                Squad::new(MAIN_SQUAD, vec![], Box::new(CombatController::new())),
                &mut self.sanity,
            );
        }
        if let Some(squad) = self.squads.squad_mut(MAIN_SQUAD) {
            let count = recruits.len();
            for tag in recruits {
                squad.add_member(tag);
            }
            tracing::debug!(recruits = count, total = squad.members().len(), "army recruited");
        }
    }

    /// The economy numbers the strategic policy reads
    fn economy_snapshot(&self, obs: &Observation) -> EconomySnapshot {
        let army_food = self
            .units
            .iter()
            .filter(|u| u.alliance == Alliance::Own && u.is_complete())
            .filter_map(|u| self.types.unit(u.type_id))
            .filter(|d| d.is_military)
            .map(|d| d.food_required)
            .sum();
        EconomySnapshot {
            workers: self.units.count_own(self.config.worker_type) as u32,
            bases: self.units.count_own_completed(self.config.townhall_type) as u32,
            army_food,
            minerals: obs.minerals,
        }
    }

    /// Derive the tactical stance from the strategic posture and army size.
    ///
    /// With enough army the bot attacks: at the most vulnerable point the
    /// strategic maps found, or the enemy base guess, or it keeps defending
    /// until intel exists. Defense anchors at the main ramp.
    fn update_tactical(&mut self, economy: &EconomySnapshot) {
        let wants_attack = economy.army_food >= self.config.attack_army_supply
            && self.strategic.get() != StrategicGoal::EconomyFocus;
        if !wants_attack {
            self.tactical.set_goal(TacticalGoal::DefendGeneral, None);
            return;
        }
        let vulnerable = self
            .map_worker
            .as_ref()
            .and_then(|w| w.latest())
            .and_then(|maps| maps.most_vulnerable());
        match vulnerable {
            Some(point) => self.tactical.set_goal(TacticalGoal::AttackPoint, Some(point)),
            None if self.map.enemy_base_guess.is_some() => {
                self.tactical.set_goal(TacticalGoal::AttackGeneral, None)
            }
            None => self.tactical.set_goal(TacticalGoal::DefendGeneral, None),
        }
    }

    /// Form the one-worker scout squad once its dispatch tick arrives.
    fn maybe_dispatch_scout(&mut self, tick: Tick) {
        if !self.config.enable_scouting
            || self.scout_dispatched
            || tick < self.config.scout_dispatch_tick
        {
            return;
        }
        let reserved = self.squads.reserved_tags();
        let scout = self
            .units
            .iter()
            .filter(|u| {
                u.alliance == Alliance::Own
                    && u.type_id == self.config.worker_type
                    && u.is_complete()
                    && !u.is_dedicated_builder
                    && !reserved.contains(&u.tag)
            })
            .min_by_key(|u| u.tag)
            .map(|u| u.tag);
        let Some(scout) = scout else {
            // No worker to spare yet; retried next tick
            return;
        };
        // The scout withdraws on the first enemy-army sighting after dispatch
        let army_sightings = SensorInbox::new();
        self.sensors.subscribe(
            SensorKind::EnemyUnitSighted,
            Some(UnitFilter::enemy().military()),
            true,
            army_sightings.clone(),
        );
        self.squads.form(
            Squad::new(
                SCOUT_SQUAD,
                vec![scout],
                Box::new(ScoutController::new(army_sightings, scout.0)),
            ),
            &mut self.sanity,
        );
        self.scout_dispatched = true;
        tracing::info!(?scout, tick, "scout dispatched");
    }

    /// Cheap copy of what the strategic-map recompute needs
    fn map_sample(&self, tick: Tick) -> WorldSample {
        let mut enemy_military = Vec::new();
        let mut enemy_structures = Vec::new();
        for unit in self.units.iter() {
            if unit.alliance != Alliance::Enemy {
                continue;
            }
            let Some(data) = self.types.unit(unit.type_id) else {
                continue;
            };
            if data.is_structure {
                enemy_structures.push(unit.position);
            } else if data.is_military {
                enemy_military.push((unit.position, data.food_required.max(1) as f32));
            }
        }
        WorldSample {
            tick,
            width: self.map.width,
            height: self.map.height,
            enemy_military,
            enemy_structures,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn map(&self) -> &MapInfo {
        &self.map
    }

    pub fn strategic_goal(&self) -> StrategicGoal {
        self.strategic.get()
    }

    pub fn tactical_goal(&self) -> (TacticalGoal, Option<crate::core::types::Point2>) {
        self.tactical.get()
    }

    pub fn squads(&self) -> &SquadManager {
        &self.squads
    }

    pub fn build_engine(&self) -> &BuildOrderEngine {
        &self.engine
    }

    pub fn sanity(&self) -> &SanityMonitor {
        &self.sanity
    }
}

//! Squad ownership, death pruning and deferred mutation
//!
//! The manager ticks every squad exactly once per tick. Disbands, whether
//! requested externally or returned by a controller, are collected during
//! iteration and applied only after it, so the squad list never changes
//! under the iteration's feet.

use ahash::AHashSet;

use crate::bot::TickContext;
use crate::core::sanity::SanityMonitor;
use crate::core::types::{Point2, UnitTag};
use crate::goals::TacticalGoal;
use crate::sensors::{SensorInbox, SensorKind, SensorRegistry};
use crate::squads::controller::SquadVerdict;
use crate::squads::squad::Squad;

#[derive(Default)]
pub struct SquadManager {
    squads: Vec<Squad>,
    death_inbox: SensorInbox,
    /// Disbands requested between ticks, applied after the next iteration
    pending_disbands: Vec<String>,
}

impl std::fmt::Debug for SquadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquadManager").field("squads", &self.squads).finish()
    }
}

impl SquadManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the death inbox so members are pruned without polling
    pub fn attach_sensors(&self, sensors: &mut SensorRegistry) {
        sensors.subscribe(
            SensorKind::OwnMilitaryUnitDied,
            None,
            false,
            self.death_inbox.clone(),
        );
    }

    /// Register a new squad. Names are unique; a duplicate is a sanity
    /// failure and the new squad is dropped.
    pub fn form(&mut self, squad: Squad, sanity: &mut SanityMonitor) {
        if self.squads.iter().any(|s| s.name() == squad.name()) {
            sanity.fail(format!("duplicate squad name {:?}", squad.name()));
            return;
        }
        tracing::info!(squad = squad.name(), members = squad.members().len(), "squad formed");
        self.squads.push(squad);
    }

    /// Request dissolution by name; applied after the next tick's iteration
    pub fn disband(&mut self, name: &str) {
        self.pending_disbands.push(name.to_string());
    }

    pub fn len(&self) -> usize {
        self.squads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    pub fn squad(&self, name: &str) -> Option<&Squad> {
        self.squads.iter().find(|s| s.name() == name)
    }

    pub fn squad_mut(&mut self, name: &str) -> Option<&mut Squad> {
        self.squads.iter_mut().find(|s| s.name() == name)
    }

    /// Tags committed to squads this tick; kept out of the labor pool
    pub fn reserved_tags(&self) -> AHashSet<UnitTag> {
        self.squads.iter().flat_map(|s| s.members().iter().copied()).collect()
    }

    /// Prune dead members, tick every squad once, then apply disbands.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>, goal: TacticalGoal, point: Option<Point2>) {
        let dead: AHashSet<UnitTag> = self
            .death_inbox
            .drain()
            .into_iter()
            .flat_map(|event| event.tags)
            .collect();
        for squad in &mut self.squads {
            squad.prune(ctx.units, &dead);
        }

        let mut disbands = std::mem::take(&mut self.pending_disbands);
        for squad in &mut self.squads {
            if disbands.iter().any(|n| n == squad.name()) {
                continue;
            }
            // A squad whose last member died has nothing left to control
            if squad.is_empty() || squad.tick(ctx, goal, point) == SquadVerdict::Disband {
                disbands.push(squad.name().to_string());
            }
        }

        self.squads.retain(|s| {
            let drop = disbands.iter().any(|n| n == s.name());
            if drop {
                tracing::info!(squad = s.name(), "squad disbanded");
            }
            !drop
        });
    }
}

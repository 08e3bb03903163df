//! Orbiting worker scout
//!
//! A single worker sent toward the suspected enemy base. Until a base guess
//! exists it heads for map center; once the guess is in, it circles the
//! base at a fixed radius, advancing its orbit angle on a fixed interval so
//! vision sweeps the whole perimeter. On the first enemy-army sighting it
//! withdraws home and asks for its own squad's dissolution, which releases
//! the worker back to the labor pool. Ignores the tactical goal entirely.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bot::TickContext;
use crate::core::types::{Point2, Tick, UnitTag};
use crate::goals::TacticalGoal;
use crate::sensors::SensorInbox;
use crate::squads::controller::{SquadController, SquadVerdict};
use crate::world::orders::Command;

#[derive(Debug)]
pub struct ScoutController {
    /// Current orbit angle in radians
    angle: f32,
    last_update: Option<Tick>,
    /// One-shot delivery of the first enemy military sighting
    army_sightings: SensorInbox,
}

impl ScoutController {
    /// `seed` randomizes the orbit entry angle so repeated games do not
    /// approach the enemy base from the same side.
    pub fn new(army_sightings: SensorInbox, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            last_update: None,
            army_sightings,
        }
    }

    fn waypoint(&self, ctx: &TickContext<'_>) -> Point2 {
        match ctx.map.enemy_base_guess {
            Some(base) => Point2::on_circle(base, ctx.config.scout_orbit_radius, self.angle),
            None => Point2::new(ctx.map.width as f32 / 2.0, ctx.map.height as f32 / 2.0),
        }
    }
}

impl SquadController for ScoutController {
    fn control(
        &mut self,
        members: &[UnitTag],
        ctx: &mut TickContext<'_>,
        _goal: TacticalGoal,
        _point: Option<Point2>,
    ) -> SquadVerdict {
        // Single-scout squad; a dead scout means the squad has no purpose
        let Some(&scout) = members.first() else {
            return SquadVerdict::Disband;
        };

        if !self.army_sightings.is_empty() {
            self.army_sightings.drain();
            let home = ctx.map.own_start.unwrap_or_default();
            ctx.orders.enqueue(Command::at_point(scout, ctx.config.move_ability, home));
            tracing::info!(?scout, "enemy army sighted, scout withdrawing");
            return SquadVerdict::Disband;
        }

        let due = self
            .last_update
            .map(|t| ctx.tick.saturating_sub(t) >= ctx.config.scout_update_interval)
            .unwrap_or(true);
        if !due {
            return SquadVerdict::Keep;
        }

        if ctx.map.enemy_base_guess.is_some() {
            self.angle += ctx.config.scout_orbit_step_deg.to_radians();
            if self.angle >= std::f32::consts::TAU {
                self.angle -= std::f32::consts::TAU;
            }
        }
        let waypoint = ctx.map.nearest_pathable(self.waypoint(ctx));
        ctx.orders.enqueue(Command::at_point(scout, ctx.config.move_ability, waypoint));
        self.last_update = Some(ctx.tick);
        tracing::debug!(?scout, ?waypoint, "scout waypoint updated");
        SquadVerdict::Keep
    }
}

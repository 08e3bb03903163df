//! Squad controllers: tactical goal in, unit orders out
//!
//! A controller is stateful across ticks (order throttling, orbit angles)
//! and acts only on the members it is handed. Enum-style dispatch through a
//! trait object keeps controllers interchangeable per squad.

use crate::bot::TickContext;
use crate::core::types::{Point2, Tick, UnitTag};
use crate::goals::TacticalGoal;
use crate::world::orders::Command;

/// Controller's view of the squad's fate after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadVerdict {
    Keep,
    /// Request dissolution; the manager applies it after iteration
    Disband,
}

/// Per-tick squad behavior
pub trait SquadController {
    fn control(
        &mut self,
        members: &[UnitTag],
        ctx: &mut TickContext<'_>,
        goal: TacticalGoal,
        point: Option<Point2>,
    ) -> SquadVerdict;
}

/// Standard fighting controller: maps the tactical stance to one
/// attack-move (or hold) target for the whole squad.
///
/// Orders are throttled: re-issued only when the target changes or the
/// configured interval has elapsed, so stable stances do not spam the
/// engine every tick.
#[derive(Debug, Default)]
pub struct CombatController {
    last_target: Option<Point2>,
    last_issued: Option<Tick>,
}

impl CombatController {
    pub fn new() -> Self {
        Self::default()
    }

    fn target_for(
        &self,
        ctx: &TickContext<'_>,
        goal: TacticalGoal,
        point: Option<Point2>,
    ) -> Option<Point2> {
        match goal {
            TacticalGoal::NotSet => None,
            TacticalGoal::DefendGeneral => ctx.map.main_ramp.or(ctx.map.own_start),
            TacticalGoal::AttackGeneral => ctx.map.enemy_base_guess,
            // Point goals without a point are caught by goal validation;
            // here the squad simply holds.
            TacticalGoal::DefendPoint | TacticalGoal::AttackPoint => point,
        }
    }
}

impl SquadController for CombatController {
    fn control(
        &mut self,
        members: &[UnitTag],
        ctx: &mut TickContext<'_>,
        goal: TacticalGoal,
        point: Option<Point2>,
    ) -> SquadVerdict {
        let Some(target) = self.target_for(ctx, goal, point) else {
            // No resolvable location for this stance yet; hold rather than
            // emit a malformed order
            tracing::debug!(?goal, members = members.len(), "no squad target resolvable");
            return SquadVerdict::Keep;
        };
        let target = ctx.map.nearest_pathable(target);

        let changed = self.last_target != Some(target);
        let due = self
            .last_issued
            .map(|t| ctx.tick.saturating_sub(t) >= ctx.config.squad_order_interval)
            .unwrap_or(true);
        if !changed && !due {
            return SquadVerdict::Keep;
        }

        ctx.orders.enqueue(Command::new(
            members.to_vec(),
            ctx.config.attack_ability,
            crate::world::orders::CommandTarget::Point(target),
        ));
        self.last_target = Some(target);
        self.last_issued = Some(ctx.tick);
        tracing::debug!(?goal, ?target, members = members.len(), "squad ordered");
        SquadVerdict::Keep
    }
}

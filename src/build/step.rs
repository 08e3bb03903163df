//! Individual build-order steps and their resolution
//!
//! A step resolves against the tick context: either it commits its spending
//! and issues orders (`Resolved`), or it waits for resources, tech or
//! producers without error (`Waiting`). Resolution never partially commits.

use std::fmt;

use crate::bot::TickContext;
use crate::build::maintenance::{MaintenanceSet, MaintenanceTask};
use crate::build::{pending_count, try_place_structure};
use crate::core::types::{Alliance, UnitTypeId, UpgradeId};
use crate::world::orders::Command;

/// Outcome of one resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed; the plan head advances
    Resolved,
    /// Preconditions not met this tick. Normal, retried next tick.
    Waiting,
}

/// One entry in a build order
pub enum BuildStep {
    /// Ensure at least `count` of a structure exist (placed or en route)
    RequireBuilding { structure: UnitTypeId, count: usize },
    /// Ensure at least `count` of a unit exist or are in production; `boost`
    /// requests the production boost on the trainer
    RequireUnit { unit: UnitTypeId, count: usize, boost: bool },
    /// Start (and optionally boost-maintain) an upgrade research
    RequireUpgrade { upgrade: UpgradeId, boost: bool },
    /// Hold the plan until a predicate over the tick context holds
    WaitFor {
        label: &'static str,
        predicate: Box<dyn Fn(&TickContext<'_>) -> bool + Send>,
    },
    /// Run an arbitrary action once. Ephemeral: consumed without a
    /// resolution attempt charged against the tick.
    Custom {
        label: &'static str,
        action: Box<dyn FnMut(&mut TickContext<'_>) + Send>,
    },
}

impl fmt::Debug for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::RequireBuilding { structure, count } => f
                .debug_struct("RequireBuilding")
                .field("structure", structure)
                .field("count", count)
                .finish(),
            BuildStep::RequireUnit { unit, count, boost } => f
                .debug_struct("RequireUnit")
                .field("unit", unit)
                .field("count", count)
                .field("boost", boost)
                .finish(),
            BuildStep::RequireUpgrade { upgrade, boost } => f
                .debug_struct("RequireUpgrade")
                .field("upgrade", upgrade)
                .field("boost", boost)
                .finish(),
            BuildStep::WaitFor { label, .. } => {
                f.debug_struct("WaitFor").field("label", label).finish()
            }
            BuildStep::Custom { label, .. } => {
                f.debug_struct("Custom").field("label", label).finish()
            }
        }
    }
}

impl BuildStep {
    /// Ephemeral steps are consumed without counting as the tick's one real
    /// resolution attempt, so several can flush in a single tick.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, BuildStep::Custom { .. })
    }

    /// Attempt to resolve this step against the tick context.
    pub fn resolve(
        &mut self,
        ctx: &mut TickContext<'_>,
        maintenance: &mut MaintenanceSet,
    ) -> StepStatus {
        match self {
            BuildStep::RequireBuilding { structure, count } => {
                resolve_building(ctx, maintenance, *structure, *count)
            }
            BuildStep::RequireUnit { unit, count, boost } => {
                resolve_unit(ctx, *unit, *count, *boost)
            }
            BuildStep::RequireUpgrade { upgrade, boost } => {
                resolve_upgrade(ctx, maintenance, *upgrade, *boost)
            }
            BuildStep::WaitFor { label, predicate } => {
                if predicate(ctx) {
                    tracing::debug!(label, "wait condition satisfied");
                    StepStatus::Resolved
                } else {
                    StepStatus::Waiting
                }
            }
            BuildStep::Custom { label, action } => {
                tracing::debug!(label, "running custom step");
                action(ctx);
                StepStatus::Resolved
            }
        }
    }
}

fn resolve_building(
    ctx: &mut TickContext<'_>,
    maintenance: &mut MaintenanceSet,
    structure: UnitTypeId,
    count: usize,
) -> StepStatus {
    // Includes placements queued earlier this tick, e.g. by the supply policy
    let have = pending_count(ctx, structure);
    if have >= count {
        return StepStatus::Resolved;
    }
    if !ctx.types.tech_ready(structure, ctx.units) {
        return StepStatus::Waiting;
    }
    // One placement per tick; remaining copies resolve on later ticks
    try_place_structure(ctx, structure, maintenance);
    StepStatus::Waiting
}

fn resolve_unit(
    ctx: &mut TickContext<'_>,
    unit: UnitTypeId,
    count: usize,
    boost: bool,
) -> StepStatus {
    let Some(data) = ctx.types.unit(unit) else {
        ctx.sanity.fail(format!("unit type {:?} missing from type catalog", unit));
        return StepStatus::Resolved;
    };
    let (Some(producer), Some(train_ability)) = (data.produced_by, data.train_ability) else {
        ctx.sanity.fail(format!("{} has no producer in the type catalog", data.name));
        return StepStatus::Resolved;
    };
    let mineral_cost = data.mineral_cost;
    let vespene_cost = data.vespene_cost;
    let food = data.food_required;

    // In-production units count: a trainer with the train order queued is
    // already working on one.
    let training = ctx
        .units
        .iter()
        .filter(|u| u.alliance == Alliance::Own && u.has_order(train_ability))
        .count();
    let have = ctx.units.count_own(unit) + training;
    if have >= count {
        return StepStatus::Resolved;
    }
    if !ctx.types.tech_ready(unit, ctx.units) {
        return StepStatus::Waiting;
    }

    // An idle, completed producer is required before committing resources
    let trainer = ctx
        .units
        .iter()
        .filter(|u| {
            u.alliance == Alliance::Own
                && u.type_id == producer
                && u.is_complete()
                && u.is_idle()
        })
        .min_by_key(|u| u.tag);
    let Some(trainer) = trainer else {
        return StepStatus::Waiting;
    };
    if !ctx.ledger.spend(mineral_cost, vespene_cost, food) {
        return StepStatus::Waiting;
    }
    let trainer_tag = trainer.tag;
    ctx.orders.enqueue(Command::plain(trainer_tag, train_ability));
    tracing::debug!(unit = ?unit, trainer = ?trainer_tag, "training queued");
    if boost {
        boost_structure(ctx, trainer_tag);
    }
    StepStatus::Waiting
}

fn resolve_upgrade(
    ctx: &mut TickContext<'_>,
    maintenance: &mut MaintenanceSet,
    upgrade: UpgradeId,
    boost: bool,
) -> StepStatus {
    if ctx.units.upgrade_done(upgrade) {
        return StepStatus::Resolved;
    }
    let Some(data) = ctx.types.upgrade(upgrade) else {
        ctx.sanity.fail(format!("upgrade {:?} missing from type catalog", upgrade));
        return StepStatus::Resolved;
    };
    let researched_by = data.researched_by;
    let research_ability = data.research_ability;
    let mineral_cost = data.mineral_cost;
    let vespene_cost = data.vespene_cost;

    // Already in progress counts as resolved; the boost upkeep task owns it
    // from here
    let in_progress = ctx.units.iter().any(|u| {
        u.alliance == Alliance::Own && u.has_order(research_ability)
    });
    if in_progress {
        return StepStatus::Resolved;
    }

    let researcher = ctx
        .units
        .iter()
        .filter(|u| {
            u.alliance == Alliance::Own
                && u.type_id == researched_by
                && u.is_complete()
                && u.is_idle()
        })
        .min_by_key(|u| u.tag);
    let Some(researcher) = researcher else {
        return StepStatus::Waiting;
    };
    if !ctx.ledger.spend(mineral_cost, vespene_cost, 0) {
        return StepStatus::Waiting;
    }
    let researcher_tag = researcher.tag;
    ctx.orders.enqueue(Command::plain(researcher_tag, research_ability));
    tracing::info!(upgrade = ?upgrade, researcher = ?researcher_tag, "research started");
    if boost {
        maintenance.push(MaintenanceTask::ReapplyBoost {
            upgrade,
            researcher: researcher_tag,
            installed_at: ctx.tick,
        });
    }
    StepStatus::Resolved
}

/// Apply the production boost to a structure if a caster with energy exists
fn boost_structure(ctx: &mut TickContext<'_>, target: crate::core::types::UnitTag) {
    let caster = ctx.units.iter().find(|u| {
        u.alliance == Alliance::Own
            && u.is_complete()
            && u.energy >= ctx.config.boost_energy_cost
            && ctx.types.unit(u.type_id).map(|d| d.is_townhall).unwrap_or(false)
    });
    if let Some(caster) = caster {
        ctx.orders.enqueue(Command::on_unit(caster.tag, ctx.config.boost_ability, target));
    }
}

//! Build-order resolution: steps, the order queue, the engine and the
//! always-on supply margin policy
//!
//! A build step either resolves this tick or waits; waiting is the normal
//! state while resources accumulate, never an error. Steps commit spending
//! against the tick's resource ledger the moment they resolve, so the fixed
//! pipeline order decides who wins contested resources.

pub mod engine;
pub mod maintenance;
pub mod order;
pub mod step;
pub mod supply;

pub use engine::{standard_candidates, BuildOrderCandidate, BuildOrderEngine};
pub use maintenance::{MaintenanceSet, MaintenanceTask};
pub use order::BuildOrder;
pub use step::{BuildStep, StepStatus};

use crate::bot::TickContext;
use crate::core::types::{Alliance, UnitTag, UnitTypeId};
use crate::world::orders::Command;

/// Build commands for this structure type already sitting in the tick's
/// order sink. The registry cannot see them until next tick, so every
/// placement-counting site adds them in.
pub(crate) fn queued_builds(ctx: &TickContext<'_>, structure: UnitTypeId) -> usize {
    let Some(ability) = ctx.types.unit(structure).and_then(|d| d.build_ability) else {
        return 0;
    };
    ctx.orders.iter().filter(|c| c.ability == ability).count()
}

/// Structures of this type already accounted for: placed (complete or not),
/// builders en route from earlier ticks, and placements queued earlier this
/// same tick.
pub(crate) fn pending_count(ctx: &TickContext<'_>, structure: UnitTypeId) -> usize {
    ctx.units.count_own(structure)
        + ctx.units.count_builders_en_route(structure, ctx.types)
        + queued_builds(ctx, structure)
}

/// Pick a worker for construction duty.
///
/// Preference order: dedicated builders first, then idle workers, then any
/// unreserved worker (it will abandon harvesting). Squad members are never
/// drafted, and neither is a worker already given a command this tick.
pub(crate) fn find_builder(ctx: &TickContext<'_>) -> Option<UnitTag> {
    let worker_type = ctx.config.worker_type;
    let mut best: Option<(u8, UnitTag)> = None;
    for unit in ctx.units.iter() {
        if unit.alliance != Alliance::Own
            || unit.type_id != worker_type
            || !unit.is_complete()
            || ctx.reserved.contains(&unit.tag)
            || ctx.orders.iter().any(|c| c.units.contains(&unit.tag))
        {
            continue;
        }
        let rank = if unit.is_dedicated_builder {
            0
        } else if unit.is_idle() {
            1
        } else {
            2
        };
        // Tag as tiebreaker keeps selection deterministic across map order
        let candidate = (rank, unit.tag);
        if best.map(|b| candidate < b).unwrap_or(true) {
            best = Some(candidate);
        }
    }
    best.map(|(_, tag)| tag)
}

/// Attempt to place one structure: pick a builder and a site, commit the
/// cost, queue the build command and register the one-tick-later placement
/// validation. Returns false without partial commit if anything is missing.
pub(crate) fn try_place_structure(
    ctx: &mut TickContext<'_>,
    structure: UnitTypeId,
    maintenance: &mut MaintenanceSet,
) -> bool {
    let Some(data) = ctx.types.unit(structure) else {
        ctx.sanity.fail(format!("structure {:?} missing from type catalog", structure));
        return false;
    };
    let Some(build_ability) = data.build_ability else {
        ctx.sanity.fail(format!("{} has no build ability but was queued for placement", data.name));
        return false;
    };
    let mineral_cost = data.mineral_cost;
    let vespene_cost = data.vespene_cost;

    let Some(builder) = find_builder(ctx) else {
        tracing::debug!(structure = ?structure, "no builder available");
        return false;
    };
    // Round-robin over known sites; the engine-side validator has final say
    let pending = pending_count(ctx, structure);
    let Some(site) = ctx.map.build_site(pending) else {
        tracing::warn!(structure = ?structure, "no build site available");
        return false;
    };

    if !ctx.ledger.spend(mineral_cost, vespene_cost, 0) {
        return false;
    }
    ctx.orders.enqueue(Command::at_point(builder, build_ability, site));
    maintenance.push(MaintenanceTask::ValidatePlacement {
        structure,
        expected_at_least: pending + 1,
        due_tick: ctx.tick + 1,
    });
    tracing::debug!(structure = ?structure, builder = ?builder, ?site, "placement queued");
    true
}

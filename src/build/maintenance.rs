//! Per-tick maintenance tasks
//!
//! An explicit list of active duties evaluated once per tick as part of the
//! build phase: placement re-validation and boost upkeep. Tasks remove
//! themselves when done, so lifetime is visible in one place instead of
//! being spread across dynamically registered callbacks.

use crate::bot::TickContext;
use crate::core::types::{Alliance, Tick, UnitTag, UnitTypeId, UpgradeId};
use crate::world::orders::Command;

/// Ticks a boost task survives before the research order must be visible.
/// The engine acknowledges issued orders with one tick of latency.
const RESEARCH_ACK_GRACE: Tick = 2;

#[derive(Debug, Clone, Copy)]
pub enum MaintenanceTask {
    /// One-shot recheck that a queued placement actually registered.
    ///
    /// A placement the engine rejected leaves the bot's belief about its
    /// own base wrong; the recheck reports that as a sanity failure.
    ValidatePlacement {
        structure: UnitTypeId,
        expected_at_least: usize,
        due_tick: Tick,
    },
    /// Keep the production boost active on a researching structure.
    ///
    /// The boost buff is time-limited and can expire mid-research; this
    /// task reapplies it every tick the research is still in progress and
    /// the buff is absent.
    ReapplyBoost {
        upgrade: UpgradeId,
        researcher: UnitTag,
        installed_at: Tick,
    },
}

/// The active maintenance tasks, evaluated once per tick
#[derive(Debug, Default)]
pub struct MaintenanceSet {
    tasks: Vec<MaintenanceTask>,
}

impl MaintenanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: MaintenanceTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task; finished tasks drop out of the list.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let mut keep = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            if run_task(&task, ctx) {
                keep.push(task);
            }
        }
        self.tasks = keep;
    }
}

/// Returns true if the task should stay active
fn run_task(task: &MaintenanceTask, ctx: &mut TickContext<'_>) -> bool {
    match *task {
        MaintenanceTask::ValidatePlacement { structure, expected_at_least, due_tick } => {
            if ctx.tick < due_tick {
                return true;
            }
            let count = ctx.units.count_own(structure)
                + ctx.units.count_builders_en_route(structure, ctx.types);
            if count < expected_at_least {
                ctx.sanity.fail(format!(
                    "placement validation failed: expected at least {} of {:?}, observed {}",
                    expected_at_least, structure, count
                ));
            }
            false
        }
        MaintenanceTask::ReapplyBoost { upgrade, researcher, installed_at } => {
            let Some(data) = ctx.types.upgrade(upgrade) else {
                return false;
            };
            let Some(unit) = ctx.units.get(researcher) else {
                // Researcher died; the research died with it
                tracing::warn!(?upgrade, "boost target lost, dropping boost upkeep");
                return false;
            };
            let researching = unit.has_order(data.research_ability);
            if !researching {
                // Within the ack grace the order may simply not be visible yet
                return ctx.tick < installed_at + RESEARCH_ACK_GRACE;
            }
            if unit.has_buff(ctx.config.boost_buff) {
                return true;
            }
            // Find a caster with enough energy
            let caster = ctx.units.iter().find(|u| {
                u.alliance == Alliance::Own
                    && u.is_complete()
                    && u.energy >= ctx.config.boost_energy_cost
                    && ctx.types.unit(u.type_id).map(|d| d.is_townhall).unwrap_or(false)
            });
            if let Some(caster) = caster {
                ctx.orders.enqueue(Command::on_unit(
                    caster.tag,
                    ctx.config.boost_ability,
                    researcher,
                ));
                tracing::debug!(?upgrade, researcher = ?researcher, "boost reapplied");
            }
            true
        }
    }
}

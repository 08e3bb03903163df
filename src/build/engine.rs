//! Build-order engine: candidate selection, plan resolution, maintenance
//!
//! Each tick the engine runs its maintenance tasks, then the supply margin
//! policy, then resolves the head of the active plan. When no plan is
//! active, candidates are scored against the current situation and the
//! highest-scoring viable one is adopted.

use crate::bot::TickContext;
use crate::build::maintenance::MaintenanceSet;
use crate::build::order::BuildOrder;
use crate::build::step::BuildStep;
use crate::build::supply::SupplyPolicy;
use crate::core::config::BotConfig;
use crate::core::types::Race;

/// A selectable build order: race gate, situational score, constructor.
///
/// `viability` returns `None` when the plan cannot be played at all right
/// now and a score otherwise; among viable candidates the highest score
/// wins, earliest listed on ties.
#[derive(Clone, Copy)]
pub struct BuildOrderCandidate {
    pub name: &'static str,
    pub races: &'static [Race],
    pub viability: fn(&TickContext<'_>) -> Option<i32>,
    pub construct: fn(&BotConfig) -> BuildOrder,
}

impl std::fmt::Debug for BuildOrderCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrderCandidate")
            .field("name", &self.name)
            .field("races", &self.races)
            .finish()
    }
}

/// Drives build-order selection and resolution
pub struct BuildOrderEngine {
    candidates: Vec<BuildOrderCandidate>,
    active: Option<BuildOrder>,
    maintenance: MaintenanceSet,
    supply: SupplyPolicy,
    /// No-viable-plan is reported as a sanity failure once, not every tick
    warned_no_plan: bool,
}

impl std::fmt::Debug for BuildOrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrderEngine")
            .field("candidates", &self.candidates.len())
            .field("active", &self.active)
            .finish()
    }
}

impl BuildOrderEngine {
    pub fn new(candidates: Vec<BuildOrderCandidate>) -> Self {
        Self {
            candidates,
            active: None,
            maintenance: MaintenanceSet::new(),
            supply: SupplyPolicy::new(),
            warned_no_plan: false,
        }
    }

    /// The plan currently being executed, if any
    pub fn active(&self) -> Option<&BuildOrder> {
        self.active.as_ref()
    }

    /// Number of outstanding maintenance tasks
    pub fn maintenance_len(&self) -> usize {
        self.maintenance.len()
    }

    /// Run the full build phase for one tick.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.maintenance.tick(ctx);
        self.supply.tick(ctx, &mut self.maintenance);

        if self.active.as_ref().map(|p| p.is_complete()).unwrap_or(true) {
            if let Some(done) = self.active.take() {
                tracing::info!(plan = done.name(), "build order complete");
            }
            self.active = self.select(ctx);
        }
        if let Some(plan) = self.active.as_mut() {
            plan.resolve(ctx, &mut self.maintenance);
        }
    }

    /// Score all race-eligible candidates and adopt the best viable one.
    fn select(&mut self, ctx: &mut TickContext<'_>) -> Option<BuildOrder> {
        let mut best: Option<(i32, &BuildOrderCandidate)> = None;
        for candidate in &self.candidates {
            if !candidate.races.contains(&ctx.config.race) {
                continue;
            }
            let Some(score) = (candidate.viability)(ctx) else {
                continue;
            };
            // Strict comparison keeps the earliest candidate on score ties
            if best.map(|(s, _)| score > s).unwrap_or(true) {
                best = Some((score, candidate));
            }
        }
        match best {
            Some((score, candidate)) => {
                tracing::info!(plan = candidate.name, score, "build order selected");
                self.warned_no_plan = false;
                Some((candidate.construct)(ctx.config))
            }
            None => {
                if !self.warned_no_plan {
                    ctx.sanity.fail(format!(
                        "no viable build order candidate for {:?}",
                        ctx.config.race
                    ));
                    self.warned_no_plan = true;
                }
                None
            }
        }
    }
}

/// The stock candidate list: a single standard macro opening.
pub fn standard_candidates() -> Vec<BuildOrderCandidate> {
    vec![BuildOrderCandidate {
        name: "standard-macro",
        races: &[Race::Terran],
        viability: |_ctx| Some(100),
        construct: standard_macro,
    }]
}

/// Standard macro opening: early house, one production structure, a first
/// defensive round of military, then doubled production into a full push.
fn standard_macro(config: &BotConfig) -> BuildOrder {
    let production = config.production_type;
    let military = config.military_type;
    BuildOrder::new(
        "standard-macro",
        vec![
            BuildStep::Custom {
                label: "announce-opening",
                action: Box::new(|ctx| {
                    tracing::info!(tick = ctx.tick, "opening standard macro");
                }),
            },
            BuildStep::RequireBuilding { structure: config.house_type, count: 1 },
            BuildStep::RequireBuilding { structure: production, count: 1 },
            BuildStep::RequireUnit { unit: military, count: 4, boost: true },
            BuildStep::RequireBuilding { structure: production, count: 3 },
            BuildStep::RequireUnit { unit: military, count: 16, boost: true },
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_candidates_are_terran_only() {
        let candidates = standard_candidates();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].races.contains(&Race::Terran));
        assert!(!candidates[0].races.contains(&Race::Zerg));
    }
}

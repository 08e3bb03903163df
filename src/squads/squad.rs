//! A named group of units with a controller

use ahash::AHashSet;

use crate::bot::TickContext;
use crate::core::types::{Point2, UnitTag};
use crate::goals::TacticalGoal;
use crate::squads::controller::{SquadController, SquadVerdict};
use crate::world::units::UnitRegistry;

pub struct Squad {
    name: String,
    members: Vec<UnitTag>,
    controller: Box<dyn SquadController>,
}

impl std::fmt::Debug for Squad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Squad")
            .field("name", &self.name)
            .field("members", &self.members)
            .finish()
    }
}

impl Squad {
    pub fn new(
        name: impl Into<String>,
        members: Vec<UnitTag>,
        controller: Box<dyn SquadController>,
    ) -> Self {
        Self { name: name.into(), members, controller }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[UnitTag] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn add_member(&mut self, tag: UnitTag) {
        if !self.members.contains(&tag) {
            self.members.push(tag);
        }
    }

    /// Drop members reported dead or absent from the registry.
    ///
    /// The death sensor covers military units only, so registry absence is
    /// checked too; worker scouts die without a sensor event.
    pub fn prune(&mut self, units: &UnitRegistry, dead: &AHashSet<UnitTag>) {
        let before = self.members.len();
        self.members.retain(|tag| !dead.contains(tag) && units.contains(*tag));
        let lost = before - self.members.len();
        if lost > 0 {
            tracing::debug!(squad = %self.name, lost, remaining = self.members.len(), "squad members lost");
        }
    }

    /// Run the controller for one tick.
    pub fn tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        goal: TacticalGoal,
        point: Option<Point2>,
    ) -> SquadVerdict {
        let Squad { members, controller, .. } = self;
        controller.control(members, ctx, goal, point)
    }
}

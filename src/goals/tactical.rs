//! Tactical goal manager: the current military stance

use crate::core::sanity::SanityMonitor;
use crate::core::types::Point2;

/// The military stance squads act on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticalGoal {
    NotSet,
    DefendGeneral,
    AttackGeneral,
    DefendPoint,
    AttackPoint,
}

impl TacticalGoal {
    /// Does this stance require a target point?
    pub fn needs_point(&self) -> bool {
        matches!(self, TacticalGoal::DefendPoint | TacticalGoal::AttackPoint)
    }
}

/// Finite-state holder for the tactical stance plus optional target point.
#[derive(Debug)]
pub struct TacticalGoalManager {
    goal: TacticalGoal,
    point: Option<Point2>,
}

impl TacticalGoalManager {
    pub fn new() -> Self {
        Self { goal: TacticalGoal::NotSet, point: None }
    }

    /// Set stance and target point. A no-op if both are unchanged; actual
    /// changes are logged exactly once.
    pub fn set_goal(&mut self, goal: TacticalGoal, point: Option<Point2>) {
        if self.goal == goal && self.point == point {
            return;
        }
        tracing::info!(from = ?self.goal, to = ?goal, ?point, "tactical goal transition");
        self.goal = goal;
        self.point = point;
    }

    /// Both fields, consistent as of the calling tick
    pub fn get(&self) -> (TacticalGoal, Option<Point2>) {
        (self.goal, self.point)
    }

    /// Per-tick invariant check: a point-flavored goal must carry a point.
    /// Without one every squad controller branch would resolve
    /// non-deterministically, so this is surfaced as a sanity failure.
    pub fn validate(&self, sanity: &mut SanityMonitor) {
        if self.goal.needs_point() && self.point.is_none() {
            sanity.fail(format!("tactical goal {:?} has no target point", self.goal));
        }
    }
}

impl Default for TacticalGoalManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_goal_idempotent() {
        let mut manager = TacticalGoalManager::new();
        let point = Some(Point2::new(30.0, 30.0));
        manager.set_goal(TacticalGoal::AttackPoint, point);
        manager.set_goal(TacticalGoal::AttackPoint, point);
        assert_eq!(manager.get(), (TacticalGoal::AttackPoint, point));
    }

    #[test]
    fn test_point_goal_without_point_fails_validation() {
        let mut manager = TacticalGoalManager::new();
        let mut sanity = SanityMonitor::new();

        manager.set_goal(TacticalGoal::AttackPoint, None);
        manager.validate(&mut sanity);
        assert_eq!(sanity.failure_count(), 1);

        // General goals need no point
        manager.set_goal(TacticalGoal::DefendGeneral, None);
        manager.validate(&mut sanity);
        assert_eq!(sanity.failure_count(), 1);
    }
}

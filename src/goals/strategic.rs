//! Strategic goal manager: long-horizon economy/military posture

use crate::core::config::BotConfig;

/// Long-horizon posture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategicGoal {
    /// Saturate worker lines before anything else
    EconomyFocus,
    /// Keep expanding the economy while army production starts
    BuildMilitaryPlusEconomy,
    /// Full military production
    BuildMilitary,
    /// Take an additional base
    Expand,
}

/// The economy numbers the transition policy reads, computed fresh from the
/// snapshot each tick by the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct EconomySnapshot {
    pub workers: u32,
    pub bases: u32,
    pub army_food: u32,
    pub minerals: u32,
}

/// Finite-state holder for the strategic goal.
///
/// `tick` dispatches through an exhaustive match: adding a goal variant
/// without a handler is a compile error, not a silent do-nothing bot.
#[derive(Debug)]
pub struct StrategicGoalManager {
    goal: StrategicGoal,
    /// Base count when Expand was entered, to detect the expansion landing
    bases_at_expand: u32,
}

impl StrategicGoalManager {
    pub fn new() -> Self {
        Self { goal: StrategicGoal::EconomyFocus, bases_at_expand: 0 }
    }

    pub fn get(&self) -> StrategicGoal {
        self.goal
    }

    /// Idempotent transition: setting the current value is a no-op and is
    /// logged exactly once per actual change.
    pub fn set_goal(&mut self, goal: StrategicGoal) {
        if self.goal == goal {
            return;
        }
        tracing::info!(from = ?self.goal, to = ?goal, "strategic goal transition");
        self.goal = goal;
    }

    /// Re-evaluate the posture against this tick's economy numbers.
    pub fn tick(&mut self, economy: &EconomySnapshot, config: &BotConfig) {
        let saturation = config.worker_saturation_per_base * economy.bases.max(1);
        let saturated = economy.workers >= saturation;

        match self.goal {
            StrategicGoal::EconomyFocus => {
                if saturated {
                    if economy.minerals >= config.expand_mineral_reserve {
                        self.bases_at_expand = economy.bases;
                        self.set_goal(StrategicGoal::Expand);
                    } else {
                        self.set_goal(StrategicGoal::BuildMilitary);
                    }
                }
            }
            StrategicGoal::BuildMilitaryPlusEconomy => {
                if economy.army_food >= config.attack_army_supply / 2 {
                    self.set_goal(StrategicGoal::BuildMilitary);
                } else if economy.workers < saturation / 2 {
                    // Economy crippled (base or worker line lost): rebuild
                    self.set_goal(StrategicGoal::EconomyFocus);
                }
            }
            StrategicGoal::BuildMilitary => {
                if economy.workers < saturation / 2 {
                    self.set_goal(StrategicGoal::EconomyFocus);
                }
            }
            StrategicGoal::Expand => {
                if economy.bases > self.bases_at_expand {
                    // Expansion landed; go back to filling it with workers
                    self.set_goal(StrategicGoal::EconomyFocus);
                } else if economy.minerals < config.expand_mineral_reserve / 2 {
                    // Bank drained before the expansion happened; regroup
                    self.set_goal(StrategicGoal::BuildMilitaryPlusEconomy);
                }
            }
        }
    }
}

impl Default for StrategicGoalManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_in_economy_until_saturated() {
        let config = BotConfig::default();
        let mut manager = StrategicGoalManager::new();

        let starving = EconomySnapshot { workers: 10, bases: 1, army_food: 0, minerals: 50 };
        manager.tick(&starving, &config);
        assert_eq!(manager.get(), StrategicGoal::EconomyFocus);
    }

    #[test]
    fn test_saturation_transitions_to_military() {
        let config = BotConfig::default();
        let mut manager = StrategicGoalManager::new();

        let saturated = EconomySnapshot {
            workers: config.worker_saturation_per_base,
            bases: 1,
            army_food: 0,
            minerals: 100,
        };
        manager.tick(&saturated, &config);
        assert_eq!(manager.get(), StrategicGoal::BuildMilitary);
    }

    #[test]
    fn test_rich_and_saturated_expands_then_returns() {
        let config = BotConfig::default();
        let mut manager = StrategicGoalManager::new();

        let rich = EconomySnapshot {
            workers: config.worker_saturation_per_base,
            bases: 1,
            army_food: 0,
            minerals: config.expand_mineral_reserve,
        };
        manager.tick(&rich, &config);
        assert_eq!(manager.get(), StrategicGoal::Expand);

        // The new base lands
        let expanded = EconomySnapshot { bases: 2, ..rich };
        manager.tick(&expanded, &config);
        assert_eq!(manager.get(), StrategicGoal::EconomyFocus);
    }

    #[test]
    fn test_set_goal_is_idempotent() {
        let mut manager = StrategicGoalManager::new();
        manager.set_goal(StrategicGoal::BuildMilitary);
        let before = manager.get();
        manager.set_goal(StrategicGoal::BuildMilitary);
        assert_eq!(manager.get(), before);
    }
}

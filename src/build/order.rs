//! An ordered plan of build steps, resolved strictly head-first
//!
//! Only the head of the plan is ever attempted; later steps wait even when
//! they would be affordable right now. Ephemeral steps at the head flush
//! without consuming the tick's single real resolution attempt.

use crate::bot::TickContext;
use crate::build::maintenance::MaintenanceSet;
use crate::build::step::{BuildStep, StepStatus};

/// A named queue of build steps
pub struct BuildOrder {
    name: &'static str,
    steps: Vec<BuildStep>,
    /// Index of the current head; everything before it has resolved
    cursor: usize,
}

impl std::fmt::Debug for BuildOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildOrder")
            .field("name", &self.name)
            .field("cursor", &self.cursor)
            .field("remaining", &(self.steps.len() - self.cursor))
            .finish()
    }
}

impl BuildOrder {
    pub fn new(name: &'static str, steps: Vec<BuildStep>) -> Self {
        Self { name, steps, cursor: 0 }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All steps resolved?
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    /// Resolve the plan head for this tick.
    ///
    /// Ephemeral steps at the head run and advance the cursor without
    /// limit; the first non-ephemeral step gets exactly one resolution
    /// attempt. A resolved non-ephemeral step advances the cursor but the
    /// next step waits until the following tick, keeping resolution pacing
    /// at one real step per tick.
    pub fn resolve(&mut self, ctx: &mut TickContext<'_>, maintenance: &mut MaintenanceSet) {
        while let Some(step) = self.steps.get_mut(self.cursor) {
            let ephemeral = step.is_ephemeral();
            let status = step.resolve(ctx, maintenance);
            match status {
                StepStatus::Resolved => {
                    tracing::debug!(plan = self.name, step = ?self.steps[self.cursor], "step resolved");
                    self.cursor += 1;
                    if !ephemeral {
                        break;
                    }
                }
                StepStatus::Waiting => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_tracks_completion() {
        let order = BuildOrder::new("empty", vec![]);
        assert!(order.is_complete());
        assert_eq!(order.remaining(), 0);
    }
}

//! Queued unit commands, batched at end of tick
//!
//! Commands are never sent mid-tick. Every pipeline stage enqueues into the
//! sink; the bot flushes the whole batch to the transport layer once the
//! pipeline completes.

use serde::{Deserialize, Serialize};

use crate::core::types::{AbilityId, Point2, UnitTag};

/// What a command is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandTarget {
    None,
    Point(Point2),
    Unit(UnitTag),
}

/// One queued unit command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub units: Vec<UnitTag>,
    pub ability: AbilityId,
    pub target: CommandTarget,
}

impl Command {
    pub fn new(units: Vec<UnitTag>, ability: AbilityId, target: CommandTarget) -> Self {
        Self { units, ability, target }
    }

    /// Convenience: single-unit command at a point
    pub fn at_point(unit: UnitTag, ability: AbilityId, point: Point2) -> Self {
        Self { units: vec![unit], ability, target: CommandTarget::Point(point) }
    }

    /// Convenience: single-unit command on another unit
    pub fn on_unit(unit: UnitTag, ability: AbilityId, target: UnitTag) -> Self {
        Self { units: vec![unit], ability, target: CommandTarget::Unit(target) }
    }

    /// Convenience: single-unit command with no target
    pub fn plain(unit: UnitTag, ability: AbilityId) -> Self {
        Self { units: vec![unit], ability, target: CommandTarget::None }
    }
}

/// Collects commands during a tick; drained as one batch at the end
#[derive(Debug, Default)]
pub struct OrderSink {
    queued: Vec<Command>,
}

impl OrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, command: Command) {
        self.queued.push(command);
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Commands queued so far this tick.
    ///
    /// Later pipeline stages read this to see what earlier stages already
    /// committed; the registry cannot reflect it until next tick.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.queued.iter()
    }

    /// Drain the batch for transport
    pub fn flush(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_drains_in_order() {
        let mut sink = OrderSink::new();
        sink.enqueue(Command::plain(UnitTag(1), AbilityId(16)));
        sink.enqueue(Command::at_point(UnitTag(2), AbilityId(23), Point2::new(5.0, 5.0)));
        let batch = sink.flush();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].units, vec![UnitTag(1)]);
        assert!(sink.is_empty());
    }
}

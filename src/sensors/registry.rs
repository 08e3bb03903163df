//! Sensor ownership, ticking and subscription dispatch

use crate::sensors::detectors::{
    EnemyResourceCenterSighted, EnemyUnitSighted, OwnMilitaryUnitCompleted, OwnMilitaryUnitDied,
    OwnStructureCompleted, OwnUnitChangedType,
};
use crate::sensors::{Sensor, SensorEvent, SensorInbox, SensorKind};
use crate::world::typedata::TypeCatalog;
use crate::world::units::{UnitFilter, UnitRegistry};

/// Identifier handed back on subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    kind: SensorKind,
    /// Gates delivery: the notification is delivered only if the filter,
    /// applied to the affected set, yields a non-empty subset. The full
    /// unfiltered set is still what lands in the inbox.
    filter: Option<UnitFilter>,
    once: bool,
    inbox: SensorInbox,
    expired: bool,
}

/// Owns all sensor instances and ticks them in registration order.
pub struct SensorRegistry {
    sensors: Vec<Box<dyn Sensor>>,
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl SensorRegistry {
    /// Empty registry; sensors are added explicitly (tests use this)
    pub fn new() -> Self {
        Self { sensors: Vec::new(), subscriptions: Vec::new(), next_id: 0 }
    }

    /// Registry with the full standard sensor suite
    pub fn with_standard_sensors() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(OwnStructureCompleted::default()));
        registry.register(Box::new(OwnMilitaryUnitCompleted::default()));
        registry.register(Box::new(OwnMilitaryUnitDied::default()));
        registry.register(Box::new(OwnUnitChangedType::default()));
        registry.register(Box::new(EnemyUnitSighted::default()));
        registry.register(Box::new(EnemyResourceCenterSighted::default()));
        registry
    }

    pub fn register(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    /// Subscribe an inbox to a sensor kind, optionally filtered, optionally
    /// one-shot (removed after first delivery).
    pub fn subscribe(
        &mut self,
        kind: SensorKind,
        filter: Option<UnitFilter>,
        once: bool,
        inbox: SensorInbox,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, filter, once, inbox, expired: false });
        id
    }

    /// Remove a subscription by id
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|s| s.id != id);
    }

    /// Tick every sensor in registration order and deliver fired events to
    /// matching subscriptions synchronously. One-shot removals are deferred
    /// to after the dispatch loop so iteration is never invalidated.
    ///
    /// Returns the fired events for logging and tests.
    pub fn tick(&mut self, units: &UnitRegistry, types: &TypeCatalog) -> Vec<SensorEvent> {
        let mut fired = Vec::new();
        for sensor in &mut self.sensors {
            if let Some(event) = sensor.tick(units, types) {
                tracing::debug!(
                    kind = ?event.kind,
                    affected = event.tags.len(),
                    "sensor fired"
                );
                fired.push(event);
            }
        }

        for event in &fired {
            for sub in &mut self.subscriptions {
                if sub.expired || sub.kind != event.kind {
                    continue;
                }
                if let Some(ref filter) = sub.filter {
                    // Filter matches against current registry records; tags
                    // already gone (death events) never pass a filter.
                    let any_match = event.tags.iter().any(|tag| {
                        units.get(*tag).map(|u| filter.matches(u, types)).unwrap_or(false)
                    });
                    if !any_match {
                        continue;
                    }
                }
                sub.inbox.push(event.clone());
                if sub.once {
                    sub.expired = true;
                }
            }
        }
        self.subscriptions.retain(|s| !s.expired);

        fired
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sanity::SanityMonitor;
    use crate::core::types::{Alliance, Point2, UnitTag, UnitTypeId};
    use crate::world::snapshot::{Observation, UnitObservation};

    fn enemy(tag: u64, type_id: u32) -> UnitObservation {
        UnitObservation {
            tag: UnitTag(tag),
            type_id: UnitTypeId(type_id),
            alliance: Alliance::Enemy,
            position: Point2::default(),
            health: 45.0,
            energy: 0.0,
            build_progress: 1.0,
            orders: vec![],
            buffs: vec![],
            is_dedicated_builder: false,
        }
    }

    fn refreshed(units: Vec<UnitObservation>, tick: u64, registry: &mut UnitRegistry) {
        let mut sanity = SanityMonitor::new();
        registry.refresh(&Observation { tick, units, ..Default::default() }, &mut sanity);
    }

    #[test]
    fn test_subscription_receives_full_affected_set() {
        let types = TypeCatalog::new();
        let mut units = UnitRegistry::new();
        let mut sensors = SensorRegistry::new();
        sensors.register(Box::new(EnemyUnitSighted::default()));

        let inbox = SensorInbox::new();
        // Filter on one specific type; delivery still carries every tag
        let filter = UnitFilter::enemy().with_type(UnitTypeId(48));
        sensors.subscribe(SensorKind::EnemyUnitSighted, Some(filter), false, inbox.clone());

        refreshed(vec![], 1, &mut units);
        sensors.tick(&units, &types); // dry run

        refreshed(vec![enemy(1, 48), enemy(2, 77)], 2, &mut units);
        sensors.tick(&units, &types);

        let delivered = inbox.drain();
        assert_eq!(delivered.len(), 1);
        // Filter gates delivery, it does not transform the payload
        assert_eq!(delivered[0].tags.len(), 2);
    }

    #[test]
    fn test_filter_gates_delivery() {
        let types = TypeCatalog::new();
        let mut units = UnitRegistry::new();
        let mut sensors = SensorRegistry::new();
        sensors.register(Box::new(EnemyUnitSighted::default()));

        let inbox = SensorInbox::new();
        let filter = UnitFilter::enemy().with_type(UnitTypeId(999));
        sensors.subscribe(SensorKind::EnemyUnitSighted, Some(filter), false, inbox.clone());

        refreshed(vec![], 1, &mut units);
        sensors.tick(&units, &types);
        refreshed(vec![enemy(1, 48)], 2, &mut units);
        let fired = sensors.tick(&units, &types);

        assert_eq!(fired.len(), 1, "sensor itself fires");
        assert!(inbox.is_empty(), "filtered subscriber sees nothing");
    }

    #[test]
    fn test_one_shot_subscription_removed_after_delivery() {
        let types = TypeCatalog::new();
        let mut units = UnitRegistry::new();
        let mut sensors = SensorRegistry::new();
        sensors.register(Box::new(EnemyUnitSighted::default()));

        let inbox = SensorInbox::new();
        sensors.subscribe(SensorKind::EnemyUnitSighted, None, true, inbox.clone());

        refreshed(vec![], 1, &mut units);
        sensors.tick(&units, &types);
        refreshed(vec![enemy(1, 48)], 2, &mut units);
        sensors.tick(&units, &types);
        assert_eq!(inbox.drain().len(), 1);

        // A second sighting no longer reaches the expired subscription
        refreshed(vec![enemy(1, 48), enemy(2, 48)], 3, &mut units);
        sensors.tick(&units, &types);
        assert!(inbox.is_empty());
    }
}

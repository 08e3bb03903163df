//! Property coverage for the resource ledger and the sensor dry run

mod common;

use proptest::prelude::*;

use overseer::core::config::BotConfig;
use overseer::core::sanity::SanityMonitor;
use overseer::sensors::SensorRegistry;
use overseer::world::snapshot::ResourceLedger;
use overseer::world::units::UnitRegistry;

use common::{terran_catalog, ObsBuilder, UnitBuilder};

proptest! {
    /// `spend` commits everything or nothing, and succeeds exactly when
    /// `can_afford` says so.
    #[test]
    fn test_ledger_spend_is_all_or_nothing(
        minerals in 0u32..2000,
        vespene in 0u32..1000,
        supply_used in 0u32..200,
        supply_cap in 0u32..200,
        cost_m in 0u32..1000,
        cost_v in 0u32..500,
        cost_f in 0u32..20,
    ) {
        let mut ledger = ResourceLedger { minerals, vespene, supply_used, supply_cap };
        let before = ledger;
        let affordable = ledger.can_afford(cost_m, cost_v, cost_f);
        let committed = ledger.spend(cost_m, cost_v, cost_f);
        prop_assert_eq!(committed, affordable);
        if committed {
            prop_assert_eq!(ledger.minerals, before.minerals - cost_m);
            prop_assert_eq!(ledger.vespene, before.vespene - cost_v);
            prop_assert_eq!(ledger.supply_used, before.supply_used + cost_f);
        } else {
            prop_assert_eq!(ledger.minerals, before.minerals);
            prop_assert_eq!(ledger.vespene, before.vespene);
            prop_assert_eq!(ledger.supply_used, before.supply_used);
        }
        prop_assert_eq!(ledger.supply_cap, before.supply_cap);
    }

    /// No sensor fires on its first tick, whatever the world already
    /// contains when the bot connects.
    #[test]
    fn test_sensors_stay_silent_on_their_first_tick(
        tags in prop::collection::hash_set(1u64..500, 0..40),
    ) {
        let config = BotConfig::default();
        let types = terran_catalog(&config);
        let mut units = UnitRegistry::new();
        let mut sanity = SanityMonitor::new();
        let mut sensors = SensorRegistry::with_standard_sensors();

        // A grab bag of everything the detectors track: own military,
        // own structures (some incomplete), enemy army, enemy town halls
        let mut obs = ObsBuilder::new(1).minerals(500);
        for (i, tag) in tags.iter().enumerate() {
            let unit = match i % 4 {
                0 => UnitBuilder::new(*tag, config.military_type).build(),
                1 => UnitBuilder::new(*tag, config.house_type).progress(0.5).build(),
                2 => UnitBuilder::new(*tag, config.military_type).enemy().build(),
                _ => UnitBuilder::new(*tag, config.townhall_type).enemy().build(),
            };
            obs = obs.unit(unit);
        }
        units.refresh(&obs.build(), &mut sanity);

        let fired = sensors.tick(&units, &types);
        prop_assert!(fired.is_empty(), "dry run must not fire: {:?}", fired);
    }
}

//! Always-on supply margin policy
//!
//! Runs before the active build order every tick: whenever projected supply
//! capacity minus used supply drops below the tick's margin, house
//! construction is queued. Running first gives supply priority over the
//! plan head when resources are contested.

use crate::bot::TickContext;
use crate::build::maintenance::MaintenanceSet;
use crate::build::{queued_builds, try_place_structure};

#[derive(Debug, Default)]
pub struct SupplyPolicy;

impl SupplyPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Queue house placements until the projected margin is met.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>, maintenance: &mut MaintenanceSet) {
        let house = ctx.config.house_type;
        let Some(data) = ctx.types.unit(house) else {
            ctx.sanity.fail(format!("house type {:?} missing from type catalog", house));
            return;
        };
        let per_house = data.food_provided;
        if per_house == 0 {
            ctx.sanity.fail(format!("{} provides no supply", data.name));
            return;
        }
        // Supply never exceeds the engine cap; past that, more houses are waste
        if ctx.ledger.supply_cap >= 200 {
            return;
        }
        let margin = ctx.config.supply_margin_at(ctx.tick);

        // Houses not yet contributing capacity: incomplete, en route, or
        // queued into the order sink earlier this very tick
        loop {
            let pending = ctx.units.count_builders_en_route(house, ctx.types) as u32
                + ctx
                    .units
                    .iter()
                    .filter(|u| {
                        u.alliance == crate::core::types::Alliance::Own
                            && u.type_id == house
                            && !u.is_complete()
                    })
                    .count() as u32
                + queued_builds(ctx, house) as u32;
            let projected_cap = ctx.ledger.supply_cap + pending * per_house;
            let projected_free = projected_cap.saturating_sub(ctx.ledger.supply_used);
            if projected_free >= margin {
                return;
            }
            if !try_place_structure(ctx, house, maintenance) {
                // Unaffordable or no builder; retried next tick
                return;
            }
        }
    }
}

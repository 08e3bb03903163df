//! Bot configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other. Type and ability identifiers are
//! game data the embedder supplies; the defaults match a Terran loadout.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{AbilityId, BuffId, Race, UnitTypeId};

/// Configuration for the decision pipeline
///
/// These values have been tuned for a standard macro opening. Changing them
/// affects pacing: how early the bot saturates, supplies, scouts and attacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Race this bot plays, used to filter build-order candidates
    pub race: Race,

    // === ECONOMY ===
    /// Target worker count per owned base
    ///
    /// The strategic goal manager stays in EconomyFocus until worker count
    /// reaches this ratio times the number of owned town halls. 16 covers
    /// two workers per mineral patch on a standard base.
    pub worker_saturation_per_base: u32,

    /// Mineral reserve above which expanding becomes attractive
    ///
    /// Banked minerals beyond this while already saturated indicate the
    /// economy has outgrown its bases.
    pub expand_mineral_reserve: u32,

    // === SUPPLY MARGIN POLICY ===
    /// Baseline free-supply margin maintained at all times
    ///
    /// Whenever projected capacity (current plus pending houses) minus used
    /// supply falls below the margin, house construction is queued.
    pub supply_margin_base: u32,

    /// Hard cap on the margin as it tightens over the match
    pub supply_margin_max: u32,

    /// Ticks per +1 margin tightening step
    ///
    /// Production scales up as the match progresses, so the margin must
    /// grow too: at 2240 ticks (~100 game seconds) per step, the margin
    /// reaches its cap around the mid game.
    pub supply_margin_tighten_interval: u64,

    // === MILITARY ===
    /// Army food total at which the bot shifts from defense to attack
    pub attack_army_supply: u32,

    /// Minimum ticks between repeated orders to the same squad
    ///
    /// Attack-move targets rarely change tick to tick; re-issuing every
    /// tick spams the engine for no behavioral gain.
    pub squad_order_interval: u64,

    // === SCOUTING ===
    /// Whether a worker scout is dispatched automatically
    pub enable_scouting: bool,

    /// Tick at which the scout squad is formed
    pub scout_dispatch_tick: u64,

    /// Orbit radius around the discovered enemy base (map units)
    pub scout_orbit_radius: f32,

    /// Angular step per orbit update, in degrees
    pub scout_orbit_step_deg: f32,

    /// Ticks between orbit waypoint updates
    ///
    /// The scout keeps moving between updates; updating every tick would
    /// emit one order per frame without changing the path meaningfully.
    pub scout_update_interval: u64,

    // === PRODUCTION BOOST ===
    /// Ability that applies the production/research boost
    pub boost_ability: AbilityId,

    /// Buff present on a structure while the boost is active
    pub boost_buff: BuffId,

    /// Energy the boost costs its caster
    pub boost_energy_cost: f32,

    // === UNIT TYPES (game data, embedder-supplied) ===
    /// Worker unit type
    pub worker_type: UnitTypeId,
    /// Supply structure ("house") type queued by the margin policy
    pub house_type: UnitTypeId,
    /// Town hall type, counted as a base
    pub townhall_type: UnitTypeId,
    /// Basic production structure type
    pub production_type: UnitTypeId,
    /// Basic military unit type
    pub military_type: UnitTypeId,

    // === GENERIC ABILITIES ===
    /// Plain move
    pub move_ability: AbilityId,
    /// Attack-move
    pub attack_ability: AbilityId,

    // === BACKGROUND RECOMPUTE ===
    /// Wall-clock interval between strategic map recomputes, in
    /// milliseconds. The map worker runs at its own pace and the tick
    /// thread never waits on it.
    pub recompute_interval_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            race: Race::Terran,
            worker_saturation_per_base: 16,
            expand_mineral_reserve: 800,
            supply_margin_base: 2,
            supply_margin_max: 8,
            supply_margin_tighten_interval: 2240,
            attack_army_supply: 30,
            squad_order_interval: 16,
            enable_scouting: true,
            scout_dispatch_tick: 100,
            scout_orbit_radius: 12.0,
            scout_orbit_step_deg: 30.0,
            scout_update_interval: 8,
            boost_ability: AbilityId(3755),
            boost_buff: BuffId(49),
            boost_energy_cost: 50.0,
            worker_type: UnitTypeId(45),
            house_type: UnitTypeId(19),
            townhall_type: UnitTypeId(18),
            production_type: UnitTypeId(21),
            military_type: UnitTypeId(48),
            move_ability: AbilityId(16),
            attack_ability: AbilityId(23),
            recompute_interval_ms: 250,
        }
    }
}

impl BotConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Free-supply margin required at the given tick
    ///
    /// Starts at `supply_margin_base` and tightens by one per
    /// `supply_margin_tighten_interval` ticks, capped at `supply_margin_max`.
    pub fn supply_margin_at(&self, tick: u64) -> u32 {
        let steps = (tick / self.supply_margin_tighten_interval.max(1)) as u32;
        (self.supply_margin_base + steps).min(self.supply_margin_max)
    }
}

//! Static unit-type and upgrade data catalog
//!
//! Costs, food, classification flags and production relationships come from
//! the game's static data; the embedder loads them once at startup. The
//! decision core only ever queries this catalog.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{AbilityId, UnitTypeId, UpgradeId};
use crate::world::snapshot::ResourceLedger;
use crate::world::units::UnitRegistry;

/// Static data for one unit type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTypeData {
    pub name: String,
    pub mineral_cost: u32,
    pub vespene_cost: u32,
    /// Supply this unit consumes (0 for structures)
    pub food_required: u32,
    /// Supply this unit provides (houses, town halls)
    pub food_provided: u32,
    pub is_structure: bool,
    pub is_worker: bool,
    pub is_townhall: bool,
    /// Counts toward army strength and triggers military sensors
    pub is_military: bool,
    /// Ability a worker uses to place this structure
    pub build_ability: Option<AbilityId>,
    /// Structure type that trains this unit
    pub produced_by: Option<UnitTypeId>,
    /// Ability the producer uses to train this unit
    pub train_ability: Option<AbilityId>,
    /// Structure type that must exist (completed) before this can be made
    pub tech_requirement: Option<UnitTypeId>,
}

/// Static data for one upgrade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeData {
    pub name: String,
    pub mineral_cost: u32,
    pub vespene_cost: u32,
    /// Structure type that researches this upgrade
    pub researched_by: UnitTypeId,
    /// Ability the researcher uses to start the research
    pub research_ability: AbilityId,
}

/// Catalog of all static type data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    units: AHashMap<UnitTypeId, UnitTypeData>,
    upgrades: AHashMap<UpgradeId, UpgradeData>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON dump of the game's static data
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn insert_unit(&mut self, id: UnitTypeId, data: UnitTypeData) {
        self.units.insert(id, data);
    }

    pub fn insert_upgrade(&mut self, id: UpgradeId, data: UpgradeData) {
        self.upgrades.insert(id, data);
    }

    pub fn unit(&self, id: UnitTypeId) -> Option<&UnitTypeData> {
        self.units.get(&id)
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&UpgradeData> {
        self.upgrades.get(&id)
    }

    /// Can the ledger afford one unit of this type right now?
    pub fn can_afford(&self, id: UnitTypeId, ledger: &ResourceLedger) -> bool {
        self.unit(id)
            .map(|d| ledger.can_afford(d.mineral_cost, d.vespene_cost, d.food_required))
            .unwrap_or(false)
    }

    /// Are the tech prerequisites for this type satisfied?
    ///
    /// A missing requirement entry means no prerequisite. The requirement is
    /// satisfied by any own, completed structure of the required type.
    pub fn tech_ready(&self, id: UnitTypeId, units: &UnitRegistry) -> bool {
        match self.unit(id).and_then(|d| d.tech_requirement) {
            None => true,
            Some(req) => units.count_own_completed(req) > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_marine() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.insert_unit(
            UnitTypeId(48),
            UnitTypeData {
                name: "Marine".into(),
                mineral_cost: 50,
                vespene_cost: 0,
                food_required: 1,
                food_provided: 0,
                is_structure: false,
                is_worker: false,
                is_townhall: false,
                is_military: true,
                build_ability: None,
                produced_by: Some(UnitTypeId(21)),
                train_ability: Some(AbilityId(560)),
                tech_requirement: Some(UnitTypeId(21)),
            },
        );
        catalog
    }

    #[test]
    fn test_can_afford_checks_all_three_resources() {
        let catalog = catalog_with_marine();
        let rich = ResourceLedger { minerals: 50, vespene: 0, supply_used: 10, supply_cap: 20 };
        assert!(catalog.can_afford(UnitTypeId(48), &rich));

        let supply_blocked = ResourceLedger { minerals: 500, vespene: 0, supply_used: 20, supply_cap: 20 };
        assert!(!catalog.can_afford(UnitTypeId(48), &supply_blocked));
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = catalog_with_marine();
        let text = serde_json::to_string(&catalog).unwrap();
        let parsed = TypeCatalog::from_json_str(&text).unwrap();
        assert_eq!(parsed.unit(UnitTypeId(48)).unwrap().mineral_cost, 50);
        assert!(parsed.unit(UnitTypeId(999)).is_none());
    }

    #[test]
    fn test_malformed_catalog_json_is_an_error() {
        assert!(TypeCatalog::from_json_str("{\"units\": 3}").is_err());
    }

    #[test]
    fn test_unknown_type_is_never_affordable() {
        let catalog = catalog_with_marine();
        let ledger = ResourceLedger { minerals: 9999, vespene: 9999, supply_used: 0, supply_cap: 200 };
        assert!(!catalog.can_afford(UnitTypeId(999), &ledger));
    }
}

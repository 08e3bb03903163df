//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (one discrete decision cycle)
pub type Tick = u64;

/// Opaque stable unit identifier assigned by the game engine.
///
/// Tags survive across ticks for as long as the unit is observed; a tag that
/// disappears from the snapshot means the unit died or left vision.
///
/// Ordered so tag comparison can break ties deterministically when several
/// units qualify for the same duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitTag(pub u64);

/// Unit type identifier from the game's static data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitTypeId(pub u32);

/// Ability identifier (move, attack, build X, train Y, research Z, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

/// Upgrade/research identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeId(pub u32);

/// Buff identifier (temporary effects such as a production boost)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuffId(pub u32);

/// Who owns an observed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alliance {
    Own,
    Enemy,
    Neutral,
}

/// Playable race, used to filter build-order candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Terran,
    Protoss,
    Zerg,
}

/// 2D map position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Point at `radius` from `center` at the given angle (radians)
    pub fn on_circle(center: Point2, radius: f32, angle: f32) -> Self {
        Self {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }
}

impl std::ops::Add for Point2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Point2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Point2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tag_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<UnitTag, &str> = HashMap::new();
        map.insert(UnitTag(42), "scv");
        assert_eq!(map.get(&UnitTag(42)), Some(&"scv"));
        assert_eq!(map.get(&UnitTag(43)), None);
    }

    #[test]
    fn test_unit_tag_orders_by_value() {
        let mut tags = vec![UnitTag(30), UnitTag(7), UnitTag(12)];
        tags.sort();
        assert_eq!(tags, vec![UnitTag(7), UnitTag(12), UnitTag(30)]);
        assert_eq!(tags.iter().min(), Some(&UnitTag(7)));
    }

    #[test]
    fn test_point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_on_circle() {
        let c = Point2::new(10.0, 10.0);
        let p = Point2::on_circle(c, 2.0, 0.0);
        assert!((p.x - 12.0).abs() < 1e-5);
        assert!((p.y - 10.0).abs() < 1e-5);
    }
}

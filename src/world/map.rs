//! Narrow query surface over the static map analysis layer
//!
//! Ramp/chokepoint detection, base-location inference and pathfinding live
//! outside this core; the bot consumes their answers through this struct.
//! Absence of an answer is a valid state (e.g. the enemy base has not been
//! found yet) and consumers must no-op gracefully rather than guess.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2;

/// Map metadata and analysis results, filled in by the excluded
/// map-analysis layer at startup and as intel improves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapInfo {
    pub width: u32,
    pub height: u32,
    /// Center of our starting base
    pub own_start: Option<Point2>,
    /// Defensible chokepoint (ramp) near the main base
    pub main_ramp: Option<Point2>,
    /// Natural expansion town-hall site
    pub natural_site: Option<Point2>,
    /// Best current guess at the enemy main base
    pub enemy_base_guess: Option<Point2>,
    /// Candidate build sites near the main, reserved-space aware
    pub build_sites: Vec<Point2>,
}

impl MapInfo {
    /// Next free build site near the main base.
    ///
    /// Sites are handed out round-robin by index; the engine-side placement
    /// validator has final say, which is why placements are re-checked one
    /// tick later.
    pub fn build_site(&self, index: usize) -> Option<Point2> {
        if self.build_sites.is_empty() {
            return None;
        }
        Some(self.build_sites[index % self.build_sites.len()])
    }

    /// Nearest known pathable point to the target, preferring exact
    pub fn nearest_pathable(&self, target: Point2) -> Point2 {
        // The pathfinding grid lives outside this core; the target itself is
        // the best available answer here.
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sites_round_robin() {
        let map = MapInfo {
            build_sites: vec![Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)],
            ..Default::default()
        };
        assert_eq!(map.build_site(0), Some(Point2::new(1.0, 1.0)));
        assert_eq!(map.build_site(1), Some(Point2::new(2.0, 2.0)));
        assert_eq!(map.build_site(2), Some(Point2::new(1.0, 1.0)));
    }

    #[test]
    fn test_no_sites_is_a_valid_state() {
        let map = MapInfo::default();
        assert_eq!(map.build_site(0), None);
        assert_eq!(map.enemy_base_guess, None);
    }
}

//! Threat and opportunity grids over the map
//!
//! Computed from a cheap world sample: enemy military projects threat in a
//! falloff radius around itself, enemy structures project value. The
//! opportunity score per cell is value minus threat; the most vulnerable
//! point is the cell maximizing it. Row computation parallelizes with
//! rayon since cells are independent.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::{Point2, Tick};

/// Radius (map units) around a unit inside which it projects influence
const INFLUENCE_RADIUS: f32 = 10.0;

/// One grid cell per whole map unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    cells: Vec<f32>,
}

impl Grid {
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self { width, height, cells: vec![0.0; (width * height) as usize] }
    }

    pub fn at(&self, x: u32, y: u32) -> f32 {
        self.cells[(y * self.width + x) as usize]
    }

    fn from_rows(width: u32, height: u32, rows: Vec<Vec<f32>>) -> Self {
        Self { width, height, cells: rows.into_iter().flatten().collect() }
    }

    /// Cellwise difference of two same-sized grids
    fn minus(&self, other: &Grid) -> Grid {
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| a - b)
            .collect();
        Grid { width: self.width, height: self.height, cells }
    }
}

/// The tick thread's cheap copy of what map analysis needs
#[derive(Debug, Clone, Default)]
pub struct WorldSample {
    pub tick: Tick,
    pub width: u32,
    pub height: u32,
    /// Enemy military positions with their food cost as weight
    pub enemy_military: Vec<(Point2, f32)>,
    /// Enemy structure positions
    pub enemy_structures: Vec<Point2>,
}

/// One finished analysis result, immutable once published
#[derive(Debug, Clone)]
pub struct StrategicMaps {
    /// Monotonic publish counter, assigned by the worker
    pub version: u64,
    /// Tick of the sample this was computed from
    pub computed_at: Tick,
    pub threat: Grid,
    pub value: Grid,
    /// Value minus threat per cell; high means worth attacking
    pub vulnerability: Grid,
}

impl StrategicMaps {
    /// Full recompute from a sample. Runs on the worker thread.
    pub fn compute(sample: &WorldSample, version: u64) -> Self {
        let threat = influence_grid(sample.width, sample.height, || {
            sample.enemy_military.iter().copied()
        });
        let value = influence_grid(sample.width, sample.height, || {
            sample.enemy_structures.iter().map(|p| (*p, 1.0))
        });
        let vulnerability = value.minus(&threat);
        Self { version, computed_at: sample.tick, threat, value, vulnerability }
    }

    /// Highest-vulnerability cell with any enemy value on it: where
    /// attacking hurts the enemy most for the least resistance. None when
    /// nothing enemy is known.
    pub fn most_vulnerable(&self) -> Option<Point2> {
        let width = self.value.width;
        let height = self.value.height;
        let mut best: Option<(f32, Point2)> = None;
        for y in 0..height {
            for x in 0..width {
                if self.value.at(x, y) <= 0.0 {
                    continue;
                }
                let score = self.vulnerability.at(x, y);
                let point = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if best.map(|(s, _)| score > s).unwrap_or(true) {
                    best = Some((score, point));
                }
            }
        }
        best.map(|(_, p)| p)
    }
}

/// Linear-falloff influence projected onto every cell within range
fn influence_grid<I, F>(width: u32, height: u32, sources: F) -> Grid
where
    I: Iterator<Item = (Point2, f32)>,
    F: Fn() -> I + Sync,
{
    if width == 0 || height == 0 {
        return Grid::zeroed(width, height);
    }
    let rows: Vec<Vec<f32>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| {
                    let cell = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                    sources()
                        .map(|(pos, weight)| {
                            let d = cell.distance(&pos);
                            if d >= INFLUENCE_RADIUS {
                                0.0
                            } else {
                                weight * (1.0 - d / INFLUENCE_RADIUS)
                            }
                        })
                        .sum()
                })
                .collect()
        })
        .collect();
    Grid::from_rows(width, height, rows)
}

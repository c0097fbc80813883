//! Spatial improvement influence: how strongly nearby eco-improvements
//! suppress the global smog level at a given tile. Pure reads over the grid,
//! queried per tile by whatever is rendering.

use crate::grid::{Tile, WorldGrid};

const RADIUS: i64 = 3;
const GREEN_FACTOR: f64 = 0.6;
const UPGRADED_ROAD_FACTOR: f64 = 0.4;
const SOLAR_FACTOR: f64 = 0.5;
const INFLUENCE_CAP: f64 = 2.5;

/// Per-unit-of-influence reduction of the local smog fraction.
const SMOG_SUPPRESSION: f64 = 0.12;
/// Local intensities at or below this read as clear air.
pub const CLEAR_THRESHOLD: f64 = 0.05;

/// Sum of `factor / max(1, manhattan distance)` over the square radius-3
/// neighborhood, clamped to the grid and capped at 2.5. A neighbor
/// contributes at most one factor.
pub fn improvement_influence(grid: &WorldGrid, x: usize, y: usize) -> f64 {
    let mut influence = 0.0;
    for dy in -RADIUS..=RADIUS {
        for dx in -RADIUS..=RADIUS {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let weight = 1.0 / (dx.abs() + dy.abs()).max(1) as f64;
            let factor = match grid.tile(nx as usize, ny as usize) {
                Tile::Green { .. } => GREEN_FACTOR,
                Tile::Road { upgraded: true } => UPGRADED_ROAD_FACTOR,
                Tile::Building { has_solar: true } => SOLAR_FACTOR,
                _ => continue,
            };
            influence += factor * weight;
        }
    }
    influence.min(INFLUENCE_CAP)
}

/// Local smog intensity in [0, 1]: the global carbon fraction minus the
/// local suppression, floored at zero.
pub fn local_smog(grid: &WorldGrid, carbon: f64, x: usize, y: usize) -> f64 {
    (carbon / 100.0 - SMOG_SUPPRESSION * improvement_influence(grid, x, y)).max(0.0)
}

pub fn is_clear(local: f64) -> bool {
    local <= CLEAR_THRESHOLD
}

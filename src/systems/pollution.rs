use anyhow::Result;
use rand::seq::index::sample;

use crate::{
    engine::{System, SystemContext},
    grid::Tile,
    rng::{RngExt, SystemRng},
    world::World,
};

/// Per-frame chance that one Empty tile spontaneously turns into pollution.
const AMBIENT_SPAWN_CHANCE: f64 = 0.005;
/// Per-frame chance of a littering event.
const LITTER_EVENT_CHANCE: f64 = 0.01;
/// Citizens checked per littering event.
const LITTER_SAMPLE: usize = 2;
/// Chance that a road tile near a sampled citizen collects litter.
const ROAD_LITTER_CHANCE: f64 = 0.3;

/// Keeps the pressure on: ambient pollution spawn plus incidental littering
/// around roads citizens walk past. Only Empty tiles are ever converted, so
/// existing pollution and rubbish bins are never overwritten.
pub struct PollutionSystem;

impl PollutionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PollutionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PollutionSystem {
    fn name(&self) -> &'static str {
        "pollution"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if rng.chance(AMBIENT_SPAWN_CHANCE) {
            let empties = world.grid().positions_where(|t| matches!(t, Tile::Empty));
            if !empties.is_empty() {
                let &(x, y) = rng.pick(&empties);
                world.grid_mut().set_tile(x, y, Tile::pollution(1));
                tracing::debug!(x, y, "ambient pollution spawned");
            }
        }

        if rng.chance(LITTER_EVENT_CHANCE) && !world.citizens().is_empty() {
            let count = world.citizens().len().min(LITTER_SAMPLE);
            let picked = sample(rng, world.citizens().len(), count);
            for index in picked {
                let (cx, cy) = world.citizens()[index].cell();
                litter_near_roads(world, rng, cx, cy);
            }
        }

        Ok(())
    }
}

/// Each road tile in the citizen's 3x3 neighborhood has an independent
/// chance to push litter onto the first Empty tile in its own 3x3
/// neighborhood (scan order), one conversion per road tile.
fn litter_near_roads(world: &mut World, rng: &mut SystemRng<'_>, cx: usize, cy: usize) {
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if !world.grid().in_bounds(nx, ny) {
                continue;
            }
            if !matches!(world.grid().tile(nx as usize, ny as usize), Tile::Road { .. }) {
                continue;
            }
            if !rng.chance(ROAD_LITTER_CHANCE) {
                continue;
            }
            'spot: for ady in -1i64..=1 {
                for adx in -1i64..=1 {
                    let ax = nx + adx;
                    let ay = ny + ady;
                    if world.grid().in_bounds(ax, ay)
                        && matches!(world.grid().tile(ax as usize, ay as usize), Tile::Empty)
                    {
                        world
                            .grid_mut()
                            .set_tile(ax as usize, ay as usize, Tile::pollution(1));
                        tracing::debug!(x = ax, y = ay, "citizen littered near road");
                        break 'spot;
                    }
                }
            }
        }
    }
}

use rand::Rng;
use serde::Serialize;

use crate::config::GridConfig;

/// Planted green space flavor. Chosen at random when a tile is planted;
/// purely cosmetic but part of the observable tile state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreenKind {
    Flowers,
    Trees,
    Garden,
}

pub const GREEN_KINDS: [GreenKind; 3] = [GreenKind::Flowers, GreenKind::Trees, GreenKind::Garden];

/// One grid cell. Kind-specific attributes live inside their variant, so
/// converting a tile can never leave a stale flag behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tile {
    Empty,
    Road { upgraded: bool },
    Building { has_solar: bool },
    Park,
    Green { green: GreenKind },
    Pollution { amount: u8, cleaned: bool },
    RubbishBin,
}

impl Tile {
    pub fn road() -> Self {
        Tile::Road { upgraded: false }
    }

    pub fn building() -> Self {
        Tile::Building { has_solar: false }
    }

    pub fn pollution(amount: u8) -> Self {
        Tile::Pollution {
            amount,
            cleaned: false,
        }
    }

    /// Eligible to hold a scrap collectible.
    pub fn holds_scraps(&self) -> bool {
        matches!(self, Tile::Empty | Tile::Park)
    }
}

// Category weights for non-road cells. Fixed constants; the scenario only
// chooses the lane layout.
const BUILDING_WEIGHT: f64 = 0.25;
const POLLUTION_WEIGHT: f64 = 0.10;
const PARK_WEIGHT: f64 = 0.15;

// Rejection-sampling budget for scrap placement. Guarantees termination on
// grids with too few eligible tiles.
const SCRAP_ATTEMPTS: usize = 600;

/// Fixed-size rectangular tile grid, row-major. Owned by the simulation;
/// everything outside reads it through snapshots.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// Deterministic road lanes at the configured rows/columns; every other
    /// cell drawn independently from the fixed category weights. With
    /// pollution disabled its band falls through to Empty so the remaining
    /// weights are unchanged.
    pub fn generate(config: &GridConfig, pollution_enabled: bool, rng: &mut impl Rng) -> Self {
        let mut tiles = Vec::with_capacity(config.width * config.height);
        for y in 0..config.height {
            for x in 0..config.width {
                if config.road_rows.contains(&y) || config.road_cols.contains(&x) {
                    tiles.push(Tile::road());
                    continue;
                }
                let r: f64 = rng.gen();
                let tile = if r < BUILDING_WEIGHT {
                    Tile::building()
                } else if r < BUILDING_WEIGHT + POLLUTION_WEIGHT {
                    if pollution_enabled {
                        Tile::pollution(rng.gen_range(1..=3))
                    } else {
                        Tile::Empty
                    }
                } else if r < BUILDING_WEIGHT + POLLUTION_WEIGHT + PARK_WEIGHT {
                    Tile::Park
                } else {
                    Tile::Empty
                };
                tiles.push(tile);
            }
        }
        Self {
            width: config.width,
            height: config.height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Panics on out-of-bounds access; indices come from the clamped player
    /// position or from bounds-checked scans.
    pub fn tile(&self, x: usize, y: usize) -> Tile {
        self.tiles[self.index(x, y)]
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> &mut Tile {
        let index = self.index(x, y);
        &mut self.tiles[index]
    }

    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        let index = self.index(x, y);
        self.tiles[index] = tile;
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &tile)| (i % self.width, i / self.width, tile))
    }

    /// All positions whose tile satisfies the predicate, scan order.
    pub fn positions_where(&self, pred: impl Fn(Tile) -> bool) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|&(_, _, tile)| pred(tile))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Picks up to `count` distinct Empty/Park positions by rejection
    /// sampling, capped at a fixed attempt budget. Returning fewer than
    /// `count` is a normal outcome on crowded grids.
    pub fn spawn_scraps(&self, count: usize, rng: &mut impl Rng) -> Vec<(usize, usize)> {
        let mut spots: Vec<(usize, usize)> = Vec::new();
        let mut attempts = 0;
        while spots.len() < count && attempts < SCRAP_ATTEMPTS {
            attempts += 1;
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            if self.tile(x, y).holds_scraps() && !spots.contains(&(x, y)) {
                spots.push((x, y));
            }
        }
        spots
    }

    /// Round reset: planted green reverts to Empty, solar and road upgrades
    /// come off. Generated terrain (roads, buildings, parks, pollution,
    /// bins) stays.
    pub fn clear_improvements(&mut self) {
        for tile in &mut self.tiles {
            match *tile {
                Tile::Green { .. } => *tile = Tile::Empty,
                Tile::Road { upgraded: true } => *tile = Tile::road(),
                Tile::Building { has_solar: true } => *tile = Tile::building(),
                _ => {}
            }
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "tile ({x}, {y}) out of bounds");
        y * self.width + x
    }
}

use rand::Rng;

use crate::rng::RngExt;

/// Axis-aligned unit directions a citizen can walk in.
pub const DIRECTIONS: [(f64, f64); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

const TURN_CHANCE: f64 = 0.05;
const STEP_LENGTH: f64 = 0.1;

/// Background inhabitant. Positions use grid-cell units with sub-tile
/// precision; mood lives in [0, 1] and trails the global happiness metric.
#[derive(Debug, Clone)]
pub struct Citizen {
    pub pos: [f64; 2],
    pub dir: (f64, f64),
    pub mood: f64,
}

impl Citizen {
    pub fn spawn(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        Self {
            pos: [
                rng.gen_range(0.0..=(width - 1) as f64),
                rng.gen_range(0.0..=(height - 1) as f64),
            ],
            dir: *rng.pick(&DIRECTIONS),
            mood: 0.4,
        }
    }

    /// Random walk: occasionally pick a new direction, then drift one step
    /// along it, clamped to the grid.
    pub fn step(&mut self, width: usize, height: usize, rng: &mut impl Rng) {
        if rng.chance(TURN_CHANCE) {
            self.dir = *rng.pick(&DIRECTIONS);
        }
        self.pos[0] = (self.pos[0] + self.dir.0 * STEP_LENGTH).clamp(0.0, (width - 1) as f64);
        self.pos[1] = (self.pos[1] + self.dir.1 * STEP_LENGTH).clamp(0.0, (height - 1) as f64);
    }

    /// Tile the citizen currently stands on.
    pub fn cell(&self) -> (usize, usize) {
        (self.pos[0] as usize, self.pos[1] as usize)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn spawn_lands_inside_the_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..50 {
            let citizen = Citizen::spawn(10, 16, &mut rng);
            assert!((0.0..=9.0).contains(&citizen.pos[0]));
            assert!((0.0..=15.0).contains(&citizen.pos[1]));
            assert_eq!(citizen.mood, 0.4);
        }
    }

    #[test]
    fn steps_stay_clamped_to_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let mut citizen = Citizen::spawn(5, 5, &mut rng);
        for _ in 0..500 {
            citizen.step(5, 5, &mut rng);
            assert!((0.0..=4.0).contains(&citizen.pos[0]));
            assert!((0.0..=4.0).contains(&citizen.pos[1]));
        }
    }
}

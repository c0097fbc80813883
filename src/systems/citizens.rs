use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Mood relaxation rate toward the global happiness fraction, per frame.
const MOOD_RATE: f64 = 0.02;

/// Random-walks every citizen and eases their mood toward the global
/// happiness level.
pub struct CitizenSystem;

impl CitizenSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CitizenSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CitizenSystem {
    fn name(&self) -> &'static str {
        "citizens"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let target = world.metrics().happiness / 100.0;
        let width = world.grid().width();
        let height = world.grid().height();
        for citizen in world.citizens_mut() {
            citizen.mood += (target - citizen.mood) * MOOD_RATE;
            citizen.step(width, height, rng);
        }
        Ok(())
    }
}

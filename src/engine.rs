use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use crate::{
    actions::ActionOutcome,
    config::Scenario,
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    systems::{CitizenSystem, PollutionSystem},
    world::{RoundState, World, WorldSnapshot},
};

pub struct EngineSettings {
    pub snapshot_interval_frames: u64,
    pub snapshot_dir: PathBuf,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            snapshot_interval_frames: scenario.snapshot_interval_frames,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }
}

/// Per-frame data handed to every system.
pub struct SystemContext {
    pub frame: u64,
    pub dt_seconds: f64,
}

/// A background process run once per simulated frame while the round is
/// active. Systems mutate the world through its normal API and draw
/// randomness only from their own named stream.
pub trait System: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&mut self, ctx: &SystemContext, world: &mut World, rng: &mut SystemRng<'_>)
        -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub frame: u64,
    pub round: RoundState,
    pub system_reports: Vec<SystemRunReport>,
    pub snapshot_path: Option<PathBuf>,
}

/// Owns the complete simulation: world state, seeded RNG streams, the
/// background systems and the round countdown. The driver (CLI, web
/// observer, a real UI) owns the clock and calls `advance` at its frame
/// cadence; input handling funnels through the action methods on the same
/// timeline, so nothing here needs locking.
pub struct Engine {
    world: World,
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
}

impl Engine {
    pub fn from_scenario(scenario: &Scenario, settings: EngineSettings) -> Self {
        let mut rng = RngManager::new(scenario.seed);
        let world = World::generate(scenario, &mut rng.stream("worldgen"));
        let mut systems: Vec<Box<dyn System>> = vec![Box::new(CitizenSystem::new())];
        if scenario.features.pollution {
            systems.push(Box::new(PollutionSystem::new()));
        }
        let snapshot_writer = SnapshotWriter::new(
            settings.snapshot_dir,
            settings.snapshot_interval_frames,
        );
        Self {
            world,
            rng,
            systems,
            snapshot_writer,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Test and tooling access; renderers must stick to `snapshot`.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Advances the simulation by one frame of `dt` seconds: timer first,
    /// then the background systems. Outside an active round this is a no-op
    /// apart from the returned summary.
    pub fn advance(&mut self, dt: f64) -> Result<TickSummary> {
        let mut system_reports = Vec::new();
        let mut snapshot_path = None;

        if self.world.round().is_active() {
            self.world.advance_frame();
            if self.world.advance_timer(dt) {
                if let RoundState::Ended {
                    final_carbon,
                    final_happiness,
                } = self.world.round()
                {
                    tracing::info!(
                        final_carbon,
                        final_happiness,
                        world_health = self.world.world_health_score(),
                        "round ended"
                    );
                }
            } else {
                let ctx = SystemContext {
                    frame: self.world.frame(),
                    dt_seconds: dt,
                };
                for system in &mut self.systems {
                    let start = Instant::now();
                    let mut rng = self.rng.stream(system.name());
                    system.run(&ctx, &mut self.world, &mut rng)?;
                    system_reports.push(SystemRunReport {
                        name: system.name(),
                        duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
                    });
                }
                snapshot_path = self.snapshot_writer.maybe_write(&self.world)?;
            }
        }

        Ok(TickSummary {
            frame: self.world.frame(),
            round: self.world.round(),
            system_reports,
            snapshot_path,
        })
    }

    /// Drives `advance` for a number of frames at the scenario cadence.
    pub fn run(&mut self, frames: u64) -> Result<()> {
        self.run_with_hook(frames, |_| {})
    }

    /// Same, invoking the hook with a fresh snapshot after every frame.
    pub fn run_with_hook(
        &mut self,
        frames: u64,
        mut hook: impl FnMut(WorldSnapshot),
    ) -> Result<()> {
        let dt = self.world.scenario().frame_seconds;
        for _ in 0..frames {
            self.advance(dt)?;
            hook(self.world.snapshot());
        }
        Ok(())
    }

    // Round lifecycle triggers.

    /// Explicit start trigger: the countdown does not run before this.
    pub fn start(&mut self) -> ActionOutcome {
        match self.world.round() {
            RoundState::AwaitingStart => {
                self.world.start_round();
                tracing::info!(scenario = %self.world.scenario().name, "round started");
                ActionOutcome::applied("Round started!")
            }
            RoundState::Active { .. } => ActionOutcome::rejected("Round already running"),
            RoundState::Ended { .. } => {
                ActionOutcome::rejected("Round is over. Reset to play again")
            }
        }
    }

    /// Ended → Active with fresh metrics, a clean map and a full budget.
    pub fn reset_round(&mut self) -> ActionOutcome {
        match self.world.round() {
            RoundState::Ended { .. } => {
                self.world.reset_round(&mut self.rng.stream("worldgen"));
                tracing::info!(scenario = %self.world.scenario().name, "round reset");
                ActionOutcome::applied("New round started!")
            }
            RoundState::Active { .. } => ActionOutcome::rejected("Round still in progress"),
            RoundState::AwaitingStart => ActionOutcome::rejected("Round has not started yet"),
        }
    }

    // Action API. Every call is rejected outside an active round; inside
    // one, any call nudges the tutorial off its welcome message first.

    pub fn move_player(&mut self, dx: i64, dy: i64) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_move(dx, dy),
        }
    }

    pub fn place_solar(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_place_solar(),
        }
    }

    pub fn add_green(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => {
                let mut rng = self.rng.stream("actions");
                self.world.action_add_green(&mut rng)
            }
        }
    }

    pub fn upgrade_road(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_upgrade_road(),
        }
    }

    pub fn feed_building(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_feed_building(),
        }
    }

    pub fn clean_pollution(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_clean_pollution(),
        }
    }

    pub fn buy_solar(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_buy_solar(),
        }
    }

    pub fn buy_green(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_buy_green(),
        }
    }

    pub fn place_bin(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_place_bin(),
        }
    }

    pub fn toggle_missions_view(&mut self) -> ActionOutcome {
        match self.gate() {
            Some(rejected) => rejected,
            None => self.world.action_toggle_missions(),
        }
    }

    fn gate(&mut self) -> Option<ActionOutcome> {
        match self.world.round() {
            RoundState::Active { .. } => {
                self.world.tutorial_mut().note_any_action();
                None
            }
            RoundState::AwaitingStart => {
                Some(ActionOutcome::rejected("Round has not started yet"))
            }
            RoundState::Ended { .. } => {
                Some(ActionOutcome::rejected("Round is over. Reset to play again"))
            }
        }
    }
}

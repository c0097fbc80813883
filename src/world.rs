use rand::Rng;
use serde::Serialize;

use crate::{
    citizens::Citizen,
    config::Scenario,
    grid::{Tile, WorldGrid},
    influence,
    missions::{Mission, MissionBoard},
    tutorial::Tutorial,
};

/// The two global health metrics plus the derived counters shown on the HUD
/// and the end screen. Carbon and happiness are clamped to [0, 100] and are
/// the sole truth for world health.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GlobalMetrics {
    pub carbon: f64,
    pub happiness: f64,
    pub renewables: u32,
    pub green_spaces: u32,
    pub energy: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub money: u32,
    pub solar_panels: u32,
    pub green_spaces: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoundState {
    AwaitingStart,
    Active { elapsed: f64, remaining: f64 },
    Ended { final_carbon: f64, final_happiness: f64 },
}

impl RoundState {
    pub fn is_active(&self) -> bool {
        matches!(self, RoundState::Active { .. })
    }
}

/// Complete simulation state for one district: grid, player, citizens,
/// metrics, mission board, tutorial and round lifecycle. Mutated only from
/// the single frame/input timeline; everything outward reads snapshots.
pub struct World {
    scenario: Scenario,
    frame: u64,
    grid: WorldGrid,
    player: Player,
    citizens: Vec<Citizen>,
    scraps: Vec<(usize, usize)>,
    metrics: GlobalMetrics,
    missions: MissionBoard,
    tutorial: Tutorial,
    round: RoundState,
}

impl World {
    pub fn generate(scenario: &Scenario, rng: &mut impl Rng) -> Self {
        let grid = WorldGrid::generate(&scenario.grid, scenario.features.pollution, rng);
        let citizens = (0..scenario.citizens)
            .map(|_| Citizen::spawn(grid.width(), grid.height(), rng))
            .collect();
        let scraps = grid.spawn_scraps(scenario.scrap_count, rng);
        let missions = if scenario.features.missions {
            MissionBoard::standard()
        } else {
            MissionBoard::disabled()
        };
        Self {
            frame: 0,
            player: Player {
                x: grid.width() / 2,
                y: grid.height() / 2,
                money: scenario.start_money,
                solar_panels: scenario.start_solar_panels,
                green_spaces: scenario.start_green_spaces,
            },
            citizens,
            scraps,
            metrics: GlobalMetrics {
                carbon: scenario.start_carbon,
                happiness: scenario.start_happiness,
                renewables: 0,
                green_spaces: 0,
                energy: 0,
            },
            missions,
            tutorial: Tutorial::new(scenario.features.tutorial),
            round: RoundState::AwaitingStart,
            grid,
            scenario: scenario.clone(),
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut WorldGrid {
        &mut self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn citizens(&self) -> &[Citizen] {
        &self.citizens
    }

    pub fn citizens_mut(&mut self) -> &mut [Citizen] {
        &mut self.citizens
    }

    pub fn scraps(&self) -> &[(usize, usize)] {
        &self.scraps
    }

    pub fn metrics(&self) -> &GlobalMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut GlobalMetrics {
        &mut self.metrics
    }

    pub fn missions(&self) -> &MissionBoard {
        &self.missions
    }

    pub(crate) fn missions_mut(&mut self) -> &mut MissionBoard {
        &mut self.missions
    }

    pub fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    pub(crate) fn tutorial_mut(&mut self) -> &mut Tutorial {
        &mut self.tutorial
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    /// Tile under the player.
    pub fn player_tile(&self) -> Tile {
        self.grid.tile(self.player.x, self.player.y)
    }

    pub(crate) fn take_scrap_at(&mut self, x: usize, y: usize) -> bool {
        if let Some(index) = self.scraps.iter().position(|&s| s == (x, y)) {
            self.scraps.swap_remove(index);
            return true;
        }
        false
    }

    /// Applies bounded deltas to the global metrics. A carbon decrease
    /// forwards the total reduction since round start to the ReduceCarbon
    /// mission; any payout lands on the player immediately.
    pub(crate) fn apply_effects(&mut self, carbon_delta: f64, happy_delta: f64) -> Vec<String> {
        let old_carbon = self.metrics.carbon;
        self.metrics.carbon = (self.metrics.carbon + carbon_delta).clamp(0.0, 100.0);
        self.metrics.happiness = (self.metrics.happiness + happy_delta).clamp(0.0, 100.0);
        if self.metrics.carbon < old_carbon {
            let reduction = (self.scenario.start_carbon - self.metrics.carbon).max(0.0) as u32;
            let progress = self.missions.record_carbon_reduction(reduction);
            self.player.money += progress.reward;
            return progress.notices;
        }
        Vec::new()
    }

    /// Count-based mission progress (clean/solar/green); pays any reward.
    pub(crate) fn record_mission(&mut self, kind: crate::missions::MissionKind) -> Vec<String> {
        let progress = self.missions.record(kind);
        self.player.money += progress.reward;
        progress.notices
    }

    pub fn improvement_influence(&self, x: usize, y: usize) -> f64 {
        influence::improvement_influence(&self.grid, x, y)
    }

    pub fn local_smog(&self, x: usize, y: usize) -> f64 {
        influence::local_smog(&self.grid, self.metrics.carbon, x, y)
    }

    /// Composite 0..100 score shown on the end screen: carbon 30%, planted
    /// green 25%, happiness 20%, renewables 15%, ecosystem 10%.
    pub fn world_health_score(&self) -> f64 {
        let carbon_score = (100.0 - self.metrics.carbon).clamp(0.0, 100.0);
        let green_score = (self.metrics.green_spaces as f64 * 12.5).clamp(0.0, 100.0);
        let happy_score = self.metrics.happiness.clamp(0.0, 100.0);
        let renew_score = (self.metrics.renewables as f64 * 12.5).clamp(0.0, 100.0);
        let eco_score = ((2 + self.metrics.green_spaces) as f64 * 8.0).clamp(0.0, 100.0);
        carbon_score * 0.30
            + green_score * 0.25
            + happy_score * 0.20
            + renew_score * 0.15
            + eco_score * 0.10
    }

    // Round lifecycle. The engine drives these; the state itself lives here
    // so snapshots carry it.

    pub(crate) fn start_round(&mut self) -> bool {
        if matches!(self.round, RoundState::AwaitingStart) {
            self.round = RoundState::Active {
                elapsed: 0.0,
                remaining: self.scenario.round_seconds,
            };
            return true;
        }
        false
    }

    /// Advances the countdown by `dt` seconds. Returns true when this call
    /// exhausted the budget and the round just ended.
    pub(crate) fn advance_timer(&mut self, dt: f64) -> bool {
        if let RoundState::Active { elapsed, .. } = self.round {
            let elapsed = elapsed + dt;
            let remaining = (self.scenario.round_seconds - elapsed).max(0.0);
            if remaining <= 0.0 {
                self.round = RoundState::Ended {
                    final_carbon: self.metrics.carbon,
                    final_happiness: self.metrics.happiness,
                };
                return true;
            }
            self.round = RoundState::Active { elapsed, remaining };
        }
        false
    }

    /// Back to a fresh Active round: metrics and counters reinitialized,
    /// player improvements wiped off the map, scraps respawned. Money,
    /// purchased stock, missions and tutorial persist (a new process is the
    /// full wipe).
    pub(crate) fn reset_round(&mut self, rng: &mut impl Rng) {
        self.metrics.carbon = self.scenario.start_carbon;
        self.metrics.happiness = self.scenario.start_happiness;
        self.metrics.renewables = 0;
        self.metrics.green_spaces = 0;
        self.metrics.energy = 0;
        self.grid.clear_improvements();
        self.scraps = self.grid.spawn_scraps(self.scenario.scrap_count, rng);
        self.round = RoundState::Active {
            elapsed: 0.0,
            remaining: self.scenario.round_seconds,
        };
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let tiles = self
            .grid
            .iter()
            .map(|(x, y, tile)| TileSnapshot {
                x,
                y,
                tile,
                smog: self.local_smog(x, y),
            })
            .collect();
        let citizens = self
            .citizens
            .iter()
            .map(|c| CitizenSnapshot {
                x: c.pos[0],
                y: c.pos[1],
                mood: c.mood,
            })
            .collect();
        WorldSnapshot {
            scenario: self.scenario.name.clone(),
            frame: self.frame,
            round: self.round,
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            metrics: self.metrics,
            world_health: self.world_health_score(),
            player: self.player,
            citizens,
            tiles,
            scraps: self.scraps.clone(),
            missions: self.missions.missions().to_vec(),
            missions_visible: self.missions.visible,
            tutorial: self.tutorial.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileSnapshot {
    pub x: usize,
    pub y: usize,
    #[serde(flatten)]
    pub tile: Tile,
    /// Local smog intensity after nearby-improvement suppression.
    pub smog: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CitizenSnapshot {
    pub x: f64,
    pub y: f64,
    pub mood: f64,
}

/// Read-only view of the full simulation state handed to renderers and the
/// web observer.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub frame: u64,
    pub round: RoundState,
    pub grid_width: usize,
    pub grid_height: usize,
    pub metrics: GlobalMetrics,
    pub world_health: f64,
    pub player: Player,
    pub citizens: Vec<CitizenSnapshot>,
    pub tiles: Vec<TileSnapshot>,
    pub scraps: Vec<(usize, usize)>,
    pub missions: Vec<Mission>,
    pub missions_visible: bool,
    pub tutorial: Tutorial,
}

pub mod actions;
pub mod citizens;
pub mod config;
pub mod engine;
pub mod grid;
pub mod influence;
pub mod missions;
pub mod rng;
pub mod snapshot;
pub mod systems;
pub mod tutorial;
pub mod web;
pub mod world;

pub use actions::ActionOutcome;
pub use config::{Scenario, ScenarioLoader};
pub use engine::{Engine, EngineSettings, TickSummary};
pub use world::{RoundState, World, WorldSnapshot};

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ecodistrict::{
    engine::{Engine, EngineSettings},
    config::ScenarioLoader,
    web::{self, WebServerConfig},
    RoundState,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "EcoDistrict simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/vertical_district.yaml")]
    scenario: PathBuf,

    /// Override the number of simulated frames (defaults to one full round)
    #[arg(long)]
    frames: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the snapshot interval in frames (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    /// Serve the web observer instead of running headless
    #[arg(long)]
    serve: bool,

    /// Observer bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Observer bind port
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let frames = cli.frames.unwrap_or_else(|| scenario.frames_per_round());
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_frames);

    if cli.serve {
        let config = WebServerConfig {
            scenario,
            frames,
            snapshot_dir: cli.snapshot_dir,
            snapshot_interval,
            host: cli.host,
            port: cli.port,
        };
        return tokio::runtime::Runtime::new()?.block_on(web::run(config));
    }

    let settings = EngineSettings {
        snapshot_interval_frames: snapshot_interval,
        snapshot_dir: cli.snapshot_dir,
    };
    let mut engine = Engine::from_scenario(&scenario, settings);
    engine.start();
    engine.run(frames)?;

    let world = engine.world();
    let metrics = world.metrics();
    match world.round() {
        RoundState::Ended {
            final_carbon,
            final_happiness,
        } => println!(
            "Round complete: carbon {:.0} -> {:.0}, happiness {:.0} -> {:.0}, world health {:.0}%",
            scenario.start_carbon,
            final_carbon,
            scenario.start_happiness,
            final_happiness,
            world.world_health_score()
        ),
        _ => println!(
            "Stopped after {} frames: carbon {:.1}, happiness {:.1}",
            world.frame(),
            metrics.carbon,
            metrics.happiness
        ),
    }
    Ok(())
}

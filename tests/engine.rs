use ecodistrict::{
    config::Scenario,
    engine::{Engine, EngineSettings},
    grid::Tile,
    world::RoundState,
};

fn scenario_text(name: &str, seed: u64) -> String {
    format!(
        r#"
name: {name}
seed: {seed}
grid:
  width: 10
  height: 16
  road_rows: [4, 9, 14]
  road_cols: [3, 7]
start_carbon: 62
start_happiness: 38
snapshot_interval_frames: 0
"#
    )
}

fn scenario(seed: u64) -> Scenario {
    Scenario::from_str(&scenario_text("engine_district", seed)).expect("scenario parses")
}

fn build_engine(scenario: &Scenario) -> Engine {
    Engine::from_scenario(
        scenario,
        EngineSettings {
            snapshot_interval_frames: 0,
            snapshot_dir: "snapshots_test".into(),
        },
    )
}

fn teleport(engine: &mut Engine, x: usize, y: usize) {
    let player = engine.world_mut().player_mut();
    player.x = x;
    player.y = y;
}

#[test]
fn round_waits_for_an_explicit_start() {
    let mut engine = build_engine(&scenario(42));
    assert_eq!(engine.world().round(), RoundState::AwaitingStart);

    // Advancing before the start trigger moves neither frames nor the clock.
    engine.advance(0.25).unwrap();
    assert_eq!(engine.world().frame(), 0);
    assert_eq!(engine.world().round(), RoundState::AwaitingStart);

    assert!(engine.start().applied);
    assert!(engine.world().round().is_active());
    assert!(!engine.start().applied);
}

#[test]
fn round_ends_when_the_budget_runs_out() {
    let mut engine = build_engine(&scenario(42));
    engine.start();

    // 476 quarter-second frames leave one second on the clock.
    for _ in 0..476 {
        engine.advance(0.25).unwrap();
    }
    match engine.world().round() {
        RoundState::Active { remaining, .. } => assert_eq!(remaining, 1.0),
        other => panic!("round should still be active, got {other:?}"),
    }

    for _ in 0..4 {
        engine.advance(0.25).unwrap();
    }
    match engine.world().round() {
        RoundState::Ended {
            final_carbon,
            final_happiness,
        } => {
            assert_eq!(final_carbon, 62.0);
            assert_eq!(final_happiness, 38.0);
        }
        other => panic!("round should have ended, got {other:?}"),
    }

    // Once ended, further frames change nothing.
    let frame = engine.world().frame();
    engine.advance(0.25).unwrap();
    assert_eq!(engine.world().frame(), frame);
}

#[test]
fn equal_seeds_replay_identical_rounds() {
    let scenario = scenario(777);
    let mut a = build_engine(&scenario);
    let mut b = build_engine(&scenario);
    a.start();
    b.start();
    a.run(300).unwrap();
    b.run(300).unwrap();

    let snap_a = serde_json::to_string(&a.snapshot()).unwrap();
    let snap_b = serde_json::to_string(&b.snapshot()).unwrap();
    assert_eq!(snap_a, snap_b);
}

#[test]
fn different_seeds_generate_different_worlds() {
    let a = build_engine(&scenario(1));
    let b = build_engine(&scenario(2));
    let tiles_a = serde_json::to_string(&a.snapshot().tiles).unwrap();
    let tiles_b = serde_json::to_string(&b.snapshot().tiles).unwrap();
    assert_ne!(tiles_a, tiles_b);
}

#[test]
fn reset_round_restores_the_starting_state() {
    let config = scenario(42);
    let mut engine = build_engine(&config);
    engine.start();

    // Leave some marks on the world first.
    let (bx, by) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Building { has_solar: false }))[0];
    teleport(&mut engine, bx, by);
    assert!(engine.place_solar().applied);
    let (gx, gy) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty))[0];
    teleport(&mut engine, gx, gy);
    assert!(engine.add_green().applied);
    let (rx, ry) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Road { upgraded: false }))[0];
    teleport(&mut engine, rx, ry);
    assert!(engine.upgrade_road().applied);

    let premature = engine.reset_round();
    assert!(!premature.applied);
    assert_eq!(premature.message, "Round still in progress");

    engine.run(config.frames_per_round() + 2).unwrap();
    assert!(!engine.world().round().is_active());

    let money_at_end = engine.world().player().money;
    let outcome = engine.reset_round();
    assert!(outcome.applied);
    assert_eq!(outcome.message, "New round started!");

    let world = engine.world();
    assert_eq!(world.metrics().carbon, 62.0);
    assert_eq!(world.metrics().happiness, 38.0);
    assert_eq!(world.metrics().renewables, 0);
    assert_eq!(world.metrics().green_spaces, 0);
    assert_eq!(world.metrics().energy, 0);
    for (_, _, tile) in world.grid().iter() {
        assert!(!matches!(tile, Tile::Green { .. }));
        assert!(!matches!(tile, Tile::Road { upgraded: true }));
        assert!(!matches!(tile, Tile::Building { has_solar: true }));
    }
    assert_eq!(world.scraps().len(), config.scrap_count);
    match world.round() {
        RoundState::Active { elapsed, remaining } => {
            assert_eq!(elapsed, 0.0);
            assert_eq!(remaining, config.round_seconds);
        }
        other => panic!("expected an active round, got {other:?}"),
    }
    // Money and purchased stock survive the reset.
    assert_eq!(world.player().money, money_at_end);
}

#[test]
fn citizen_moods_relax_toward_global_happiness() {
    let mut engine = build_engine(&scenario(42));
    engine.start();
    engine.run(400).unwrap();
    let target = engine.world().metrics().happiness / 100.0;
    for citizen in engine.world().citizens() {
        assert!((citizen.mood - target).abs() < 0.005);
        assert!((0.0..=1.0).contains(&citizen.mood));
    }
}

#[test]
fn background_pollution_grows_over_time() {
    let config = scenario(42);
    let mut engine = build_engine(&config);
    let initial = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Pollution { .. }))
        .len();
    engine.start();
    engine.run(3000).unwrap();
    let after = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Pollution { .. }))
        .len();
    assert!(
        after > initial,
        "expected pollution to spread ({initial} -> {after})"
    );
}

#[test]
fn pollution_toggle_disables_the_background_process() {
    let config = Scenario::from_str(
        r#"
name: quiet_district
seed: 42
grid:
  width: 10
  height: 16
  road_rows: [4, 9, 14]
  road_cols: [3, 7]
start_carbon: 62
start_happiness: 38
snapshot_interval_frames: 0
features:
  missions: false
  pollution: false
  tutorial: false
"#,
    )
    .unwrap();
    let mut engine = build_engine(&config);
    engine.start();
    engine.run(3000).unwrap();
    assert!(engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Pollution { .. }))
        .is_empty());
}

#[test]
fn snapshots_land_on_the_configured_interval() {
    let config = scenario(42);
    let temp = tempfile::tempdir().unwrap();
    let mut engine = Engine::from_scenario(
        &config,
        EngineSettings {
            snapshot_interval_frames: 10,
            snapshot_dir: temp.path().join("snaps"),
        },
    );
    engine.start();
    engine.run(25).unwrap();

    let expected = temp
        .path()
        .join("snaps")
        .join("engine_district")
        .join("frame_000010.json");
    assert!(expected.exists(), "missing {}", expected.display());
    let data = std::fs::read_to_string(expected).unwrap();
    assert!(data.contains("\"scenario\": \"engine_district\""));
    assert!(data.contains("\"captured_at\""));
}

use ecodistrict::{
    config::Scenario,
    engine::{Engine, EngineSettings},
    grid::Tile,
    missions::MissionKind,
};

fn scenario(features: &str) -> Scenario {
    Scenario::from_str(&format!(
        r#"
name: mission_district
seed: 1234
grid:
  width: 10
  height: 16
  road_rows: [4, 9, 14]
  road_cols: [3, 7]
start_carbon: 62
start_happiness: 38
snapshot_interval_frames: 0
features:
  missions: {features}
  pollution: true
  tutorial: true
"#
    ))
    .expect("scenario parses")
}

fn started_engine(features: &str) -> Engine {
    let mut engine = Engine::from_scenario(
        &scenario(features),
        EngineSettings {
            snapshot_interval_frames: 0,
            snapshot_dir: "snapshots_test".into(),
        },
    );
    engine.start();
    engine
}

fn teleport(engine: &mut Engine, x: usize, y: usize) {
    let player = engine.world_mut().player_mut();
    player.x = x;
    player.y = y;
}

fn mission<'a>(engine: &'a Engine, kind: MissionKind) -> &'a ecodistrict::missions::Mission {
    engine
        .world()
        .missions()
        .missions()
        .iter()
        .find(|m| m.kind == kind)
        .expect("mission exists")
}

#[test]
fn plant_green_mission_completes_on_the_fourth_planting() {
    let mut engine = started_engine("true");
    // One extra green space on top of the starting three.
    assert!(engine.buy_green().applied);
    assert_eq!(engine.world().player().money, 40);

    let empties = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty));
    assert!(empties.len() >= 4);

    for (i, &(x, y)) in empties[..3].iter().enumerate() {
        teleport(&mut engine, x, y);
        let outcome = engine.add_green();
        assert!(outcome.applied);
        assert!(outcome.notices.is_empty(), "no payout before the target");
        assert_eq!(mission(&engine, MissionKind::PlantGreen).current, i as u32 + 1);
        assert!(!mission(&engine, MissionKind::PlantGreen).completed);
    }
    assert_eq!(engine.world().player().money, 40);

    // Fourth planting: PlantGreen hits 4/4 and the cumulative -8 carbon also
    // finishes ReduceCarbon, in apply-effects order.
    let (x, y) = empties[3];
    teleport(&mut engine, x, y);
    let outcome = engine.add_green();
    assert!(outcome.applied);
    assert_eq!(
        outcome.notices,
        vec![
            "Mission completed: Reduce carbon by 8%! +15 money",
            "Mission completed: Plant 4 green spaces! +10 money",
        ]
    );
    assert!(mission(&engine, MissionKind::PlantGreen).completed);
    assert!(mission(&engine, MissionKind::ReduceCarbon).completed);
    assert_eq!(engine.world().player().money, 65);
}

#[test]
fn install_solar_mission_pays_exactly_once() {
    let mut engine = started_engine("true");
    let buildings = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Building { has_solar: false }));
    assert!(buildings.len() >= 3);

    teleport(&mut engine, buildings[0].0, buildings[0].1);
    assert!(engine.place_solar().applied);
    assert!(!mission(&engine, MissionKind::InstallSolar).completed);
    assert_eq!(engine.world().player().money, 50);

    teleport(&mut engine, buildings[1].0, buildings[1].1);
    let outcome = engine.place_solar();
    assert!(outcome
        .notices
        .contains(&"Mission completed: Install 2 solar panels! +10 money".to_string()));
    assert!(mission(&engine, MissionKind::InstallSolar).completed);
    assert_eq!(engine.world().player().money, 60);

    // A third install progresses the solar mission no further. It does push
    // the cumulative reduction to 9 and completes ReduceCarbon.
    teleport(&mut engine, buildings[2].0, buildings[2].1);
    let third = engine.place_solar();
    assert!(third.applied);
    assert!(!third
        .notices
        .iter()
        .any(|n| n.contains("Install 2 solar panels")));
    assert!(third
        .notices
        .contains(&"Mission completed: Reduce carbon by 8%! +15 money".to_string()));
    assert_eq!(mission(&engine, MissionKind::InstallSolar).current, 2);
    assert_eq!(engine.world().player().money, 75);
}

#[test]
fn clean_pollution_mission_counts_each_clean() {
    let mut engine = started_engine("true");
    let (x, y) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty))[0];
    engine.world_mut().grid_mut().set_tile(x, y, Tile::pollution(3));
    teleport(&mut engine, x, y);

    for expected in 1..=2u32 {
        assert!(engine.clean_pollution().applied);
        assert_eq!(mission(&engine, MissionKind::CleanPollution).current, expected);
        assert!(!mission(&engine, MissionKind::CleanPollution).completed);
    }
    let outcome = engine.clean_pollution();
    assert!(outcome
        .notices
        .contains(&"Mission completed: Clean 3 pollution spots! +10 money".to_string()));
    assert!(mission(&engine, MissionKind::CleanPollution).completed);
    assert_eq!(engine.world().player().money, 60);
}

#[test]
fn mission_progress_never_decreases() {
    let mut engine = started_engine("true");
    let (x, y) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty))[0];
    engine.world_mut().grid_mut().set_tile(x, y, Tile::pollution(1));
    teleport(&mut engine, x, y);
    engine.clean_pollution();

    let before = mission(&engine, MissionKind::ReduceCarbon).current;
    assert_eq!(before, 1);
    // Happiness-only effects do not touch the carbon counter.
    let (ex, ey) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty))[0];
    teleport(&mut engine, ex, ey);
    engine.add_green();
    assert!(mission(&engine, MissionKind::ReduceCarbon).current >= before);
}

#[test]
fn tutorial_walks_through_its_steps_in_order() {
    let mut engine = started_engine("true");
    assert_eq!(engine.world().tutorial().step(), 0);
    assert!(engine.world().tutorial().active());

    // The first movement clears the welcome message and latches `moved`.
    let moved = engine.move_player(1, 0);
    assert!(moved
        .notices
        .contains(&"Great! Now collect some energy scraps.".to_string()));
    assert_eq!(engine.world().tutorial().step(), 2);

    // Actions for later steps do not advance anything yet.
    let (bx, by) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Building { has_solar: false }))[0];
    teleport(&mut engine, bx, by);
    engine.place_solar();
    assert_eq!(engine.world().tutorial().step(), 2);

    let (sx, sy) = engine.world().scraps()[0];
    teleport(&mut engine, sx, sy);
    let collected = engine.move_player(0, 0);
    assert!(collected
        .notices
        .contains(&"Excellent! Now place a green space using '2'.".to_string()));
    assert_eq!(engine.world().tutorial().step(), 3);

    let (gx, gy) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty))[0];
    teleport(&mut engine, gx, gy);
    let planted = engine.add_green();
    assert!(planted
        .notices
        .contains(&"Well done! Now install a solar panel using '1'.".to_string()));
    assert_eq!(engine.world().tutorial().step(), 4);

    let (b2x, b2y) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Building { has_solar: false }))[0];
    teleport(&mut engine, b2x, b2y);
    let solar = engine.place_solar();
    assert!(solar
        .notices
        .contains(&"Perfect! Now check your missions using 'M'.".to_string()));
    assert_eq!(engine.world().tutorial().step(), 5);

    let viewed = engine.toggle_missions_view();
    assert!(viewed
        .notices
        .contains(&"Tutorial complete! Press 'H' for help anytime.".to_string()));
    assert_eq!(engine.world().tutorial().step(), 6);
    assert!(!engine.world().tutorial().active());

    // Toggling again has no tutorial left to advance.
    let again = engine.toggle_missions_view();
    assert!(again.notices.is_empty());
}

#[test]
fn disabled_missions_board_stays_empty() {
    let mut engine = started_engine("false");
    let (x, y) = engine
        .world()
        .grid()
        .positions_where(|t| matches!(t, Tile::Empty))[0];
    teleport(&mut engine, x, y);
    let outcome = engine.add_green();
    assert!(outcome.applied);
    assert!(engine.world().missions().is_empty());
    assert!(!outcome
        .notices
        .iter()
        .any(|n| n.starts_with("Mission completed")));
}

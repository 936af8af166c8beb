mod common;

use common::{CountingFov, terrain, walled_room};
use stage_core::{
    BreadthFirstDistance, BuildError, CacheState, Env, OracleError, PcgRng, Position, Stage,
    StageConfig, StageEnv, StageError,
};

fn snapshot(stage: &Stage) -> Vec<(bool, bool)> {
    (0..stage.height() as i32)
        .flat_map(|y| (0..stage.width() as i32).map(move |x| Position::new(x, y)))
        .map(|pos| {
            let cell = stage.cell(pos);
            (cell.is_visible(), cell.is_explored())
        })
        .collect()
}

#[test]
fn explorable_count_of_open_room_is_its_interior() {
    for (width, height) in [(3, 3), (10, 7), (20, 20)] {
        let (mut stage, _) = walled_room(width, height, 1);
        let fov = CountingFov::new(4);
        let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();

        let explorable = stage.finish_build(Position::new(1, 1), &env).unwrap();

        assert_eq!(explorable, (width - 2) * (height - 2));
        assert_eq!(stage.num_explorable(), Some(explorable));
    }
}

#[test]
fn explorable_count_includes_walls_next_to_floor_only() {
    let terrain = terrain();
    let mut stage = Stage::new(9, 9, terrain.catalog.clone(), StageConfig::default());
    for y in 0..9 {
        for x in 0..9 {
            stage.set_terrain(Position::new(x, y), terrain.wall);
        }
    }
    // A single floor cell and a closed door far from it.
    stage.set_terrain(Position::new(2, 2), terrain.floor);
    stage.set_terrain(Position::new(6, 6), terrain.closed_door);

    let fov = CountingFov::new(4);
    let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();
    let explorable = stage.finish_build(Position::new(2, 2), &env).unwrap();

    // Each traversable cell plus its eight interior neighbours.
    assert_eq!(explorable, 9 + 9);
}

#[test]
fn finish_build_runs_once_and_sees_the_start() {
    let (mut stage, _) = walled_room(8, 8, 1);
    let fov = CountingFov::new(10);
    let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();
    let start = Position::new(3, 3);

    stage.finish_build(start, &env).unwrap();
    assert!(stage.is_built());
    assert_eq!(fov.calls(), 1);
    assert!(stage.cell(start).is_visible());
    assert!(stage.cell(Position::new(0, 0)).is_explored());

    assert_eq!(
        stage.finish_build(start, &env),
        Err(StageError::Build(BuildError::AlreadyBuilt))
    );
}

#[test]
fn finish_build_without_fov_oracle_can_be_retried() {
    let (mut stage, _) = walled_room(6, 6, 1);
    let start = Position::new(2, 2);

    assert_eq!(
        stage.finish_build(start, &StageEnv::empty()),
        Err(StageError::Oracle(OracleError::FovNotAvailable))
    );
    assert!(!stage.is_built());
    assert_eq!(stage.visibility_state(), CacheState::Stale);

    let fov = CountingFov::new(4);
    let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();
    assert_eq!(stage.finish_build(start, &env).unwrap(), 16);
}

#[test]
fn refresh_is_idempotent_until_dirtied() {
    let (mut stage, _) = walled_room(12, 12, 1);
    let fov = CountingFov::new(3);
    let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();
    stage.finish_build(Position::new(2, 2), &env).unwrap();
    assert_eq!(fov.calls(), 1);

    let before = snapshot(&stage);
    assert!(!stage.refresh_visibility(Position::new(9, 9), &env).unwrap());
    assert!(!stage.refresh_visibility(Position::new(9, 9), &env).unwrap());
    assert_eq!(snapshot(&stage), before);
    assert_eq!(fov.calls(), 1);

    stage.mark_visibility_dirty();
    stage.mark_visibility_dirty();
    assert_eq!(stage.visibility_state(), CacheState::Stale);
    assert!(stage.refresh_visibility(Position::new(9, 9), &env).unwrap());
    assert_eq!(fov.calls(), 2);
    assert_eq!(stage.visibility_state(), CacheState::Fresh);
}

#[test]
fn explored_never_resets_as_visibility_moves() {
    let (mut stage, _) = walled_room(20, 5, 1);
    let fov = CountingFov::new(3);
    let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();
    let west = Position::new(2, 2);
    let east = Position::new(17, 2);

    stage.finish_build(west, &env).unwrap();
    assert!(stage.cell(west).is_visible());
    let explored_after_west = stage.num_explored();

    stage.mark_visibility_dirty();
    stage.refresh_visibility(east, &env).unwrap();
    assert!(!stage.cell(west).is_visible());
    assert!(stage.cell(west).is_explored());
    assert!(stage.cell(east).is_visible());
    assert!(stage.num_explored() > explored_after_west);

    stage.set_visible(west, true);
    stage.set_visible(west, false);
    assert!(stage.cell(west).is_explored());

    let progress = stage.exploration_progress().unwrap();
    assert!(progress > 0.0 && progress <= 1.0);
}

#[test]
fn opening_a_door_dirties_visibility_and_reveals_the_room() {
    let (mut stage, terrain) = walled_room(11, 5, 1);
    // Split the room with a wall holding a closed door at (5, 2).
    for y in 1..4 {
        stage.set_terrain(Position::new(5, y), terrain.wall);
    }
    let door = Position::new(5, 2);
    stage.set_terrain(door, terrain.closed_door);

    let fov = CountingFov::new(10);
    let env = Env::with_all(&fov, &BreadthFirstDistance, &PcgRng).as_stage_env();
    let viewer = Position::new(2, 2);
    stage.finish_build(viewer, &env).unwrap();

    let beyond = Position::new(8, 2);
    assert!(stage.cell(door).is_visible());
    assert!(!stage.cell(beyond).is_visible());

    assert!(stage.open_door(door));
    assert_eq!(stage.cell(door).terrain(), terrain.open_door);
    assert_eq!(stage.visibility_state(), CacheState::Stale);

    stage.refresh_visibility(viewer, &env).unwrap();
    assert!(stage.cell(beyond).is_visible());

    assert!(stage.close_door(door));
    assert_eq!(stage.cell(door).terrain(), terrain.closed_door);
    assert!(!stage.open_door(viewer));
    assert!(!stage.close_door(viewer));
}

#[test]
fn exit_flag_comes_from_terrain() {
    let (stage, _) = walled_room(5, 5, 1);
    assert!(!stage.is_exit(Position::new(2, 2)));
    assert!(!stage.is_exit(Position::new(-3, 2)));
}

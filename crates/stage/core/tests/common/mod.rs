#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use stage_core::{
    Actor, BreadthFirstDistance, Breed, DistanceField, DistanceOracle, EntityId, FovOracle,
    MapView, Position, RaycastFov, Stage, StageConfig, TerrainCatalog, TerrainFlags, TerrainId,
    TerrainType, TraversalRules,
};

pub struct Terrain {
    pub catalog: Arc<TerrainCatalog>,
    pub floor: TerrainId,
    pub wall: TerrainId,
    pub closed_door: TerrainId,
    pub open_door: TerrainId,
}

pub fn terrain() -> Terrain {
    let mut catalog = TerrainCatalog::new();
    let floor = catalog
        .register(TerrainType::new(
            "floor",
            '.',
            TerrainFlags::WALKABLE | TerrainFlags::FLYABLE,
        ))
        .unwrap();
    let wall = catalog
        .register(TerrainType::new("wall", '#', TerrainFlags::empty()))
        .unwrap();
    let closed_door = catalog
        .register(TerrainType::new("closed_door", '+', TerrainFlags::empty()))
        .unwrap();
    let open_door = catalog
        .register(TerrainType::new(
            "open_door",
            '\'',
            TerrainFlags::WALKABLE | TerrainFlags::FLYABLE,
        ))
        .unwrap();
    catalog.link_door(closed_door, open_door).unwrap();

    Terrain {
        catalog: Arc::new(catalog),
        floor,
        wall,
        closed_door,
        open_door,
    }
}

/// A `width`×`height` stage with a wall ring around an open floor interior.
pub fn walled_room(width: u32, height: u32, seed: u64) -> (Stage, Terrain) {
    let terrain = terrain();
    let mut stage = Stage::new(
        width,
        height,
        Arc::clone(&terrain.catalog),
        StageConfig::with_seed(seed),
    );
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let edge = x == 0 || y == 0 || x == width as i32 - 1 || y == height as i32 - 1;
            let id = if edge { terrain.wall } else { terrain.floor };
            stage.set_terrain(Position::new(x, y), id);
        }
    }
    (stage, terrain)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mob {
    pub id: EntityId,
    pub position: Position,
}

impl Mob {
    pub fn new(id: u32, x: i32, y: i32) -> Self {
        Self {
            id: EntityId(id),
            position: Position::new(x, y),
        }
    }
}

impl Actor for Mob {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Position {
        self.position
    }
}

pub struct Pack {
    pub size: u32,
}

impl Breed for Pack {
    fn name(&self) -> &str {
        "jackal"
    }

    fn group_size(&self) -> u32 {
        self.size
    }
}

/// Field-of-view double that counts invocations.
#[derive(Default)]
pub struct CountingFov {
    inner: RaycastFov,
    calls: AtomicUsize,
}

impl CountingFov {
    pub fn new(radius: u32) -> Self {
        Self {
            inner: RaycastFov::new(radius),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FovOracle for CountingFov {
    fn compute_visible(&self, map: &MapView<'_>, origin: Position) -> Vec<Position> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.compute_visible(map, origin)
    }
}

/// Distance double that counts invocations and remembers the rules it saw.
#[derive(Default)]
pub struct CountingDistance {
    calls: AtomicUsize,
    last_rules: std::sync::Mutex<Option<TraversalRules>>,
}

impl CountingDistance {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_rules(&self) -> Option<TraversalRules> {
        *self.last_rules.lock().unwrap()
    }
}

impl DistanceOracle for CountingDistance {
    fn compute_distances(
        &self,
        map: &MapView<'_>,
        start: Position,
        rules: TraversalRules,
    ) -> DistanceField {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_rules.lock().unwrap() = Some(rules);
        BreadthFirstDistance.compute_distances(map, start, rules)
    }
}

//! The stage: composition root for the grid, indices, turn order and caches.
//!
//! [`Stage`] exclusively owns every structure in [`crate::state`] and keeps
//! them consistent. Entities and items stay owned by the caller; the stage
//! tracks them through [`EntityId`] and [`ItemId`] handles only.
//!
//! Operations are split by concern:
//! - this module: grid access, occupancy, turn order, ground items
//! - `build`: the one-shot build step, exploration and visibility
//! - `placement`: anchor distances and randomized placement

mod build;
mod cache;
mod error;
mod placement;

pub use cache::{CacheState, DistanceCache, VisibilityCache};
pub use error::{BuildError, OccupancyError, StageError};
pub use placement::Breed;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::StageConfig;
use crate::env::MapView;
use crate::state::{
    Cell, EntityId, GroundError, GroundItems, Grid, ItemId, Position, TerrainCatalog, TerrainId,
    TerrainType, TurnError, TurnSequencer,
};

/// Positional contract of an entity the stage can track.
///
/// The stage never inspects behavior, only identity and position.
pub trait Actor {
    fn id(&self) -> EntityId;
    fn position(&self) -> Position;
}

/// Live spatial model of one simulation area.
#[derive(Clone, Debug)]
pub struct Stage {
    config: StageConfig,
    catalog: Arc<TerrainCatalog>,
    cells: Grid<Cell>,
    occupants: Grid<Option<EntityId>>,
    positions: HashMap<EntityId, Position>,
    turns: TurnSequencer,
    ground: GroundItems,
    visibility: VisibilityCache,
    distances: DistanceCache,
    anchor: Option<EntityId>,
    num_explorable: Option<u32>,
    draws: u64,
}

impl Stage {
    /// Creates a stage filled with [`TerrainId::UNFORMED`].
    pub fn new(width: u32, height: u32, catalog: Arc<TerrainCatalog>, config: StageConfig) -> Self {
        Self {
            config,
            catalog,
            cells: Grid::new(width, height, Cell::default()),
            occupants: Grid::new(width, height, None),
            positions: HashMap::new(),
            turns: TurnSequencer::new(),
            ground: GroundItems::new(),
            visibility: VisibilityCache::new(),
            distances: DistanceCache::new(),
            anchor: None,
            num_explorable: None,
            draws: 0,
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TerrainCatalog {
        &self.catalog
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(position)
    }

    /// Read-only view handed to oracles.
    pub fn map_view(&self) -> MapView<'_> {
        MapView::new(&self.cells, &self.catalog, &self.occupants)
    }

    // ========================================================================
    // Grid & terrain
    // ========================================================================

    /// # Panics
    ///
    /// Panics if `position` lies outside the stage.
    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[position]
    }

    pub fn try_cell(&self, position: Position) -> Option<&Cell> {
        self.cells.get(position)
    }

    /// Replaces a whole cell. Meant for generation code; does not dirty
    /// visibility.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the stage.
    pub fn set_cell(&mut self, position: Position, cell: Cell) {
        self.cells[position] = cell;
        self.distances.invalidate();
    }

    /// # Panics
    ///
    /// Panics if `position` lies outside the stage.
    pub fn set_terrain(&mut self, position: Position, terrain: TerrainId) {
        self.cells[position].set_terrain(terrain);
        self.distances.invalidate();
    }

    /// Terrain descriptor at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the stage.
    pub fn terrain(&self, position: Position) -> &TerrainType {
        &self.catalog[self.cells[position].terrain()]
    }

    fn terrain_at(&self, position: Position) -> Option<&TerrainType> {
        self.cells
            .get(position)
            .and_then(|cell| self.catalog.get(cell.terrain()))
    }

    /// False outside the stage.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.terrain_at(position)
            .is_some_and(TerrainType::is_walkable)
    }

    /// False outside the stage.
    pub fn is_exit(&self, position: Position) -> bool {
        self.terrain_at(position).is_some_and(TerrainType::is_exit)
    }

    /// Walkable and unoccupied.
    pub fn is_open(&self, position: Position) -> bool {
        self.is_walkable(position) && !self.is_occupied(position)
    }

    /// Swaps a closed door for its open partner and dirties visibility.
    ///
    /// Returns `false` without changing anything when the terrain cannot open.
    pub fn open_door(&mut self, position: Position) -> bool {
        let Some(open) = self.terrain_at(position).and_then(|terrain| terrain.opens_to) else {
            return false;
        };
        self.cells[position].set_terrain(open);
        self.mark_visibility_dirty();
        tracing::trace!("opened door at {}", position);
        true
    }

    /// Swaps an open door for its closed partner and dirties visibility.
    pub fn close_door(&mut self, position: Position) -> bool {
        let Some(closed) = self.terrain_at(position).and_then(|terrain| terrain.closes_to)
        else {
            return false;
        };
        self.cells[position].set_terrain(closed);
        self.mark_visibility_dirty();
        tracing::trace!("closed door at {}", position);
        true
    }

    // ========================================================================
    // Occupancy index & turn order
    // ========================================================================

    /// Registers `entity` at its own position and appends it to the turn order.
    ///
    /// # Panics
    ///
    /// Panics if the entity's position lies outside the stage.
    pub fn add_entity<A: Actor + ?Sized>(&mut self, entity: &A) -> Result<(), OccupancyError> {
        let (id, position) = (entity.id(), entity.position());

        if let Some(occupant) = self.occupants[position] {
            let err = OccupancyError::Occupied {
                entity: id,
                position,
                occupant,
            };
            tracing::error!("{}", err);
            return Err(err);
        }
        if let Some(&registered) = self.positions.get(&id) {
            let err = OccupancyError::AlreadyRegistered {
                entity: id,
                position: registered,
            };
            tracing::error!("{}", err);
            return Err(err);
        }

        self.turns.push(id);
        self.occupants[position] = Some(id);
        self.positions.insert(id, position);
        tracing::trace!("registered {} at {}", id, position);
        Ok(())
    }

    /// Relocates the occupancy record at `from` to `to`.
    ///
    /// This is index bookkeeping, not move validation: whatever was recorded
    /// at `to` is overwritten.
    ///
    /// # Panics
    ///
    /// Panics if either position lies outside the stage; the indices are left
    /// untouched in that case.
    pub fn move_entity(&mut self, from: Position, to: Position) -> Result<EntityId, OccupancyError> {
        assert!(
            self.contains(to),
            "position {to} is outside the {}x{} grid",
            self.width(),
            self.height()
        );
        let Some(id) = self.occupants[from].take() else {
            let err = OccupancyError::Vacant(from);
            tracing::error!("{}", err);
            return Err(err);
        };
        self.occupants[to] = Some(id);
        self.positions.insert(id, to);
        tracing::trace!("moved {} from {} to {}", id, from, to);
        Ok(id)
    }

    /// Unregisters `entity` from the occupancy index and the turn order.
    ///
    /// The index must hold exactly this entity at the entity's own position.
    /// Removal never skips or repeats the turn of an entity still waiting.
    pub fn remove_entity<A: Actor + ?Sized>(&mut self, entity: &A) -> Result<(), StageError> {
        let (id, position) = (entity.id(), entity.position());

        let found = self.occupants.get(position).copied().flatten();
        if found != Some(id) {
            let err = OccupancyError::Mismatch {
                entity: id,
                position,
                found,
            };
            tracing::error!("{}", err);
            return Err(err.into());
        }

        self.turns.remove(id)?;
        self.occupants[position] = None;
        self.positions.remove(&id);
        tracing::trace!("removed {} from {}", id, position);
        Ok(())
    }

    /// Passes the turn to the next entity and returns it.
    pub fn advance_turn(&mut self) -> Result<EntityId, TurnError> {
        self.turns.advance()
    }

    /// The entity whose turn it is.
    pub fn current_actor(&self) -> Option<EntityId> {
        self.turns.current()
    }

    /// Registered entities in turn order.
    pub fn actors(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.turns.iter()
    }

    pub fn turns(&self) -> &TurnSequencer {
        &self.turns
    }

    /// `None` for empty or out-of-bounds positions.
    pub fn occupant_at(&self, position: Position) -> Option<EntityId> {
        self.occupants.get(position).copied().flatten()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupant_at(position).is_some()
    }

    /// Where the stage has `entity` recorded.
    pub fn entity_position(&self, entity: EntityId) -> Option<Position> {
        self.positions.get(&entity).copied()
    }

    // ========================================================================
    // Ground items
    // ========================================================================

    /// Drops `item` at `position`. The ground has no capacity limit.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the stage.
    pub fn add_item(&mut self, item: ItemId, position: Position) {
        assert!(
            self.contains(position),
            "cannot drop {item} at {position}: outside the stage"
        );
        self.ground.add(item, position);
    }

    pub fn has_item_at(&self, position: Position) -> bool {
        self.ground.contains(position)
    }

    pub fn items_at(&self, position: Position) -> &[ItemId] {
        self.ground.at(position)
    }

    pub fn remove_item(&mut self, item: ItemId, position: Position) -> Result<(), GroundError> {
        self.ground.remove(item, position).inspect_err(|err| {
            tracing::error!("{}", err);
        })
    }

    /// Visits every `(item, position)` pair; order is unspecified.
    pub fn for_each_item(&self, mut visit: impl FnMut(ItemId, Position)) {
        for (item, position) in self.ground.iter() {
            visit(item, position);
        }
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, Position)> + '_ {
        self.ground.iter()
    }

    pub fn ground(&self) -> &GroundItems {
        &self.ground
    }
}

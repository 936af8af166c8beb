use bitflags::bitflags;

use crate::state::{Cell, EntityId, Grid, Position, TerrainCatalog, TerrainType};

bitflags! {
    /// Capabilities assumed when measuring how far apart two cells are.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TraversalRules: u8 {
        /// Closed doors count as passable because they can be opened.
        const OPEN_DOORS       = 0b0000_0001;
        /// Flyable terrain counts as passable.
        const FLY              = 0b0000_0010;
        /// Occupied cells are not treated as blocked.
        const IGNORE_OCCUPANTS = 0b0000_0100;
    }
}

impl TraversalRules {
    /// Rules used by the stage's anchor distance cache.
    pub const ANCHOR_DISTANCE: Self = Self::OPEN_DOORS
        .union(Self::FLY)
        .union(Self::IGNORE_OCCUPANTS);

    /// Whether a terrain kind can be crossed under these rules.
    pub fn permits(self, terrain: &TerrainType) -> bool {
        terrain.is_walkable()
            || (self.contains(Self::OPEN_DOORS) && terrain.opens_to.is_some())
            || (self.contains(Self::FLY) && terrain.is_flyable())
    }
}

/// Read-only view over the stage handed to oracles.
#[derive(Clone, Copy, Debug)]
pub struct MapView<'a> {
    cells: &'a Grid<Cell>,
    catalog: &'a TerrainCatalog,
    occupants: &'a Grid<Option<EntityId>>,
}

impl<'a> MapView<'a> {
    pub fn new(
        cells: &'a Grid<Cell>,
        catalog: &'a TerrainCatalog,
        occupants: &'a Grid<Option<EntityId>>,
    ) -> Self {
        Self {
            cells,
            catalog,
            occupants,
        }
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

    pub fn cell(&self, position: Position) -> Option<&'a Cell> {
        self.cells.get(position)
    }

    pub fn terrain(&self, position: Position) -> Option<&'a TerrainType> {
        let cell = self.cells.get(position)?;
        self.catalog.get(cell.terrain())
    }

    pub fn occupant(&self, position: Position) -> Option<EntityId> {
        self.occupants.get(position).copied().flatten()
    }

    /// Out-of-bounds positions block sight.
    pub fn is_transparent(&self, position: Position) -> bool {
        self.terrain(position)
            .is_some_and(TerrainType::is_transparent)
    }

    /// Whether `position` can be entered under `rules`.
    pub fn can_traverse(&self, position: Position, rules: TraversalRules) -> bool {
        let Some(terrain) = self.terrain(position) else {
            return false;
        };
        if !rules.permits(terrain) {
            return false;
        }
        rules.contains(TraversalRules::IGNORE_OCCUPANTS) || self.occupant(position).is_none()
    }
}

use super::TerrainId;

/// Mutable per-position state of the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    terrain: TerrainId,
    visible: bool,
    explored: bool,
}

impl Cell {
    pub const fn new(terrain: TerrainId) -> Self {
        Self {
            terrain,
            visible: false,
            explored: false,
        }
    }

    pub fn terrain(&self) -> TerrainId {
        self.terrain
    }

    pub fn set_terrain(&mut self, terrain: TerrainId) {
        self.terrain = terrain;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True once the cell has ever been visible.
    pub fn is_explored(&self) -> bool {
        self.explored
    }

    /// Updates visibility. `explored` is monotonic: it latches on the first
    /// `true` and is never cleared here.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.explored = true;
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(TerrainId::UNFORMED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explored_latches_while_visible_toggles() {
        let mut cell = Cell::default();
        assert!(!cell.is_explored());

        cell.set_visible(true);
        cell.set_visible(false);
        cell.set_visible(false);

        assert!(!cell.is_visible());
        assert!(cell.is_explored());
    }

    #[test]
    fn terrain_change_keeps_exploration() {
        let mut cell = Cell::new(TerrainId(3));
        cell.set_visible(true);
        cell.set_terrain(TerrainId(4));

        assert_eq!(cell.terrain(), TerrainId(4));
        assert!(cell.is_explored());
    }
}

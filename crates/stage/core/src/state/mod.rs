//! Plain data structures owned by the stage.
//!
//! Everything here is index bookkeeping with no knowledge of oracles or
//! caches; cross-structure invariants are enforced one level up in
//! [`crate::stage::Stage`].
mod cell;
mod common;
mod ground;
mod grid;
mod terrain;
mod turn;

pub use cell::Cell;
pub use common::{Direction, EntityId, ItemId, Position};
pub use ground::{GroundError, GroundItems};
pub use grid::Grid;
pub use terrain::{CatalogError, TerrainCatalog, TerrainFlags, TerrainId, TerrainType};
pub use turn::{TurnError, TurnSequencer};

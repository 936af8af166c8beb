//! Live spatial model of a turn-based simulation area.
//!
//! `stage-core` owns the terrain grid, the occupancy and ground-item indices,
//! the round-robin turn sequencer and the two lazily refreshed derived fields
//! (visibility and distance-from-anchor). All mutation flows through
//! [`stage::Stage`]; expensive computations are delegated to the oracles in
//! [`env`], which the stage consults but never owns.
pub mod config;
pub mod env;
pub mod error;
pub mod stage;
pub mod state;

pub use config::StageConfig;
pub use env::{
    BreadthFirstDistance, DistanceField, DistanceOracle, Env, FovOracle, MapView, OracleError,
    PcgRng, RaycastFov, RngOracle, RngStream, StageEnv, TraversalRules, compute_seed,
};
pub use error::{ErrorSeverity, StageFault};
pub use stage::{
    Actor, Breed, BuildError, CacheState, DistanceCache, OccupancyError, Stage, StageError,
    VisibilityCache,
};
pub use state::{
    CatalogError, Cell, Direction, EntityId, GroundError, GroundItems, Grid, ItemId, Position,
    TerrainCatalog, TerrainFlags, TerrainId, TerrainType, TurnError, TurnSequencer,
};

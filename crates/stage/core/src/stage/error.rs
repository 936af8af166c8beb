//! Stage-level errors.
//!
//! Index errors are caller bugs: the occupancy and ground indices trust the
//! driver to report movement in order, and every mismatch is surfaced rather
//! than repaired.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, StageFault};
use crate::state::{EntityId, GroundError, Position, TurnError};

/// Violations of the occupancy index invariants.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OccupancyError {
    /// Target cell already holds an entity.
    #[error("cannot place {entity} at {position}: occupied by {occupant}")]
    Occupied {
        entity: EntityId,
        position: Position,
        occupant: EntityId,
    },

    /// Entity is already registered somewhere on the stage.
    #[error("{entity} is already registered at {position}")]
    AlreadyRegistered { entity: EntityId, position: Position },

    /// No entity to move from this cell.
    #[error("no entity at {0} to move")]
    Vacant(Position),

    /// The index does not hold the entity where the entity says it stands.
    #[error("{entity} reports {position} but the index holds {found:?} there")]
    Mismatch {
        entity: EntityId,
        position: Position,
        found: Option<EntityId>,
    },

    /// A spawner built an entity somewhere other than the cell it was given.
    #[error("{entity} was spawned at {actual} instead of {expected}")]
    MisplacedSpawn {
        entity: EntityId,
        expected: Position,
        actual: Position,
    },
}

impl StageFault for OccupancyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use OccupancyError::*;
        match self {
            Occupied { .. } => "OCCUPANCY_OCCUPIED",
            AlreadyRegistered { .. } => "OCCUPANCY_ALREADY_REGISTERED",
            Vacant(_) => "OCCUPANCY_VACANT",
            Mismatch { .. } => "OCCUPANCY_MISMATCH",
            MisplacedSpawn { .. } => "OCCUPANCY_MISPLACED_SPAWN",
        }
    }
}

/// Errors around the one-shot build step.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("finish_build was already called for this stage")]
    AlreadyBuilt,

    #[error("build start {0} lies outside the stage")]
    StartOutOfBounds(Position),
}

impl StageFault for BuildError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BuildError::AlreadyBuilt => ErrorSeverity::Internal,
            BuildError::StartOutOfBounds(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BuildError::AlreadyBuilt => "BUILD_ALREADY_BUILT",
            BuildError::StartOutOfBounds(_) => "BUILD_START_OUT_OF_BOUNDS",
        }
    }
}

/// Any error a stage operation can return.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Occupancy(#[from] OccupancyError),

    #[error(transparent)]
    Ground(#[from] GroundError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Distance queries need an anchor entity.
    #[error("no anchor entity has been set")]
    AnchorNotSet,

    /// The anchor entity is not on the stage.
    #[error("anchor {0} is not registered on the stage")]
    AnchorNotRegistered(EntityId),
}

impl StageFault for StageError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StageError::Occupancy(err) => err.severity(),
            StageError::Ground(err) => err.severity(),
            StageError::Turn(err) => err.severity(),
            StageError::Build(err) => err.severity(),
            StageError::Oracle(err) => err.severity(),
            StageError::AnchorNotSet | StageError::AnchorNotRegistered(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StageError::Occupancy(err) => err.error_code(),
            StageError::Ground(err) => err.error_code(),
            StageError::Turn(err) => err.error_code(),
            StageError::Build(err) => err.error_code(),
            StageError::Oracle(err) => err.error_code(),
            StageError::AnchorNotSet => "STAGE_ANCHOR_NOT_SET",
            StageError::AnchorNotRegistered(_) => "STAGE_ANCHOR_NOT_REGISTERED",
        }
    }
}

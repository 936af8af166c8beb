//! Oracle access errors.

use crate::error::{ErrorSeverity, StageFault};

/// Errors that occur when an operation needs an oracle the environment lacks.
///
/// These are fatal: the stage cannot compute visibility, distances or random
/// placements without the corresponding collaborator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// FovOracle is not available in the environment.
    #[error("FovOracle not available")]
    FovNotAvailable,

    /// DistanceOracle is not available in the environment.
    #[error("DistanceOracle not available")]
    DistanceNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl StageFault for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            FovNotAvailable => "ORACLE_FOV_NOT_AVAILABLE",
            DistanceNotAvailable => "ORACLE_DISTANCE_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}

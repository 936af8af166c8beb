//! Collaborators the stage consults but does not own.
//!
//! Oracles compute the expensive derived fields (visibility, distances) and
//! supply randomness. The [`Env`] aggregate bundles them so stage operations
//! can ask for exactly the oracle they need and fail cleanly when it is
//! missing.
mod distance;
mod error;
mod fov;
mod rng;
mod view;

pub use distance::{BreadthFirstDistance, DistanceField, DistanceOracle};
pub use error::OracleError;
pub use fov::{FovOracle, RaycastFov};
pub use rng::{PcgRng, RngOracle, RngStream, compute_seed};
pub use view::{MapView, TraversalRules};

/// Aggregates the oracles required by stage operations.
pub struct Env<'a, F, D, R>
where
    F: FovOracle + ?Sized,
    D: DistanceOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fov: Option<&'a F>,
    distance: Option<&'a D>,
    rng: Option<&'a R>,
}

impl<F, D, R> Clone for Env<'_, F, D, R>
where
    F: FovOracle + ?Sized,
    D: DistanceOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, D, R> Copy for Env<'_, F, D, R>
where
    F: FovOracle + ?Sized,
    D: DistanceOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type StageEnv<'a> = Env<'a, dyn FovOracle + 'a, dyn DistanceOracle + 'a, dyn RngOracle + 'a>;

impl<'a, F, D, R> Env<'a, F, D, R>
where
    F: FovOracle + ?Sized,
    D: DistanceOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(fov: Option<&'a F>, distance: Option<&'a D>, rng: Option<&'a R>) -> Self {
        Self { fov, distance, rng }
    }

    pub fn with_all(fov: &'a F, distance: &'a D, rng: &'a R) -> Self {
        Self::new(Some(fov), Some(distance), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            fov: None,
            distance: None,
            rng: None,
        }
    }

    /// Returns the FovOracle, or an error if not available.
    pub fn fov(&self) -> Result<&'a F, OracleError> {
        self.fov.ok_or(OracleError::FovNotAvailable)
    }

    /// Returns the DistanceOracle, or an error if not available.
    pub fn distance(&self) -> Result<&'a D, OracleError> {
        self.distance.ok_or(OracleError::DistanceNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, F, D, R> Env<'a, F, D, R>
where
    F: FovOracle + 'a,
    D: DistanceOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into the trait-object based [`StageEnv`].
    pub fn as_stage_env(&self) -> StageEnv<'a> {
        let fov: Option<&'a dyn FovOracle> = self.fov.map(|fov| fov as _);
        let distance: Option<&'a dyn DistanceOracle> = self.distance.map(|distance| distance as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(fov, distance, rng)
    }
}

impl<'a> StageEnv<'a> {
    /// Environment backed by the bundled reference oracles.
    pub fn reference(fov: &'a RaycastFov) -> Self {
        Env::<RaycastFov, BreadthFirstDistance, PcgRng>::with_all(
            fov,
            &BreadthFirstDistance,
            &PcgRng,
        )
        .as_stage_env()
    }
}

//! Lazily refreshed derived fields.
//!
//! Both caches are two-state machines. They differ only in what moves them
//! from fresh to stale: the visibility cache is dirtied explicitly, the
//! distance cache goes stale when the anchor it was computed for moves.

use crate::env::DistanceField;
use crate::state::Position;

/// Freshness of a derived field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CacheState {
    Fresh,
    Stale,
}

/// Dirty flag guarding the visibility field. Starts stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityCache {
    state: CacheState,
}

impl VisibilityCache {
    pub fn new() -> Self {
        Self {
            state: CacheState::Stale,
        }
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn is_stale(&self) -> bool {
        self.state == CacheState::Stale
    }

    /// Fresh → stale. Several calls between two refreshes coalesce.
    pub fn mark_dirty(&mut self) {
        self.state = CacheState::Stale;
    }

    /// Runs `recompute` only when stale and returns whether it ran.
    ///
    /// The cache stays stale when `recompute` fails.
    pub fn refresh<E>(&mut self, recompute: impl FnOnce() -> Result<(), E>) -> Result<bool, E> {
        if self.state == CacheState::Fresh {
            return Ok(false);
        }
        recompute()?;
        self.state = CacheState::Fresh;
        Ok(true)
    }
}

impl Default for VisibilityCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoized distance field keyed by the anchor position it was computed from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceCache {
    field: Option<DistanceField>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freshness relative to where the anchor currently stands.
    pub fn state_for(&self, anchor: Position) -> CacheState {
        match &self.field {
            Some(field) if field.start() == anchor => CacheState::Fresh,
            _ => CacheState::Stale,
        }
    }

    /// Anchor the cached field was computed from, if any.
    pub fn anchor(&self) -> Option<Position> {
        self.field.as_ref().map(DistanceField::start)
    }

    /// Drops the cached field regardless of the anchor.
    pub fn invalidate(&mut self) {
        self.field = None;
    }

    /// Returns the field for `anchor`, recomputing only when the anchor moved.
    pub fn get_or_compute<E>(
        &mut self,
        anchor: Position,
        compute: impl FnOnce(Position) -> Result<DistanceField, E>,
    ) -> Result<&DistanceField, E> {
        let field = match self.field.take() {
            Some(field) if field.start() == anchor => field,
            _ => compute(anchor)?,
        };
        Ok(self.field.insert(field))
    }
}

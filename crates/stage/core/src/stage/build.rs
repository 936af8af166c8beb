use crate::env::{MapView, StageEnv};
use crate::state::{Grid, Position};

use super::{BuildError, CacheState, Stage, StageError};

/// Build step, exploration bookkeeping and the visibility field.
impl Stage {
    /// Seals generation: counts explorable cells and computes the first
    /// visibility field from `start`. Must be called exactly once.
    ///
    /// The explorable count assumes every traversable cell is reachable from
    /// `start`; generation is trusted to guarantee that.
    pub fn finish_build(&mut self, start: Position, env: &StageEnv<'_>) -> Result<u32, StageError> {
        if self.num_explorable.is_some() {
            return Err(BuildError::AlreadyBuilt.into());
        }
        if !self.contains(start) {
            return Err(BuildError::StartOutOfBounds(start).into());
        }

        let explorable = self.count_explorable();
        self.mark_visibility_dirty();
        self.refresh_visibility(start, env)?;
        self.num_explorable = Some(explorable);

        tracing::info!(
            "stage {}x{} built: {} explorable cells, start at {}",
            self.width(),
            self.height(),
            explorable,
            start
        );
        Ok(explorable)
    }

    pub fn is_built(&self) -> bool {
        self.num_explorable.is_some()
    }

    /// Explorable cell count fixed by [`Stage::finish_build`].
    pub fn num_explorable(&self) -> Option<u32> {
        self.num_explorable
    }

    /// Interior cells that are traversable or 8-adjacent to a traversable
    /// cell. The outer ring is assumed to be permanent wall.
    fn count_explorable(&self) -> u32 {
        let traversable = |position: Position| {
            self.cells
                .get(position)
                .and_then(|cell| self.catalog.get(cell.terrain()))
                .is_some_and(|terrain| terrain.is_traversable())
        };

        let count = self
            .cells
            .interior()
            .filter(|&position| {
                traversable(position) || position.neighbors().into_iter().any(&traversable)
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Interior cells that have been seen at least once.
    pub fn num_explored(&self) -> u32 {
        let count = self
            .cells
            .interior()
            .filter(|&position| self.cells[position].is_explored())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Share of explorable cells already explored, in `0.0..=1.0`.
    pub fn exploration_progress(&self) -> Option<f32> {
        let explorable = self.num_explorable?;
        if explorable == 0 {
            return Some(1.0);
        }
        Some((self.num_explored() as f32 / explorable as f32).min(1.0))
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Flags the visibility field for recomputation on the next refresh.
    pub fn mark_visibility_dirty(&mut self) {
        self.visibility.mark_dirty();
    }

    pub fn visibility_state(&self) -> CacheState {
        self.visibility.state()
    }

    /// Recomputes visibility from `anchor` if it was dirtied; otherwise does
    /// nothing. Returns whether the field of view oracle ran.
    pub fn refresh_visibility(
        &mut self,
        anchor: Position,
        env: &StageEnv<'_>,
    ) -> Result<bool, StageError> {
        let cells = &mut self.cells;
        let catalog = &self.catalog;
        let occupants = &self.occupants;

        let refreshed = self.visibility.refresh(|| {
            let fov = env.fov()?;
            let visible = {
                let view = MapView::new(cells, catalog, occupants);
                fov.compute_visible(&view, anchor)
            };

            let mut mask = Grid::new(cells.width(), cells.height(), false);
            for position in &visible {
                if let Some(seen) = mask.get_mut(*position) {
                    *seen = true;
                }
            }
            for (position, cell) in cells.iter_mut() {
                cell.set_visible(mask[position]);
            }

            tracing::debug!("visibility refreshed from {}: {} cells", anchor, visible.len());
            Ok::<_, StageError>(())
        })?;
        Ok(refreshed)
    }

    /// Sets one cell's visibility; `explored` latches on the first `true`.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the stage.
    pub fn set_visible(&mut self, position: Position, visible: bool) {
        self.cells[position].set_visible(visible);
    }
}

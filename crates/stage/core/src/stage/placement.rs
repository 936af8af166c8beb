use std::collections::BTreeSet;

use crate::env::{DistanceField, MapView, RngStream, StageEnv, TraversalRules};
use crate::state::{EntityId, Position};

use super::{Actor, CacheState, OccupancyError, Stage, StageError};

/// Draw context for uniform tile sampling.
const TILE_DRAWS: u32 = 1;
/// Draw context for group sizing and member placement.
const GROUP_DRAWS: u32 = 2;

/// Kind of entity that spawns in clusters.
pub trait Breed {
    fn name(&self) -> &str;

    /// Nominal number of members in a group of this breed.
    fn group_size(&self) -> u32;
}

/// Anchor distances and randomized placement.
impl Stage {
    /// Designates the entity that distance queries are measured from.
    pub fn set_anchor(&mut self, anchor: EntityId) {
        self.anchor = Some(anchor);
    }

    pub fn anchor(&self) -> Option<EntityId> {
        self.anchor
    }

    fn anchor_position(&self) -> Result<Position, StageError> {
        let anchor = self.anchor.ok_or(StageError::AnchorNotSet)?;
        self.entity_position(anchor)
            .ok_or(StageError::AnchorNotRegistered(anchor))
    }

    /// Freshness of the distance field relative to the anchor's position.
    pub fn distance_state(&self) -> CacheState {
        match self.anchor_position() {
            Ok(anchor) => self.distances.state_for(anchor),
            Err(_) => CacheState::Stale,
        }
    }

    fn anchor_field(&mut self, env: &StageEnv<'_>) -> Result<&DistanceField, StageError> {
        let anchor = self.anchor_position()?;
        let view = MapView::new(&self.cells, &self.catalog, &self.occupants);

        self.distances.get_or_compute(anchor, |start| {
            let oracle = env.distance()?;
            tracing::debug!("recomputing distance field from anchor {}", start);
            Ok(oracle.compute_distances(&view, start, TraversalRules::ANCHOR_DISTANCE))
        })
    }

    /// Steps from the anchor to `position` through walkable, openable and
    /// flyable terrain, ignoring occupants. `None` when unreachable.
    ///
    /// The field is recomputed only when the anchor has moved since the last
    /// query.
    pub fn distance_to_anchor(
        &mut self,
        position: Position,
        env: &StageEnv<'_>,
    ) -> Result<Option<u32>, StageError> {
        Ok(self.anchor_field(env)?.get(position))
    }

    fn rng_stream<'e>(
        &self,
        env: &StageEnv<'e>,
        context: u32,
    ) -> Result<RngStream<'e>, StageError> {
        Ok(RngStream::new(env.rng()?, self.config.seed, self.draws, context))
    }

    fn sample_open_tile(&self, stream: &mut RngStream<'_>) -> Position {
        loop {
            let position = Position::new(
                stream.below(self.width()) as i32,
                stream.below(self.height()) as i32,
            );
            if self.is_open(position) {
                return position;
            }
        }
    }

    /// Uniformly samples positions until one is walkable and unoccupied.
    ///
    /// There is no attempt cap: on a stage with no open tile this never
    /// returns.
    pub fn find_open_tile(&mut self, env: &StageEnv<'_>) -> Result<Position, StageError> {
        let mut stream = self.rng_stream(env, TILE_DRAWS)?;
        let position = self.sample_open_tile(&mut stream);
        self.draws = stream.draws();
        Ok(position)
    }

    /// Samples `tries` open tiles and keeps the one farthest from the anchor.
    ///
    /// Ties keep the earlier candidate; unreachable candidates rank below any
    /// reachable one. At least one candidate is always sampled.
    pub fn find_distant_open_tile(
        &mut self,
        tries: u32,
        env: &StageEnv<'_>,
    ) -> Result<Position, StageError> {
        let mut best: Option<(Position, Option<u32>)> = None;

        for _ in 0..tries.max(1) {
            let candidate = self.find_open_tile(env)?;
            let distance = self.distance_to_anchor(candidate, env)?;

            match best {
                Some((_, best_distance)) if distance <= best_distance => {}
                _ => best = Some((candidate, distance)),
            }
        }

        let (position, distance) = best.unwrap_or_default();
        tracing::trace!("distant open tile {} at distance {:?}", position, distance);
        Ok(position)
    }

    /// [`Stage::find_distant_open_tile`] with the configured number of tries.
    pub fn find_distant_open_tile_default(
        &mut self,
        env: &StageEnv<'_>,
    ) -> Result<Position, StageError> {
        self.find_distant_open_tile(self.config.distant_tile_tries, env)
    }

    /// Spawns a cluster of `breed` around `origin`.
    ///
    /// The group size is drawn from a triangular distribution centered on the
    /// breed's nominal size. The first member goes to `origin`; each further
    /// member takes a random open cell adjacent to any member placed so far.
    /// When no such cell is left the group stays smaller. `spawn` builds each
    /// entity at the position it is given; ownership returns to the caller.
    /// If any member fails to place, every member already placed is
    /// unregistered before the error is returned.
    pub fn spawn_group<B, E, F>(
        &mut self,
        breed: &B,
        origin: Position,
        env: &StageEnv<'_>,
        mut spawn: F,
    ) -> Result<Vec<E>, StageError>
    where
        B: Breed + ?Sized,
        E: Actor,
        F: FnMut(&B, Position) -> E,
    {
        let mut stream = self.rng_stream(env, GROUP_DRAWS)?;
        let nominal = breed.group_size().max(1);
        let count = stream.triangle(nominal as i32, nominal / 2).max(1) as usize;

        let mut members = Vec::with_capacity(count);
        let result = self.place_group(breed, origin, count, &mut stream, &mut spawn, &mut members);
        self.draws = stream.draws();
        if let Err(err) = result {
            self.unwind_group(&members);
            return Err(err);
        }

        if members.len() < count {
            tracing::warn!(
                "{} group at {} stopped at {} of {}: no open cell left",
                breed.name(),
                origin,
                members.len(),
                count
            );
        } else {
            tracing::debug!("spawned {} {} at {}", count, breed.name(), origin);
        }
        Ok(members)
    }

    /// Unregisters the members of a group that failed part way through.
    fn unwind_group<E: Actor>(&mut self, members: &[E]) {
        for member in members.iter().rev() {
            if let Err(err) = self.remove_entity(member) {
                tracing::error!("failed to unwind {}: {}", member.id(), err);
            }
        }
        tracing::debug!("unwound {} group members", members.len());
    }

    fn place_group<B, E, F>(
        &mut self,
        breed: &B,
        origin: Position,
        count: usize,
        stream: &mut RngStream<'_>,
        spawn: &mut F,
        members: &mut Vec<E>,
    ) -> Result<(), StageError>
    where
        B: Breed + ?Sized,
        E: Actor,
        F: FnMut(&B, Position) -> E,
    {
        let mut placed = vec![origin];
        self.place_member(breed, origin, spawn, members)?;

        while members.len() < count {
            let candidates: Vec<Position> = placed
                .iter()
                .flat_map(|member| member.neighbors())
                .filter(|&cell| self.is_open(cell))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let Some(&position) = stream.pick(&candidates) else {
                break;
            };
            self.place_member(breed, position, spawn, members)?;
            placed.push(position);
        }
        Ok(())
    }

    fn place_member<B, E, F>(
        &mut self,
        breed: &B,
        position: Position,
        spawn: &mut F,
        members: &mut Vec<E>,
    ) -> Result<(), StageError>
    where
        B: Breed + ?Sized,
        E: Actor,
        F: FnMut(&B, Position) -> E,
    {
        let entity = spawn(breed, position);
        if entity.position() != position {
            let err = OccupancyError::MisplacedSpawn {
                entity: entity.id(),
                expected: position,
                actual: entity.position(),
            };
            tracing::error!("{}", err);
            return Err(err.into());
        }
        self.add_entity(&entity)?;
        members.push(entity);
        Ok(())
    }
}

//! Distance-field oracle.

use std::collections::VecDeque;

use crate::state::Position;

use super::{MapView, TraversalRules};

/// Computes shortest traversal distances from a start cell.
pub trait DistanceOracle: Send + Sync {
    fn compute_distances(
        &self,
        map: &MapView<'_>,
        start: Position,
        rules: TraversalRules,
    ) -> DistanceField;
}

/// Dense step-count grid produced by a [`DistanceOracle`].
///
/// Distances default to `u32::MAX` for unreachable cells; [`DistanceField::get`]
/// maps that to `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    start: Position,
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    const UNREACHABLE: u32 = u32::MAX;

    /// A field of the given size where nothing has been reached yet.
    pub fn unreachable(start: Position, width: u32, height: u32) -> Self {
        Self {
            start,
            width,
            height,
            distances: vec![Self::UNREACHABLE; width as usize * height as usize],
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        (position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Steps from the start to `position`, or `None` when unreachable.
    pub fn get(&self, position: Position) -> Option<u32> {
        let index = self.index(position)?;
        let distance = self.distances[index];
        (distance != Self::UNREACHABLE).then_some(distance)
    }

    /// Records `distance` at `position`; ignored outside the field.
    pub fn set(&mut self, position: Position, distance: u32) {
        if let Some(index) = self.index(position) {
            self.distances[index] = distance;
        }
    }
}

/// Uniform-cost breadth-first flood fill over the 8-connected grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BreadthFirstDistance;

impl DistanceOracle for BreadthFirstDistance {
    fn compute_distances(
        &self,
        map: &MapView<'_>,
        start: Position,
        rules: TraversalRules,
    ) -> DistanceField {
        let mut field = DistanceField::unreachable(start, map.width(), map.height());
        if !map.contains(start) {
            return field;
        }

        field.set(start, 0);
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            let Some(current) = field.get(cell) else {
                continue;
            };
            let next = current.saturating_add(1);

            for neighbor in cell.neighbors() {
                if !map.can_traverse(neighbor, rules) {
                    continue;
                }
                if field.get(neighbor).is_some_and(|known| known <= next) {
                    continue;
                }
                field.set(neighbor, next);
                queue.push_back(neighbor);
            }
        }
        field
    }
}

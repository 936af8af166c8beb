use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, StageFault};

use super::{ItemId, Position};

/// Errors reported by the ground inventory index.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GroundError {
    #[error("no items rest at {0}")]
    EmptyPosition(Position),

    #[error("{item} is not on the ground at {position}")]
    ItemNotFound { item: ItemId, position: Position },
}

impl StageFault for GroundError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            GroundError::EmptyPosition(_) => "GROUND_EMPTY_POSITION",
            GroundError::ItemNotFound { .. } => "GROUND_ITEM_NOT_FOUND",
        }
    }
}

/// Items resting on the ground, grouped by position.
///
/// A position with no items never appears as a key, so "is anything here" is
/// a plain membership test.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GroundItems {
    piles: BTreeMap<Position, Vec<ItemId>>,
}

impl GroundItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: ItemId, position: Position) {
        self.piles.entry(position).or_default().push(item);
    }

    pub fn contains(&self, position: Position) -> bool {
        self.piles.contains_key(&position)
    }

    /// Items at `position` in no particular order; empty when nothing is there.
    pub fn at(&self, position: Position) -> &[ItemId] {
        self.piles.get(&position).map_or(&[][..], Vec::as_slice)
    }

    pub fn remove(&mut self, item: ItemId, position: Position) -> Result<(), GroundError> {
        let pile = self
            .piles
            .get_mut(&position)
            .ok_or(GroundError::EmptyPosition(position))?;
        let index = pile
            .iter()
            .position(|&candidate| candidate == item)
            .ok_or(GroundError::ItemNotFound { item, position })?;

        pile.swap_remove(index);
        if pile.is_empty() {
            self.piles.remove(&position);
        }
        Ok(())
    }

    /// Number of positions holding at least one item.
    pub fn occupied_positions(&self) -> usize {
        self.piles.len()
    }

    /// Every `(item, position)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, Position)> + '_ {
        self.piles
            .iter()
            .flat_map(|(&position, pile)| pile.iter().map(move |&item| (item, position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_removal_prunes_the_pile() {
        let mut ground = GroundItems::new();
        let pos = Position::new(2, 3);
        ground.add(ItemId(1), pos);
        ground.add(ItemId(2), pos);
        assert_eq!(ground.occupied_positions(), 1);

        ground.remove(ItemId(1), pos).unwrap();
        assert!(ground.contains(pos));

        ground.remove(ItemId(2), pos).unwrap();
        assert!(!ground.contains(pos));
        assert!(ground.at(pos).is_empty());
        assert_eq!(ground.occupied_positions(), 0);
    }

    #[test]
    fn removing_absent_item_reports_position() {
        let mut ground = GroundItems::new();
        let pos = Position::new(1, 1);

        assert_eq!(
            ground.remove(ItemId(5), pos),
            Err(GroundError::EmptyPosition(pos))
        );

        ground.add(ItemId(1), pos);
        assert_eq!(
            ground.remove(ItemId(5), pos),
            Err(GroundError::ItemNotFound {
                item: ItemId(5),
                position: pos
            })
        );
        assert_eq!(ground.at(pos), &[ItemId(1)]);
    }

    #[test]
    fn iter_visits_every_item() {
        let mut ground = GroundItems::new();
        ground.add(ItemId(1), Position::new(0, 0));
        ground.add(ItemId(2), Position::new(0, 0));
        ground.add(ItemId(3), Position::new(4, 1));

        let mut pairs: Vec<_> = ground.iter().collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                (ItemId(1), Position::new(0, 0)),
                (ItemId(2), Position::new(0, 0)),
                (ItemId(3), Position::new(4, 1)),
            ]
        );
    }
}

use crate::error::{ErrorSeverity, StageFault};

use super::EntityId;

/// Errors that can occur during turn operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no entities are currently registered")]
    NoActiveEntities,

    #[error("entity {0} is not in the turn order")]
    NotScheduled(EntityId),
}

impl StageFault for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::NoActiveEntities => ErrorSeverity::Recoverable,
            TurnError::NotScheduled(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::NoActiveEntities => "TURN_NO_ACTIVE_ENTITIES",
            TurnError::NotScheduled(_) => "TURN_NOT_SCHEDULED",
        }
    }
}

/// Round-robin turn order over registered entities.
///
/// Order is insertion order; `cursor` names whose turn it is and is always a
/// valid index while the order is non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TurnSequencer {
    order: Vec<EntityId>,
    cursor: usize,
}

impl TurnSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.order.contains(&entity)
    }

    /// Entities in turn order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// The entity whose turn it is.
    pub fn current(&self) -> Option<EntityId> {
        self.order.get(self.cursor).copied()
    }

    pub fn push(&mut self, entity: EntityId) {
        self.order.push(entity);
    }

    /// Removes `entity` without disturbing who acts next.
    ///
    /// Removing an entry before the cursor shifts the cursor back with it;
    /// removing the current entity hands the turn to its successor, wrapping to
    /// the front when it was last.
    pub fn remove(&mut self, entity: EntityId) -> Result<(), TurnError> {
        let index = self
            .order
            .iter()
            .position(|&candidate| candidate == entity)
            .ok_or(TurnError::NotScheduled(entity))?;

        self.order.remove(index);

        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.order.len() {
            self.cursor = 0;
        }
        Ok(())
    }

    /// Moves the cursor to the next entity, wrapping around.
    pub fn advance(&mut self) -> Result<EntityId, TurnError> {
        if self.order.is_empty() {
            return Err(TurnError::NoActiveEntities);
        }
        self.cursor = (self.cursor + 1) % self.order.len();
        Ok(self.order[self.cursor])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: EntityId = EntityId(1);
    const B: EntityId = EntityId(2);
    const C: EntityId = EntityId(3);

    fn sequencer_at(cursor_entity: EntityId) -> TurnSequencer {
        let mut turns = TurnSequencer::new();
        for entity in [A, B, C] {
            turns.push(entity);
        }
        while turns.current() != Some(cursor_entity) {
            turns.advance().unwrap();
        }
        turns
    }

    #[test]
    fn removing_before_cursor_keeps_current_actor() {
        let mut turns = sequencer_at(B);
        assert_eq!(turns.cursor(), 1);

        turns.remove(A).unwrap();

        assert_eq!(turns.cursor(), 0);
        assert_eq!(turns.current(), Some(B));
        assert_eq!(turns.advance().unwrap(), C);
        assert_eq!(turns.advance().unwrap(), B);
    }

    #[test]
    fn removing_current_hands_turn_to_successor() {
        let mut turns = sequencer_at(B);
        turns.remove(B).unwrap();
        assert_eq!(turns.current(), Some(C));
    }

    #[test]
    fn removing_last_current_wraps_to_front() {
        let mut turns = sequencer_at(C);
        turns.remove(C).unwrap();
        assert_eq!(turns.cursor(), 0);
        assert_eq!(turns.current(), Some(A));
    }

    #[test]
    fn removing_after_cursor_does_not_move_it() {
        let mut turns = sequencer_at(A);
        turns.remove(C).unwrap();
        assert_eq!(turns.current(), Some(A));
        assert_eq!(turns.advance().unwrap(), B);
        assert_eq!(turns.advance().unwrap(), A);
    }

    #[test]
    fn every_remaining_entity_acts_once_per_cycle_after_removal() {
        let mut turns = TurnSequencer::new();
        for id in 1..=5 {
            turns.push(EntityId(id));
        }
        turns.advance().unwrap();
        turns.advance().unwrap(); // #3 is current

        turns.remove(EntityId(1)).unwrap();
        turns.remove(EntityId(4)).unwrap();

        let mut seen = vec![turns.current().unwrap()];
        for _ in 1..turns.len() {
            seen.push(turns.advance().unwrap());
        }
        assert_eq!(seen, vec![EntityId(3), EntityId(5), EntityId(2)]);
    }

    #[test]
    fn advance_on_empty_fails() {
        let mut turns = TurnSequencer::new();
        assert_eq!(turns.advance(), Err(TurnError::NoActiveEntities));
    }

    #[test]
    fn removing_unknown_entity_fails() {
        let mut turns = sequencer_at(A);
        let err = turns.remove(EntityId(99)).unwrap_err();
        assert_eq!(err, TurnError::NotScheduled(EntityId(99)));
        assert!(err.severity().is_internal());
    }
}

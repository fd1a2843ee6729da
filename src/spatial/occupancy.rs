//! Occupancy index: which agent slot sits on each cell

use crate::core::types::{GridSize, Position};
use crate::entity::Agent;
use crate::spatial::grid::Grid;

/// Position -> agent slot for one species.
///
/// At most one slot per cell; a second insert on the same cell is a
/// programming error caught by a debug assertion.
#[derive(Debug, Clone)]
pub struct Occupancy {
    slots: Grid<Option<usize>>,
    count: usize,
}

impl Occupancy {
    pub fn new(size: GridSize) -> Self {
        Self {
            slots: Grid::new(size),
            count: 0,
        }
    }

    /// Build from the current positions of an agent array
    pub fn from_agents(size: GridSize, agents: &[Agent]) -> Self {
        let mut occupancy = Self::new(size);
        occupancy.rebuild(agents.iter().map(|a| a.position));
        occupancy
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.count = 0;
    }

    pub fn insert(&mut self, pos: Position, slot: usize) {
        let cell = self.slots.get_mut(pos);
        debug_assert!(
            cell.is_none(),
            "two agents of one species on {:?} (slots {:?} and {})",
            pos,
            cell,
            slot
        );
        if cell.is_none() {
            self.count += 1;
        }
        *cell = Some(slot);
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<usize> {
        *self.slots.get(pos)
    }

    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.slots.get(pos).is_some()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Rebuild from positions; slot `i` is the i-th position
    pub fn rebuild(&mut self, positions: impl Iterator<Item = Position>) {
        self.clear();
        for (slot, pos) in positions.enumerate() {
            self.insert(pos, slot);
        }
    }
}

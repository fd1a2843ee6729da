//! Generic grid for per-cell data

use crate::core::types::{GridSize, Position};

/// Dense row-major 2D array over a toroidal grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone> {
    size: GridSize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(size: GridSize) -> Self {
        Self::filled(size, T::default())
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(size: GridSize, value: T) -> Self {
        Self {
            size,
            data: vec![value; size.cell_count()],
        }
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn get(&self, pos: Position) -> &T {
        &self.data[self.size.index(pos)]
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Position) -> &mut T {
        let idx = self.size.index(pos);
        &mut self.data[idx]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, value: T) {
        let idx = self.size.index(pos);
        self.data[idx] = value;
    }

    /// Reset every cell to `value` without reallocating
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.size.positions().zip(self.data.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut grid: Grid<u8> = Grid::new(GridSize::new(4, 3));
        grid.set(Position::new(3, 2), 9);
        assert_eq!(*grid.get(Position::new(3, 2)), 9);
        assert_eq!(*grid.get(Position::new(0, 0)), 0);
        *grid.get_mut(Position::new(1, 1)) += 2;
        assert_eq!(grid.values().map(|&v| v as u32).sum::<u32>(), 11);
    }

    #[test]
    fn test_iter_pairs_positions_with_cells() {
        let mut grid = Grid::filled(GridSize::new(2, 2), false);
        grid.set(Position::new(1, 0), true);
        let hits: Vec<Position> = grid.iter().filter(|(_, v)| **v).map(|(p, _)| p).collect();
        assert_eq!(hits, vec![Position::new(1, 0)]);
    }
}

//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Simulation tick counter
pub type Tick = u64;

/// Species enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Herbivore,
    Predator,
}

impl Species {
    pub fn name(&self) -> &'static str {
        match self {
            Species::Herbivore => "herbivore",
            Species::Predator => "predator",
        }
    }
}

/// Cell coordinate on the torus. Always within the owning grid's bounds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Compass heading, iterated in N, E, S, W order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset; y grows southward
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Dimensions of a toroidal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Fold arbitrary signed coordinates back onto the torus
    #[inline]
    pub fn wrap(&self, x: i64, y: i64) -> Position {
        Position {
            x: x.rem_euclid(self.width as i64) as u32,
            y: y.rem_euclid(self.height as i64) as u32,
        }
    }

    #[inline]
    pub fn offset(&self, pos: Position, dx: i64, dy: i64) -> Position {
        self.wrap(pos.x as i64 + dx, pos.y as i64 + dy)
    }

    #[inline]
    pub fn step(&self, pos: Position, dir: Direction) -> Position {
        let (dx, dy) = dir.offset();
        self.offset(pos, dx, dy)
    }

    /// The four orthogonal neighbours in N, E, S, W order
    pub fn neighbors(&self, pos: Position) -> [(Direction, Position); 4] {
        Direction::ALL.map(|dir| (dir, self.step(pos, dir)))
    }

    /// Shortest distance between two coordinates on a wrapped axis of length `size`
    #[inline]
    pub fn axis_distance(a: u32, b: u32, size: u32) -> u32 {
        let d = a.abs_diff(b);
        d.min(size - d)
    }

    /// Toroidal Manhattan distance
    pub fn distance(&self, a: Position, b: Position) -> u32 {
        Self::axis_distance(a.x, b.x, self.width) + Self::axis_distance(a.y, b.y, self.height)
    }

    /// Row-major flat index
    #[inline]
    pub fn index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// All cells in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative_coordinates() {
        let size = GridSize::new(5, 4);
        assert_eq!(size.wrap(-1, -1), Position::new(4, 3));
        assert_eq!(size.wrap(5, 4), Position::new(0, 0));
        assert_eq!(size.wrap(-11, 9), Position::new(4, 1));
    }

    #[test]
    fn test_step_wraps_at_edges() {
        let size = GridSize::new(3, 3);
        let corner = Position::new(0, 0);
        assert_eq!(size.step(corner, Direction::North), Position::new(0, 2));
        assert_eq!(size.step(corner, Direction::West), Position::new(2, 0));
        assert_eq!(size.step(Position::new(2, 2), Direction::East), Position::new(0, 2));
        assert_eq!(size.step(Position::new(2, 2), Direction::South), Position::new(2, 0));
    }

    #[test]
    fn test_neighbors_order() {
        let size = GridSize::new(4, 4);
        let dirs: Vec<Direction> = size
            .neighbors(Position::new(1, 1))
            .iter()
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
    }

    #[test]
    fn test_toroidal_distance() {
        let size = GridSize::new(10, 6);
        // 0 and 9 are adjacent across the seam
        assert_eq!(size.distance(Position::new(0, 0), Position::new(9, 0)), 1);
        assert_eq!(size.distance(Position::new(0, 0), Position::new(5, 3)), 8);
        assert_eq!(size.distance(Position::new(2, 5), Position::new(2, 0)), 1);
    }

    #[test]
    fn test_index_is_row_major() {
        let size = GridSize::new(3, 2);
        let indices: Vec<usize> = size.positions().map(|p| size.index(p)).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }
}

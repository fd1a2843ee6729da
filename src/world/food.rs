//! Food grid - a regrowing resource automaton
//!
//! An eaten cell counts its regrow timer down only on ticks where one of its
//! four neighbours still carries food. Bare patches cut off from any growth
//! never recover.

use rand::Rng;

use crate::core::types::{GridSize, Position};
use crate::spatial::grid::Grid;
use crate::world::terrain::Terrain;

/// State of one cell. `regrow_timer` is `None` only on rock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FoodCell {
    has_food: bool,
    regrow_timer: Option<u32>,
}

impl FoodCell {
    const ROCK: FoodCell = FoodCell {
        has_food: false,
        regrow_timer: None,
    };

    const GROWN: FoodCell = FoodCell {
        has_food: true,
        regrow_timer: Some(0),
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodGrid {
    cells: Grid<FoodCell>,
    regrow_ticks: u32,
    food_count: usize,
}

impl FoodGrid {
    /// Food on every open cell
    pub fn full(terrain: &Terrain, regrow_ticks: u32) -> Self {
        Self::build(terrain, regrow_ticks, |_| true)
    }

    /// Food on no cell; every open cell starts a full regrow countdown
    pub fn barren(terrain: &Terrain, regrow_ticks: u32) -> Self {
        Self::build(terrain, regrow_ticks, |_| false)
    }

    /// Each open cell carries food with probability `coverage`
    pub fn with_coverage<R: Rng + ?Sized>(
        terrain: &Terrain,
        regrow_ticks: u32,
        coverage: f64,
        rng: &mut R,
    ) -> Self {
        if coverage >= 1.0 {
            return Self::full(terrain, regrow_ticks);
        }
        Self::build(terrain, regrow_ticks, |_| rng.gen::<f64>() < coverage)
    }

    fn build(
        terrain: &Terrain,
        regrow_ticks: u32,
        mut seeded: impl FnMut(Position) -> bool,
    ) -> Self {
        let size = terrain.size();
        let mut cells = Grid::filled(size, FoodCell::ROCK);
        let mut food_count = 0;

        for pos in size.positions() {
            if terrain.is_blocked(pos) {
                continue;
            }
            if seeded(pos) {
                cells.set(pos, FoodCell::GROWN);
                food_count += 1;
            } else {
                cells.set(
                    pos,
                    FoodCell {
                        has_food: false,
                        regrow_timer: Some(regrow_ticks),
                    },
                );
            }
        }

        Self {
            cells,
            regrow_ticks,
            food_count,
        }
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.cells.size()
    }

    /// Always false on rock
    #[inline]
    pub fn has(&self, pos: Position) -> bool {
        self.cells.get(pos).has_food
    }

    pub fn regrow_timer(&self, pos: Position) -> Option<u32> {
        self.cells.get(pos).regrow_timer
    }

    /// Consume the food on `pos`. Callers check `has` first.
    pub fn eat(&mut self, pos: Position) {
        let regrow_ticks = self.regrow_ticks;
        let cell = self.cells.get_mut(pos);
        debug_assert!(cell.has_food, "eat on foodless cell {:?}", pos);
        if cell.has_food {
            self.food_count -= 1;
        }
        cell.has_food = false;
        cell.regrow_timer = Some(regrow_ticks);
    }

    /// Put food on an open cell. Returns false on rock.
    pub fn plant(&mut self, pos: Position) -> bool {
        let cell = self.cells.get_mut(pos);
        if cell.regrow_timer.is_none() {
            return false;
        }
        if !cell.has_food {
            *cell = FoodCell::GROWN;
            self.food_count += 1;
        }
        true
    }

    /// Total number of cells currently carrying food
    pub fn count(&self) -> usize {
        self.food_count
    }

    fn has_food_neighbour(&self, pos: Position) -> bool {
        let size = self.cells.size();
        size.neighbors(pos)
            .iter()
            .any(|(_, n)| self.cells.get(*n).has_food)
    }

    /// Advance one tick; returns how many cells regrew.
    ///
    /// The neighbour test always reads the grid as it was before this call:
    /// cells regrowing now are applied in a second pass.
    pub fn update(&mut self) -> usize {
        let size = self.cells.size();
        let mut to_regrow = Vec::new();

        for pos in size.positions() {
            let cell = *self.cells.get(pos);
            if cell.has_food {
                continue;
            }
            let Some(timer) = cell.regrow_timer else {
                continue;
            };
            if !self.has_food_neighbour(pos) {
                continue;
            }

            let timer = timer.saturating_sub(1);
            self.cells.get_mut(pos).regrow_timer = Some(timer);
            if timer == 0 {
                to_regrow.push(pos);
            }
        }

        for &pos in &to_regrow {
            self.cells.set(pos, FoodCell::GROWN);
        }
        self.food_count += to_regrow.len();
        to_regrow.len()
    }

    /// Per-cell food flags, row-major
    pub fn flags(&self) -> Vec<bool> {
        self.cells.values().map(|c| c.has_food).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const REGROW: u32 = 4;

    #[test]
    fn test_rock_never_has_food() {
        let size = GridSize::new(3, 3);
        let rock = Position::new(2, 2);
        let terrain = Terrain::from_blocked(size, [rock]);
        let mut food = FoodGrid::full(&terrain, REGROW);

        assert!(!food.has(rock));
        assert_eq!(food.regrow_timer(rock), None);
        assert_eq!(food.count(), 8);
        assert!(!food.plant(rock));
        for _ in 0..20 {
            food.update();
        }
        assert!(!food.has(rock));
    }

    #[test]
    fn test_eaten_cell_regrows_after_exact_period() {
        let terrain = Terrain::open(GridSize::new(5, 5));
        let mut food = FoodGrid::full(&terrain, REGROW);
        let pos = Position::new(2, 2);

        food.eat(pos);
        assert!(!food.has(pos));
        assert_eq!(food.count(), 24);

        for _ in 0..REGROW - 1 {
            food.update();
            assert!(!food.has(pos));
        }
        assert_eq!(food.update(), 1);
        assert!(food.has(pos));
        assert_eq!(food.regrow_timer(pos), Some(0));
        assert_eq!(food.count(), 25);
    }

    #[test]
    fn test_isolated_patch_never_regrows() {
        // Centre cell walled in by rock on all four sides
        let size = GridSize::new(3, 3);
        let centre = Position::new(1, 1);
        let walls: Vec<Position> = size.neighbors(centre).iter().map(|(_, p)| *p).collect();
        let terrain = Terrain::from_blocked(size, walls);
        let mut food = FoodGrid::full(&terrain, 1);

        food.eat(centre);
        for _ in 0..100 {
            food.update();
        }
        assert!(!food.has(centre));
        assert_eq!(food.regrow_timer(centre), Some(1));
    }

    #[test]
    fn test_regrowth_does_not_chain_within_one_update() {
        // Strip: food | bare | bare | rock
        let size = GridSize::new(4, 1);
        let terrain = Terrain::from_blocked(size, [Position::new(3, 0)]);
        let mut food = FoodGrid::barren(&terrain, 1);
        food.plant(Position::new(0, 0));

        // x=1 touches food and regrows; x=2 only touches x=1, which was bare at scan time
        assert_eq!(food.update(), 1);
        assert!(food.has(Position::new(1, 0)));
        assert!(!food.has(Position::new(2, 0)));

        assert_eq!(food.update(), 1);
        assert!(food.has(Position::new(2, 0)));
    }

    #[test]
    fn test_timer_only_counts_with_food_neighbour() {
        let size = GridSize::new(5, 1);
        let terrain = Terrain::open(size);
        let mut food = FoodGrid::barren(&terrain, 3);

        food.update();
        assert_eq!(food.regrow_timer(Position::new(2, 0)), Some(3));

        food.plant(Position::new(1, 0));
        food.update();
        assert_eq!(food.regrow_timer(Position::new(2, 0)), Some(2));
        assert_eq!(food.regrow_timer(Position::new(4, 0)), Some(3));
    }

    #[test]
    fn test_coverage_fraction() {
        let terrain = Terrain::open(GridSize::new(50, 50));
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let food = FoodGrid::with_coverage(&terrain, REGROW, 0.3, &mut rng);
        let fraction = food.count() as f64 / 2500.0;
        assert!((0.2..0.4).contains(&fraction), "fraction {}", fraction);
        assert_eq!(food.flags().iter().filter(|f| **f).count(), food.count());
    }
}

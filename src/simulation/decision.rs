//! Decision policies - where each agent wants to go this tick
//!
//! Policies only write `intended` (and a herbivore's heading). They never
//! touch energy and never move anyone; the orchestrator commits moves after
//! arbitration.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{Direction, GridSize, Position, Species};
use crate::entity::Agent;
use crate::spatial::occupancy::Occupancy;
use crate::world::{FoodGrid, Terrain};

/// Read-only environment for one species phase.
///
/// `occupied` holds this species' positions from before anyone moved.
pub struct PhaseView<'a> {
    pub size: GridSize,
    pub terrain: &'a Terrain,
    pub food: &'a FoodGrid,
    pub occupied: &'a Occupancy,
}

impl PhaseView<'_> {
    /// Walkable and not held by a same-species agent at phase start
    #[inline]
    pub fn is_open(&self, pos: Position) -> bool {
        !self.terrain.is_blocked(pos) && !self.occupied.is_occupied(pos)
    }

    fn open_neighbors(&self, pos: Position) -> Vec<(Direction, Position)> {
        self.size
            .neighbors(pos)
            .into_iter()
            .filter(|(_, n)| self.is_open(*n))
            .collect()
    }
}

/// Dispatch on species. `prey` is only read by predators.
pub fn decide<R: Rng + ?Sized>(
    agent: &mut Agent,
    prey: &[Position],
    view: &PhaseView<'_>,
    rng: &mut R,
) {
    match agent.species {
        Species::Herbivore => decide_herbivore(agent, view, rng),
        Species::Predator => decide_predator(agent, prey, view, rng),
    }
}

/// Keep grazing straight ahead while there is food there; otherwise turn to a
/// random open neighbour, or stay if boxed in.
pub fn decide_herbivore<R: Rng + ?Sized>(agent: &mut Agent, view: &PhaseView<'_>, rng: &mut R) {
    let facing = agent.facing.unwrap_or(Direction::North);
    let ahead = view.size.step(agent.position, facing);
    if view.food.has(ahead) {
        agent.intended = ahead;
        agent.facing = Some(facing);
        return;
    }

    match view.open_neighbors(agent.position).choose(rng) {
        Some(&(dir, pos)) => {
            agent.intended = pos;
            agent.facing = Some(dir);
        }
        None => agent.intended = agent.position,
    }
}

/// Chase the nearest prey one axis step at a time; wander when there is none.
pub fn decide_predator<R: Rng + ?Sized>(
    agent: &mut Agent,
    prey: &[Position],
    view: &PhaseView<'_>,
    rng: &mut R,
) {
    let Some(target) = nearest(agent.position, prey, view.size) else {
        wander(agent, view, rng);
        return;
    };

    let pos = agent.position;
    let size = view.size;
    let mut steps = Vec::with_capacity(2);
    if pos.x != target.x {
        steps.push(size.offset(pos, toward(pos.x, target.x, size.width), 0));
    }
    if pos.y != target.y {
        steps.push(size.offset(pos, 0, toward(pos.y, target.y, size.height)));
    }
    steps.shuffle(rng);

    agent.intended = steps
        .into_iter()
        .find(|step| view.is_open(*step))
        .unwrap_or(pos);
}

fn wander<R: Rng + ?Sized>(agent: &mut Agent, view: &PhaseView<'_>, rng: &mut R) {
    agent.intended = view
        .open_neighbors(agent.position)
        .choose(rng)
        .map(|&(_, pos)| pos)
        .unwrap_or(agent.position);
}

/// Closest candidate by toroidal Manhattan distance.
///
/// Equal distances resolve to the earliest candidate in slice order.
pub fn nearest(from: Position, candidates: &[Position], size: GridSize) -> Option<Position> {
    candidates
        .iter()
        .copied()
        .min_by_key(|&c| size.distance(from, c))
}

/// Unit step along one wrapped axis that shortens the gap.
///
/// When both ways round are equally long the step is negative.
pub fn toward(from: u32, to: u32, size: u32) -> i64 {
    let forward = (to + size - from) % size;
    let backward = (from + size - to) % size;
    if forward < backward {
        1
    } else {
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        size: GridSize,
        terrain: Terrain,
        food: FoodGrid,
        occupied: Occupancy,
    }

    impl Fixture {
        fn new(width: u32, height: u32) -> Self {
            let size = GridSize::new(width, height);
            let terrain = Terrain::open(size);
            let food = FoodGrid::barren(&terrain, 5);
            Self {
                size,
                terrain,
                food,
                occupied: Occupancy::new(size),
            }
        }

        fn with_rocks(mut self, rocks: &[Position]) -> Self {
            self.terrain = Terrain::from_blocked(self.size, rocks.iter().copied());
            self.food = FoodGrid::barren(&self.terrain, 5);
            self
        }

        fn view(&self) -> PhaseView<'_> {
            PhaseView {
                size: self.size,
                terrain: &self.terrain,
                food: &self.food,
                occupied: &self.occupied,
            }
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    #[test]
    fn test_herbivore_follows_food_ahead() {
        let mut fx = Fixture::new(5, 5);
        fx.food.plant(Position::new(3, 2));
        let mut h = Agent::herbivore(Position::new(2, 2), Direction::East, 10);

        decide_herbivore(&mut h, &fx.view(), &mut rng());
        assert_eq!(h.intended, Position::new(3, 2));
        assert_eq!(h.facing, Some(Direction::East));
    }

    #[test]
    fn test_herbivore_food_ahead_across_seam() {
        let mut fx = Fixture::new(4, 4);
        fx.food.plant(Position::new(1, 3));
        let mut h = Agent::herbivore(Position::new(1, 0), Direction::North, 10);

        decide_herbivore(&mut h, &fx.view(), &mut rng());
        assert_eq!(h.intended, Position::new(1, 3));
    }

    #[test]
    fn test_herbivore_turns_to_only_open_neighbor() {
        let centre = Position::new(2, 2);
        let mut fx = Fixture::new(5, 5).with_rocks(&[Position::new(2, 1), Position::new(3, 2)]);
        fx.occupied.insert(centre, 0);
        fx.occupied.insert(Position::new(1, 2), 1);
        let mut h = Agent::herbivore(centre, Direction::North, 10);

        decide_herbivore(&mut h, &fx.view(), &mut rng());
        assert_eq!(h.intended, Position::new(2, 3));
        assert_eq!(h.facing, Some(Direction::South));
    }

    #[test]
    fn test_herbivore_boxed_in_stays() {
        let centre = Position::new(1, 1);
        let size = GridSize::new(3, 3);
        let rocks: Vec<Position> = size.neighbors(centre).iter().map(|(_, p)| *p).collect();
        let fx = Fixture::new(3, 3).with_rocks(&rocks);
        let mut h = Agent::herbivore(centre, Direction::West, 10);
        h.intended = Position::new(0, 0);

        decide_herbivore(&mut h, &fx.view(), &mut rng());
        assert_eq!(h.intended, centre);
        assert_eq!(h.facing, Some(Direction::West));
    }

    #[test]
    fn test_predator_steps_toward_prey() {
        let fx = Fixture::new(10, 10);
        let mut p = Agent::predator(Position::new(2, 2), 30);
        let prey = [Position::new(2, 6)];

        decide_predator(&mut p, &prey, &fx.view(), &mut rng());
        assert_eq!(p.intended, Position::new(2, 3));
    }

    #[test]
    fn test_predator_chases_across_seam() {
        let fx = Fixture::new(10, 10);
        let mut p = Agent::predator(Position::new(1, 5), 30);
        let prey = [Position::new(8, 5)];

        decide_predator(&mut p, &prey, &fx.view(), &mut rng());
        assert_eq!(p.intended, Position::new(0, 5));
    }

    #[test]
    fn test_predator_takes_the_other_axis_when_blocked() {
        let fx = Fixture::new(10, 10).with_rocks(&[Position::new(3, 2)]);
        let prey = [Position::new(5, 5)];
        for seed in 0..8 {
            let mut p = Agent::predator(Position::new(2, 2), 30);
            decide_predator(&mut p, &prey, &fx.view(), &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(p.intended, Position::new(2, 3));
        }
    }

    #[test]
    fn test_predator_stays_when_both_steps_refused() {
        let mut fx = Fixture::new(10, 10).with_rocks(&[Position::new(3, 2)]);
        fx.occupied.insert(Position::new(2, 3), 0);
        let mut p = Agent::predator(Position::new(2, 2), 30);

        decide_predator(&mut p, &[Position::new(5, 5)], &fx.view(), &mut rng());
        assert_eq!(p.intended, Position::new(2, 2));
    }

    #[test]
    fn test_predator_wanders_without_prey() {
        let fx = Fixture::new(6, 6);
        let start = Position::new(3, 3);
        let mut p = Agent::predator(start, 30);

        decide_predator(&mut p, &[], &fx.view(), &mut rng());
        assert_eq!(fx.size.distance(start, p.intended), 1);
    }

    #[test]
    fn test_nearest_tie_goes_to_first_candidate() {
        let size = GridSize::new(10, 10);
        let from = Position::new(5, 5);
        let candidates = [Position::new(5, 8), Position::new(2, 5), Position::new(5, 2)];
        assert_eq!(nearest(from, &candidates, size), Some(Position::new(5, 8)));
        assert_eq!(nearest(from, &[], size), None);
    }

    #[test]
    fn test_toward_picks_shorter_way_round() {
        assert_eq!(toward(1, 3, 10), 1);
        assert_eq!(toward(1, 8, 10), -1);
        assert_eq!(toward(8, 1, 10), 1);
        // Exactly half way: negative
        assert_eq!(toward(0, 5, 10), -1);
    }
}

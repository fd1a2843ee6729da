//! Agent record shared by both species
//!
//! Agents carry no identity: a population is an unordered array of these
//! records, re-indexed by position every phase.

use serde::{Deserialize, Serialize};

use crate::core::config::SpeciesTraits;
use crate::core::types::{Direction, Position, Species};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub species: Species,
    pub position: Position,
    /// May dip to zero or below only between metabolism and culling
    pub energy: i32,
    /// Cell this agent wants this tick; defaults to where it stands
    pub intended: Position,
    /// Ticks of digestion left. Digesting agents do not move.
    pub digest_wait: u32,
    /// Foraging heading, herbivores only
    pub facing: Option<Direction>,
}

impl Agent {
    pub fn herbivore(position: Position, facing: Direction, energy: i32) -> Self {
        Self {
            species: Species::Herbivore,
            position,
            energy,
            intended: position,
            digest_wait: 0,
            facing: Some(facing),
        }
    }

    pub fn predator(position: Position, energy: i32) -> Self {
        Self {
            species: Species::Predator,
            position,
            energy,
            intended: position,
            digest_wait: 0,
            facing: None,
        }
    }

    #[inline]
    pub fn is_digesting(&self) -> bool {
        self.digest_wait > 0
    }

    /// Credit a meal and start digesting
    pub fn feed(&mut self, traits: &SpeciesTraits) {
        self.energy += traits.food_gain;
        self.digest_wait = traits.digest_wait;
    }

    /// Pay this tick's upkeep; `digesting` selects the basal rate
    pub fn metabolize(&mut self, traits: &SpeciesTraits, digesting: bool) {
        self.energy -= if digesting {
            traits.basal_cost
        } else {
            traits.move_cost
        };
    }

    #[inline]
    pub fn is_starved(&self) -> bool {
        self.energy <= 0
    }

    pub fn can_reproduce(&self, traits: &SpeciesTraits) -> bool {
        self.energy >= traits.reproduction_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agents_intend_to_stay() {
        let pos = Position::new(3, 4);
        let h = Agent::herbivore(pos, Direction::East, 10);
        let p = Agent::predator(pos, 30);
        assert_eq!(h.intended, pos);
        assert_eq!(p.intended, pos);
        assert_eq!(h.facing, Some(Direction::East));
        assert_eq!(p.facing, None);
        assert!(!h.is_digesting());
    }

    #[test]
    fn test_feed_then_metabolize() {
        let traits = SpeciesTraits::predator();
        let mut p = Agent::predator(Position::new(0, 0), 5);
        p.feed(&traits);
        assert_eq!(p.energy, 15);
        assert_eq!(p.digest_wait, 2);

        p.metabolize(&traits, true);
        assert_eq!(p.energy, 15 - traits.basal_cost);
        p.metabolize(&traits, false);
        assert_eq!(p.energy, 15 - traits.basal_cost - traits.move_cost);
    }

    #[test]
    fn test_starvation_boundary() {
        let traits = SpeciesTraits::herbivore();
        let mut h = Agent::herbivore(Position::new(0, 0), Direction::North, 1);
        assert!(!h.is_starved());
        h.metabolize(&traits, false);
        assert_eq!(h.energy, 0);
        assert!(h.is_starved());
    }
}

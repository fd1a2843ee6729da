//! Ecosystem - world state and the per-tick orchestrator
//!
//! Each `step()` runs, in this order:
//!   predator phase: decide -> resolve moves -> predation -> reproduction -> metabolism -> cull
//!   herbivore phase: decide -> resolve moves -> foraging -> metabolism -> cull, newborns join last
//!   food regrowth
//!
//! Reproduction is decided before metabolism in both phases. Predator
//! newborns join before metabolism and pay upkeep on their birth tick;
//! herbivore newborns join after culling.
//!
//! Predators finish before herbivores decide, so predators always hunt the
//! herbivore positions left over from the previous tick.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::{SimulationConfig, SpeciesTraits};
use crate::core::error::{EcoError, Result};
use crate::core::types::{Direction, GridSize, Position, Species, Tick};
use crate::entity::Agent;
use crate::metrics::PopulationRecord;
use crate::simulation::decision::{decide, PhaseView};
use crate::simulation::movement::{resolve_moves, MoveOutcome};
use crate::simulation::snapshot::{AgentSnapshot, WorldSnapshot};
use crate::spatial::occupancy::Occupancy;
use crate::world::{FoodGrid, Terrain};

/// What happened to one species during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseReport {
    pub moved: usize,
    pub fed: usize,
    pub births: usize,
    pub starved: usize,
}

/// Summary of one `step()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub predators: PhaseReport,
    pub herbivores: PhaseReport,
    /// Herbivores removed by predation
    pub prey_eaten: usize,
    pub food_regrown: usize,
}

/// The simulated world. Owns every population and grid.
pub struct Ecosystem {
    config: SimulationConfig,
    config_issues: Vec<EcoError>,
    size: GridSize,
    terrain: Terrain,
    food: FoodGrid,
    herbivores: Vec<Agent>,
    predators: Vec<Agent>,
    tick: Tick,
    /// Random number generator (deterministic)
    rng: ChaCha8Rng,
}

impl Ecosystem {
    /// Generate terrain and food, then scatter the founding populations.
    ///
    /// Out-of-range parameters are replaced with defaults and kept in
    /// `config_issues()`.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let (config, config_issues) = config.sanitize();
        for issue in &config_issues {
            tracing::warn!("{}", issue);
        }

        let size = config.grid_size();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let terrain = Terrain::generate(size, &config.terrain, &mut rng)?;
        let food = FoodGrid::with_coverage(
            &terrain,
            config.food.regrow_ticks,
            config.food.initial_coverage,
            &mut rng,
        );

        let open = terrain.open_cells();
        let herbivores: Vec<Agent> =
            scatter(&open, config.population.herbivores, Species::Herbivore, &mut rng)
                .into_iter()
                .map(|pos| {
                    let facing = Direction::ALL[rng.gen_range(0..4)];
                    Agent::herbivore(pos, facing, config.herbivore.initial_energy)
                })
                .collect();
        let predators: Vec<Agent> =
            scatter(&open, config.population.predators, Species::Predator, &mut rng)
                .into_iter()
                .map(|pos| Agent::predator(pos, config.predator.initial_energy))
                .collect();

        tracing::info!(
            "Created {}x{} world (seed {}): {} rock cells, {} food cells, \
             {} herbivores, {} predators",
            size.width,
            size.height,
            config.seed,
            terrain.blocked_count(),
            food.count(),
            herbivores.len(),
            predators.len()
        );

        Ok(Self {
            config,
            config_issues,
            size,
            terrain,
            food,
            herbivores,
            predators,
            tick: 0,
            rng,
        })
    }

    /// Assemble a world from explicit parts.
    ///
    /// The grid size comes from `terrain`; `config.grid` is overwritten to match.
    /// Other out-of-range parameters are replaced with defaults as in `new`.
    /// Agents must be on open cells, one per cell per species, and of the
    /// species their array stands for.
    pub fn from_parts(
        config: SimulationConfig,
        terrain: Terrain,
        food: FoodGrid,
        herbivores: Vec<Agent>,
        predators: Vec<Agent>,
    ) -> Result<Self> {
        let size = terrain.size();
        if size.width == 0 || size.height == 0 || food.size() != size {
            return Err(EcoError::InvalidDimensions {
                width: food.size().width,
                height: food.size().height,
            });
        }

        let (mut config, config_issues) = config.sanitize();
        for issue in &config_issues {
            tracing::warn!("{}", issue);
        }
        config.grid.width = size.width;
        config.grid.height = size.height;

        check_population(&herbivores, Species::Herbivore, &terrain)?;
        check_population(&predators, Species::Predator, &terrain)?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            config_issues,
            size,
            terrain,
            food,
            herbivores,
            predators,
            tick: 0,
            rng,
        })
    }

    /// Advance exactly one tick
    pub fn step(&mut self) -> TickReport {
        self.tick += 1;

        let (predators, prey_eaten) = self.predator_phase();
        let herbivores = self.herbivore_phase();
        let food_regrown = self.food.update();

        let report = TickReport {
            tick: self.tick,
            predators,
            herbivores,
            prey_eaten,
            food_regrown,
        };

        tracing::debug!(
            tick = self.tick,
            herbivores = self.herbivores.len(),
            predators = self.predators.len(),
            food = self.food.count(),
            herbivore_births = herbivores.births,
            predator_births = predators.births,
            starved = herbivores.starved + predators.starved,
            prey_eaten,
            "tick complete"
        );

        report
    }

    fn predator_phase(&mut self) -> (PhaseReport, usize) {
        let traits = self.config.predator;
        let prey: Vec<Position> = self.herbivores.iter().map(|h| h.position).collect();
        let outcome = self.move_phase(Species::Predator, &prey);

        // Prey positions are still the ones from before the herbivore phase
        let prey_index = Occupancy::from_agents(self.size, &self.herbivores);
        let mut eaten = vec![false; self.herbivores.len()];
        let mut fed = 0;
        for predator in self.predators.iter_mut() {
            if let Some(slot) = prey_index.get(predator.position) {
                eaten[slot] = true;
                predator.feed(&traits);
                fed += 1;
            }
        }
        let mut slot = 0;
        self.herbivores.retain(|_| {
            let keep = !eaten[slot];
            slot += 1;
            keep
        });
        if fed > 0 {
            tracing::trace!("Predators ate {} herbivores", fed);
        }

        let report = self.finish_phase(Species::Predator, &traits, &outcome, fed);
        (report, fed)
    }

    fn herbivore_phase(&mut self) -> PhaseReport {
        let traits = self.config.herbivore;
        let outcome = self.move_phase(Species::Herbivore, &[]);

        let mut fed = 0;
        for herbivore in self.herbivores.iter_mut() {
            if self.food.has(herbivore.position) {
                self.food.eat(herbivore.position);
                herbivore.feed(&traits);
                fed += 1;
            }
        }

        self.finish_phase(Species::Herbivore, &traits, &outcome, fed)
    }

    /// Decide and resolve moves for one species
    fn move_phase(&mut self, species: Species, prey: &[Position]) -> MoveOutcome {
        let agents = match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Predator => &mut self.predators,
        };

        let occupied = Occupancy::from_agents(self.size, agents);
        let view = PhaseView {
            size: self.size,
            terrain: &self.terrain,
            food: &self.food,
            occupied: &occupied,
        };
        for agent in agents.iter_mut() {
            decide(agent, prey, &view, &mut self.rng);
        }

        resolve_moves(agents, self.size, &mut self.rng)
    }

    /// Reproduction, metabolism and culling for one species
    fn finish_phase(
        &mut self,
        species: Species,
        traits: &SpeciesTraits,
        outcome: &MoveOutcome,
        fed: usize,
    ) -> PhaseReport {
        let agents = match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Predator => &mut self.predators,
        };

        let mut newborns = reproduce(agents, outcome, traits, self.size, &mut self.rng);
        let births = newborns.len();

        // Predator young pay upkeep on their birth tick; herbivore young do not
        if species == Species::Predator {
            agents.append(&mut newborns);
        }

        for (i, agent) in agents.iter_mut().enumerate() {
            let digesting = outcome.digesting.get(i).copied().unwrap_or(false);
            agent.metabolize(traits, digesting);
        }
        let before = agents.len();
        agents.retain(|a| !a.is_starved());
        let starved = before - agents.len();

        agents.append(&mut newborns);

        #[cfg(debug_assertions)]
        {
            let check = Occupancy::from_agents(self.size, agents);
            debug_assert_eq!(check.len(), agents.len());
            debug_assert!(agents.iter().all(|a| !self.terrain.is_blocked(a.position)));
        }

        PhaseReport {
            moved: outcome.moved_count(),
            fed,
            births,
            starved,
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Parameters that were replaced by defaults at creation
    pub fn config_issues(&self) -> &[EcoError] {
        &self.config_issues
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn food(&self) -> &FoodGrid {
        &self.food
    }

    pub fn herbivores(&self) -> &[Agent] {
        &self.herbivores
    }

    pub fn predators(&self) -> &[Agent] {
        &self.predators
    }

    pub fn population_of(&self, species: Species) -> &[Agent] {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Predator => &self.predators,
        }
    }

    /// Extinction is a terminal state, not an error
    pub fn is_extinct(&self, species: Species) -> bool {
        self.population_of(species).is_empty()
    }

    /// Counts for metrics consumers
    pub fn population(&self) -> PopulationRecord {
        PopulationRecord {
            tick: self.tick,
            herbivores: self.herbivores.len(),
            predators: self.predators.len(),
            food_cells: self.food.count(),
        }
    }

    /// Copy of everything a renderer needs
    pub fn snapshot(&self) -> WorldSnapshot {
        let agents = |list: &[Agent]| -> Vec<AgentSnapshot> {
            list.iter()
                .map(|a| AgentSnapshot {
                    position: a.position,
                    energy: a.energy,
                })
                .collect()
        };

        WorldSnapshot {
            tick: self.tick,
            width: self.size.width,
            height: self.size.height,
            herbivores: agents(&self.herbivores),
            predators: agents(&self.predators),
            food: self.food.flags(),
            blocked: self.terrain.blocked_flags(),
        }
    }
}

/// Distinct random open cells, at most `count`
fn scatter<R: Rng + ?Sized>(
    open: &[Position],
    count: u32,
    species: Species,
    rng: &mut R,
) -> Vec<Position> {
    let wanted = count as usize;
    if wanted > open.len() {
        tracing::warn!(
            "Only {} open cells for {} {}s; placing {}",
            open.len(),
            wanted,
            species.name(),
            open.len()
        );
    }
    open.choose_multiple(rng, wanted).copied().collect()
}

/// Newborns for every mover that can afford one and left a cell nobody took
fn reproduce<R: Rng + ?Sized>(
    agents: &mut [Agent],
    outcome: &MoveOutcome,
    traits: &SpeciesTraits,
    size: GridSize,
    rng: &mut R,
) -> Vec<Agent> {
    let occupied = Occupancy::from_agents(size, agents);
    let mut newborns = Vec::new();

    for (agent, vacated) in agents.iter_mut().zip(&outcome.vacated) {
        let Some(cell) = *vacated else {
            continue;
        };
        if !agent.can_reproduce(traits) || occupied.is_occupied(cell) {
            continue;
        }

        agent.energy -= traits.birth_debit();
        newborns.push(match agent.species {
            Species::Herbivore => {
                let facing = Direction::ALL[rng.gen_range(0..4)];
                Agent::herbivore(cell, facing, traits.initial_energy)
            }
            Species::Predator => Agent::predator(cell, traits.initial_energy),
        });
    }

    newborns
}

fn check_population(agents: &[Agent], species: Species, terrain: &Terrain) -> Result<()> {
    let size = terrain.size();
    let mut seen = Occupancy::new(size);
    for agent in agents {
        let pos = agent.position;
        if agent.species != species {
            return Err(EcoError::invalid(
                species.name(),
                format!("{} at {:?} in the {} list", agent.species.name(), pos, species.name()),
            ));
        }
        if pos.x >= size.width || pos.y >= size.height {
            return Err(EcoError::invalid(species.name(), format!("{:?} is off the grid", pos)));
        }
        if terrain.is_blocked(pos) {
            return Err(EcoError::invalid(species.name(), format!("{:?} is rock", pos)));
        }
        if seen.is_occupied(pos) {
            return Err(EcoError::invalid(species.name(), format!("two agents on {:?}", pos)));
        }
        seen.insert(pos, 0);
    }
    Ok(())
}

//! Move resolution - turning many intents into one consistent set of moves
//!
//! 1. Agents are grouped by intended cell, in order of first appearance.
//! 2. One claimant per cell wins, uniformly at random.
//! 3. Digesting winners stay put and count their wait down; digesting
//!    losers keep theirs.
//! 4. A winner heading into a cell that someone is still standing on stays put
//!    too, repeated until nothing changes.
//!
//! After this, no two agents of the array share a cell.

use ahash::AHashMap;
use rand::Rng;

use crate::core::types::{GridSize, Position};
use crate::entity::Agent;
use crate::spatial::occupancy::Occupancy;

/// Per-agent results of one resolution, indexed like the agent array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Cell the agent left, if it moved
    pub vacated: Vec<Option<Position>>,
    /// Whether the agent was digesting when the phase began
    pub digesting: Vec<bool>,
    /// Whether the agent won the draw for its intended cell
    pub won: Vec<bool>,
}

impl MoveOutcome {
    pub fn moved_count(&self) -> usize {
        self.vacated.iter().filter(|v| v.is_some()).count()
    }
}

/// Slot indices grouped by intended cell, groups in first-appearance order
pub fn group_by_intent(agents: &[Agent]) -> Vec<Vec<usize>> {
    let mut index: AHashMap<Position, usize> = AHashMap::with_capacity(agents.len());
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (slot, agent) in agents.iter().enumerate() {
        let group = *index.entry(agent.intended).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(slot);
    }

    groups
}

/// Pick one winner per group, uniformly
pub fn arbitrate<R: Rng + ?Sized>(
    groups: &[Vec<usize>],
    agent_count: usize,
    rng: &mut R,
) -> Vec<bool> {
    let mut won = vec![false; agent_count];
    for group in groups.iter().filter(|g| !g.is_empty()) {
        won[group[rng.gen_range(0..group.len())]] = true;
    }
    won
}

/// Arbitrate and commit this phase's moves
pub fn resolve_moves<R: Rng + ?Sized>(
    agents: &mut [Agent],
    size: GridSize,
    rng: &mut R,
) -> MoveOutcome {
    let n = agents.len();
    let digesting: Vec<bool> = agents.iter().map(Agent::is_digesting).collect();
    let groups = group_by_intent(agents);
    let won = arbitrate(&groups, n, rng);

    let mut moving: Vec<bool> = agents
        .iter()
        .enumerate()
        .map(|(i, a)| won[i] && !digesting[i] && a.intended != a.position)
        .collect();

    // Cells of agents that will not leave this tick
    let mut held = Occupancy::new(size);
    for (i, agent) in agents.iter().enumerate() {
        if !moving[i] {
            held.insert(agent.position, i);
        }
    }

    loop {
        let mut changed = false;
        for (i, agent) in agents.iter().enumerate() {
            if moving[i] && held.is_occupied(agent.intended) {
                moving[i] = false;
                held.insert(agent.position, i);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut vacated = vec![None; n];
    for (i, agent) in agents.iter_mut().enumerate() {
        // Only a digester that won its draw counts down
        if won[i] && digesting[i] {
            agent.digest_wait -= 1;
        }
        if moving[i] {
            vacated[i] = Some(agent.position);
            agent.position = agent.intended;
        }
        agent.intended = agent.position;
    }

    MoveOutcome {
        vacated,
        digesting,
        won,
    }
}

//! Simulation engine - decisions, move resolution and the tick orchestrator

pub mod decision;
pub mod ecosystem;
pub mod movement;
pub mod snapshot;

pub use decision::{decide, decide_herbivore, decide_predator, PhaseView};
pub use ecosystem::{Ecosystem, PhaseReport, TickReport};
pub use movement::{resolve_moves, MoveOutcome};
pub use snapshot::{AgentSnapshot, WorldSnapshot};

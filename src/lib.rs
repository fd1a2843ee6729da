//! Ecosim - deterministic predator-prey ecosystem on a toroidal grid
//!
//! Herbivores graze regrowing food, predators hunt herbivores, and rock
//! generated from periodic noise blocks both. Everything random flows from
//! one seeded generator, so a seed and a config fully determine a run.

pub mod core;
pub mod entity;
pub mod metrics;
pub mod simulation;
pub mod spatial;
pub mod world;

pub use crate::core::{EcoError, Result, SimulationConfig};
pub use crate::metrics::PopulationRecord;
pub use crate::simulation::{Ecosystem, TickReport, WorldSnapshot};

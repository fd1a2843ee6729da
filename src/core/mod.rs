pub mod config;
pub mod error;
pub mod types;

pub use config::{SimulationConfig, SpeciesTraits};
pub use error::{EcoError, Result};
pub use types::{Direction, GridSize, Position, Species, Tick};

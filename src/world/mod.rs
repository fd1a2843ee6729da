//! Static terrain and the food automaton that lives on it

pub mod food;
pub mod noise;
pub mod terrain;

pub use food::FoodGrid;
pub use terrain::Terrain;

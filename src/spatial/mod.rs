pub mod grid;
pub mod occupancy;

pub use grid::Grid;
pub use occupancy::Occupancy;

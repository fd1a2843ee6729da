//! Rock terrain: cells that block movement and never carry food
//!
//! Computed once per world from the periodic noise field and immutable
//! afterwards.

use rand::Rng;

use crate::core::config::TerrainConfig;
use crate::core::error::{EcoError, Result};
use crate::core::types::{GridSize, Position};
use crate::spatial::grid::Grid;
use crate::world::noise::PeriodicNoise;

/// Set of blocked cells for the lifetime of a world
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    blocked: Grid<bool>,
    blocked_count: usize,
}

impl Terrain {
    /// Terrain with no rock at all
    pub fn open(size: GridSize) -> Self {
        Self {
            blocked: Grid::filled(size, false),
            blocked_count: 0,
        }
    }

    /// Terrain with exactly the given cells blocked
    pub fn from_blocked(size: GridSize, cells: impl IntoIterator<Item = Position>) -> Self {
        let mut terrain = Self::open(size);
        for pos in cells {
            let cell = terrain.blocked.get_mut(pos);
            if !*cell {
                *cell = true;
                terrain.blocked_count += 1;
            }
        }
        terrain
    }

    /// Mark every cell whose noise value exceeds the threshold
    pub fn generate<R: Rng + ?Sized>(
        size: GridSize,
        config: &TerrainConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(EcoError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }

        let noise = PeriodicNoise::new(rng);
        let rocks = size
            .positions()
            .filter(|pos| noise.fbm(pos.x, pos.y, size, config) > config.rock_threshold);
        let terrain = Self::from_blocked(size, rocks);

        tracing::debug!(
            "Generated terrain {}x{}: {} rock cells ({:.1}%)",
            size.width,
            size.height,
            terrain.blocked_count,
            100.0 * terrain.blocked_count as f64 / size.cell_count() as f64
        );

        Ok(terrain)
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.blocked.size()
    }

    #[inline]
    pub fn is_blocked(&self, pos: Position) -> bool {
        *self.blocked.get(pos)
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked_count
    }

    /// Every walkable cell, row-major
    pub fn open_cells(&self) -> Vec<Position> {
        self.blocked
            .iter()
            .filter(|(_, blocked)| !**blocked)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Per-cell flags, row-major
    pub fn blocked_flags(&self) -> Vec<bool> {
        self.blocked.values().copied().collect()
    }
}

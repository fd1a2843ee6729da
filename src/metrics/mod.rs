//! Population metrics - per-tick counts, an append-only CSV log and a
//! bounded window for live charts
//!
//! Everything here only reads engine output.

pub mod log;
pub mod window;

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;

pub use log::PopulationLog;
pub use window::RollingWindow;

/// Counts after one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub tick: Tick,
    pub herbivores: usize,
    pub predators: usize,
    pub food_cells: usize,
}

impl PopulationRecord {
    pub fn csv_header() -> &'static str {
        "time,herb,pred,grass"
    }

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.tick, self.herbivores, self.predators, self.food_cells
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_row_matches_header_columns() {
        let record = PopulationRecord {
            tick: 12,
            herbivores: 40,
            predators: 6,
            food_cells: 3100,
        };
        assert_eq!(record.to_csv_row(), "12,40,6,3100");
        assert_eq!(
            PopulationRecord::csv_header().split(',').count(),
            record.to_csv_row().split(',').count()
        );
    }
}

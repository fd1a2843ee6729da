//! Read-only copies of world state for renderers, loggers and tests

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Position, Tick};
use crate::metrics::PopulationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub position: Position,
    pub energy: i32,
}

/// Serializable copy of the world between ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub width: u32,
    pub height: u32,
    pub herbivores: Vec<AgentSnapshot>,
    pub predators: Vec<AgentSnapshot>,
    /// Row-major food flags
    pub food: Vec<bool>,
    /// Row-major rock flags; identical for every snapshot of one world
    pub blocked: Vec<bool>,
}

impl WorldSnapshot {
    pub fn record(&self) -> PopulationRecord {
        PopulationRecord {
            tick: self.tick,
            herbivores: self.herbivores.len(),
            predators: self.predators.len(),
            food_cells: self.food.iter().filter(|f| **f).count(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text frame: '#' rock, 'P' predator, 'H' herbivore, '.' food, ' ' bare.
    ///
    /// Predators are drawn over herbivores sharing their cell.
    pub fn render_ascii(&self) -> String {
        let width = self.width as usize;
        let mut cells: Vec<char> = self
            .blocked
            .iter()
            .zip(&self.food)
            .map(|(&rock, &food)| match (rock, food) {
                (true, _) => '#',
                (false, true) => '.',
                (false, false) => ' ',
            })
            .collect();

        for h in &self.herbivores {
            cells[h.position.y as usize * width + h.position.x as usize] = 'H';
        }
        for p in &self.predators {
            cells[p.position.y as usize * width + p.position.x as usize] = 'P';
        }

        let mut out = String::with_capacity(cells.len() + self.height as usize);
        for row in cells.chunks(width.max(1)) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot {
            tick: 3,
            width: 3,
            height: 2,
            herbivores: vec![AgentSnapshot {
                position: Position::new(1, 0),
                energy: 7,
            }],
            predators: vec![AgentSnapshot {
                position: Position::new(2, 1),
                energy: 20,
            }],
            food: vec![true, true, false, false, true, false],
            blocked: vec![false, false, true, false, false, false],
        }
    }

    #[test]
    fn test_render_ascii() {
        assert_eq!(snapshot().render_ascii(), ".H#\n .P\n");
    }

    #[test]
    fn test_record_counts() {
        let record = snapshot().record();
        assert_eq!(record.tick, 3);
        assert_eq!(record.herbivores, 1);
        assert_eq!(record.predators, 1);
        assert_eq!(record.food_cells, 3);
    }

    #[test]
    fn test_json_contains_fields() {
        let json = snapshot().to_json().unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot());
    }
}

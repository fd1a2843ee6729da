//! Bounded history of recent records for live charts

use std::collections::VecDeque;

use crate::metrics::PopulationRecord;

/// Keeps the newest `capacity` records; older ones fall off the front.
pub struct RollingWindow {
    records: VecDeque<PopulationRecord>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: PopulationRecord) {
        self.records.push_back(record);
        if self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tick range covered, oldest to newest
    pub fn span(&self) -> Option<(u64, u64)> {
        Some((self.records.front()?.tick, self.records.back()?.tick))
    }

    /// Highest herbivore and predator counts in the window, for axis scaling
    pub fn peaks(&self) -> (usize, usize) {
        self.records.iter().fold((0, 0), |(h, p), r| {
            (h.max(r.herbivores), p.max(r.predators))
        })
    }
}

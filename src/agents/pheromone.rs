//! Pheromone marker: the ants' ephemeral trail signal.

use serde::{Deserialize, Serialize};

/// A trail marker left by a recruiting ant. Counts down every tick and
/// evaporates at zero unless an ant re-marks the cell first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pheromone {
    pub lifespan: u32,
    initial_lifespan: u32,
}

impl Pheromone {
    pub fn new(initial_lifespan: u32) -> Self {
        Self {
            lifespan: initial_lifespan,
            initial_lifespan,
        }
    }

    /// Advance one tick. Returns true when the marker has evaporated and
    /// must be removed from the grid and schedule.
    pub fn tick(&mut self) -> bool {
        self.lifespan = self.lifespan.saturating_sub(1);
        self.lifespan == 0
    }

    /// Reset the countdown, as when an ant revisits the marked cell
    pub fn remark(&mut self) {
        self.lifespan = self.initial_lifespan;
    }
}

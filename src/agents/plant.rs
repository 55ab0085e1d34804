//! Plant agent: the leaf resource ants harvest.

use serde::{Deserialize, Serialize};

/// Stationary leaf source. Leaves exhaust under harvesting and regrow at a
/// fixed rate; the plant itself is never removed from the grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plant {
    /// Remaining leaves; regrowth accumulates fractionally
    pub num_leaves: f32,
    /// Regrowth cap, fixed at creation
    pub initial_num_leaves: f32,
    regrowth_rate: f32,
}

impl Plant {
    pub fn new(num_leaves: f32, regrowth_rate: f32) -> Self {
        Self {
            num_leaves,
            initial_num_leaves: num_leaves,
            regrowth_rate,
        }
    }

    /// Harvest one leaf. Returns false when the plant is exhausted; a whole
    /// leaf must be available, partial regrowth cannot be taken.
    pub fn take_leaf(&mut self) -> bool {
        if self.num_leaves >= 1.0 {
            self.num_leaves -= 1.0;
            true
        } else {
            false
        }
    }

    /// Regrow leaves up to the initial cap
    pub fn regrow(&mut self) {
        if self.num_leaves < self.initial_num_leaves {
            self.num_leaves = (self.num_leaves + self.regrowth_rate).min(self.initial_num_leaves);
        }
    }
}

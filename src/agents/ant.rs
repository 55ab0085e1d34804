//! Worker ant state.
//!
//! The behavioral protocol (movement, harvesting, recruitment, caretaking)
//! runs in the model, which owns the shared grid and resources; this module
//! holds the per-ant record and its local bookkeeping.

use crate::grid::Pos;
use serde::{Deserialize, Serialize};

/// Behavioral state of a worker ant.
///
/// Explore, Recruit and Harvest form the foraging cycle; Caretaking is a
/// persistent role entered and left only through the fitness-weighted
/// drafting logic at the nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntState {
    Explore,
    Recruit,
    Harvest,
    Caretaking,
}

/// A single worker ant
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ant {
    pub state: AntState,
    pub has_leaf: bool,
    /// Cell occupied before the last move, biases the random walk
    pub prev_pos: Option<Pos>,
    /// Sum of per-tick crowding samples over the current trip
    pub crowding_sum: f32,
    /// Ticks spent on the current trip
    pub trip_ticks: u32,
    /// Caretaking only: ticks until the next larvae-feeding roundtrip
    pub roundtrip_countdown: u32,
    /// Caretaking only: drawing roundtrips from the dormant distribution
    pub dormant: bool,
    /// Caretaking only: fungus biomass when the current roundtrip began
    pub biomass_baseline: f32,
}

impl Ant {
    pub fn new(state: AntState) -> Self {
        Self {
            state,
            has_leaf: false,
            prev_pos: None,
            crowding_sum: 0.0,
            trip_ticks: 0,
            roundtrip_countdown: 0,
            dormant: false,
            biomass_baseline: 0.0,
        }
    }

    /// Whether the ant is in the foraging cycle rather than Caretaking
    #[inline]
    pub fn is_forager(&self) -> bool {
        self.state != AntState::Caretaking
    }

    /// Record one tick of trip bookkeeping: the local crowding sample and
    /// the elapsed duration.
    pub fn record_crowding(&mut self, sample: f32) {
        self.crowding_sum += sample;
        self.trip_ticks += 1;
    }

    /// Average local crowding experienced on this trip, clamped to a
    /// probability.
    pub fn interaction_intensity(&self) -> f32 {
        if self.trip_ticks == 0 {
            return 0.0;
        }
        (self.crowding_sum / self.trip_ticks as f32).min(1.0)
    }

    /// Clear the trip accumulators after returning to the nest
    pub fn reset_trip(&mut self) {
        self.crowding_sum = 0.0;
        self.trip_ticks = 0;
    }

    /// Begin a caretaking roundtrip with a freshly drawn countdown and the
    /// current fungus biomass as baseline.
    pub fn start_roundtrip(&mut self, countdown: u32, biomass_baseline: f32) {
        self.roundtrip_countdown = countdown.max(1);
        self.biomass_baseline = biomass_baseline;
    }
}

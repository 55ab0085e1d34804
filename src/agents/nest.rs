//! Nest agent: reproduction hub and home of the fitness bookkeeping.

use crate::agents::Fungus;
use crate::config::{FungusConfig, NestConfig};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded FIFO of recent per-trip fitness scores in `[0, 1]`. Pushing onto
/// a full queue evicts the oldest entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FitnessQueue {
    scores: VecDeque<f32>,
    capacity: usize,
}

impl FitnessQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, score: f32) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Mean of the retained scores, or None when empty
    pub fn mean(&self) -> Option<f32> {
        if self.scores.is_empty() {
            None
        } else {
            Some(self.scores.iter().sum::<f32>() / self.scores.len() as f32)
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// The stationary nest. Accumulates larvae nutrition delivered by caretakers
/// and converts it into new ants one reproduction unit at a time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Nest {
    /// Larvae nutrition pending conversion into offspring
    pub energy_buffer: f32,
    /// Recent forager trip fitness, weights newborn role assignment
    pub forager_fitness: FitnessQueue,
    /// Recent caretaker roundtrip fitness (garden growth over the trip)
    pub caretaker_fitness: FitnessQueue,
    carrying_amount: f32,
    larvae_cvn: f32,
    energy_per_offspring: f32,
    /// Minimum fungus biomass for caretaker harvesting: the death threshold
    /// plus a two-offspring margin, so a harvest cannot starve a fungus that
    /// was healthy when the caretaker checked it.
    harvest_floor: f32,
}

impl Nest {
    pub fn new(nest: &NestConfig, fungus: &FungusConfig) -> Self {
        Self {
            energy_buffer: 0.0,
            forager_fitness: FitnessQueue::new(nest.max_fitness_queue_size),
            caretaker_fitness: FitnessQueue::new(nest.max_fitness_queue_size),
            carrying_amount: nest.caretaker_carrying_amount,
            larvae_cvn: nest.fungus_larvae_cvn,
            energy_per_offspring: nest.energy_per_offspring,
            harvest_floor: fungus.biomass_death_threshold + 2.0 * nest.energy_per_offspring,
        }
    }

    /// Caretaker roundtrip delivery: move a fixed amount of fungus biomass
    /// into the larvae nutrition buffer. Returns false when the fungus is
    /// dead or too depleted to harvest. The fungus death latch is
    /// re-evaluated immediately after the debit.
    pub fn feed_larvae(&mut self, fungus: &mut Fungus) -> bool {
        if fungus.dead || fungus.biomass <= self.harvest_floor {
            return false;
        }
        fungus.biomass -= self.carrying_amount;
        fungus.check_death();
        self.energy_buffer += self.carrying_amount * self.larvae_cvn;
        true
    }

    /// Average recent forager fitness; 0.5 when no trips are recorded yet,
    /// the neutral prior of an even role split.
    pub fn average_forager_fitness(&self) -> f32 {
        self.forager_fitness.mean().unwrap_or(0.5)
    }

    /// Consume whole reproduction units from the buffer, returning how many
    /// offspring they pay for. The remainder is always strictly below the
    /// per-offspring cost.
    pub fn take_offspring(&mut self) -> usize {
        let count = (self.energy_buffer / self.energy_per_offspring).floor() as usize;
        self.energy_buffer -= count as f32 * self.energy_per_offspring;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_nest() -> Nest {
        Nest::new(&NestConfig::default(), &FungusConfig::default())
    }

    #[test]
    fn test_fitness_queue_evicts_oldest() {
        let mut queue = FitnessQueue::new(3);
        queue.push(0.0);
        queue.push(0.0);
        queue.push(0.0);
        queue.push(1.0);
        assert_eq!(queue.len(), 3);
        // oldest zero evicted: mean reflects the newest three entries
        assert!((queue.mean().unwrap() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_fitness_prior_when_empty() {
        let nest = test_nest();
        assert_eq!(nest.average_forager_fitness(), 0.5);
    }

    #[test]
    fn test_take_offspring_remainder_invariant() {
        let mut nest = test_nest();
        nest.energy_buffer = 3.7;
        assert_eq!(nest.take_offspring(), 3);
        assert!(nest.energy_buffer < 1.0);
        assert!((nest.energy_buffer - 0.7).abs() < 1e-5);

        assert_eq!(nest.take_offspring(), 0);
    }

    #[test]
    fn test_feed_larvae_transfers() {
        let mut nest = test_nest();
        let mut fungus = Fungus::new(&FungusConfig::default());
        let biomass = fungus.biomass;

        assert!(nest.feed_larvae(&mut fungus));
        assert_eq!(fungus.biomass, biomass - 1.0);
        assert!((nest.energy_buffer - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_feed_larvae_respects_floor() {
        let mut nest = test_nest();
        let mut fungus = Fungus::new(&FungusConfig::default());
        // at the floor (5.0 threshold + 2.0 margin): no harvest
        fungus.biomass = 7.0;
        assert!(!nest.feed_larvae(&mut fungus));
        assert_eq!(nest.energy_buffer, 0.0);

        fungus.biomass = 7.1;
        assert!(nest.feed_larvae(&mut fungus));
    }

    #[test]
    fn test_feed_larvae_dead_fungus() {
        let mut nest = test_nest();
        let mut fungus = Fungus::new(&FungusConfig::default());
        fungus.biomass = 1.0;
        fungus.check_death();
        assert!(!nest.feed_larvae(&mut fungus));
    }
}

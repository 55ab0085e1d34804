//! Fungus garden: the colony's shared biomass and energy pool.

use crate::config::FungusConfig;
use serde::{Deserialize, Serialize};

/// The single fungus colony. Ants deliver leaves as `energy`, which converts
/// to `biomass` once per tick; biomass decays every tick and caretakers debit
/// it directly. Death is a one-way latch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fungus {
    pub biomass: f32,
    /// Leaf energy delivered since the last conversion
    pub energy: f32,
    pub dead: bool,
    decay_rate: f32,
    energy_biomass_cvn: f32,
    death_threshold: f32,
}

impl Fungus {
    pub fn new(config: &FungusConfig) -> Self {
        Self {
            biomass: config.initial_energy * config.energy_biomass_cvn,
            energy: 0.0,
            dead: false,
            decay_rate: config.decay_rate,
            energy_biomass_cvn: config.energy_biomass_cvn,
            death_threshold: config.biomass_death_threshold,
        }
    }

    /// Deliver one leaf worth of energy. No-op once the fungus is dead.
    pub fn feed(&mut self) {
        if !self.dead {
            self.energy += 1.0;
        }
    }

    /// Latch death when biomass is at or below the threshold. Callers that
    /// debit biomass outside `step` must invoke this immediately, since
    /// caretakers consult `dead` before acting.
    pub fn check_death(&mut self) {
        if self.biomass <= self.death_threshold {
            self.dead = true;
        }
    }

    /// One tick: decay, death check, then energy-to-biomass conversion
    pub fn step(&mut self) {
        if self.dead {
            return;
        }
        self.biomass -= self.decay_rate * self.biomass;
        self.check_death();
        if !self.dead && self.energy > 0.0 {
            self.biomass += self.energy_biomass_cvn * self.energy;
            self.energy = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fungus() -> Fungus {
        Fungus::new(&FungusConfig::default())
    }

    #[test]
    fn test_initial_biomass_from_energy() {
        let fungus = test_fungus();
        assert_eq!(fungus.biomass, 100.0);
        assert_eq!(fungus.energy, 0.0);
        assert!(!fungus.dead);
    }

    #[test]
    fn test_decay_without_feeding() {
        let mut fungus = test_fungus();
        let before = fungus.biomass;
        fungus.step();
        assert!(fungus.biomass < before);
    }

    #[test]
    fn test_feed_converts_once_per_step() {
        let mut fungus = test_fungus();
        fungus.feed();
        fungus.feed();
        assert_eq!(fungus.energy, 2.0);

        let before = fungus.biomass;
        fungus.step();
        // decay then conversion of both delivered leaves
        assert!(fungus.biomass > before);
        assert_eq!(fungus.energy, 0.0);
    }

    #[test]
    fn test_death_is_permanent() {
        let mut fungus = test_fungus();
        fungus.biomass = 5.0;
        fungus.check_death();
        assert!(fungus.dead);

        // feeding and stepping after death are no-ops
        fungus.feed();
        assert_eq!(fungus.energy, 0.0);
        let biomass = fungus.biomass;
        for _ in 0..10 {
            fungus.step();
        }
        assert!(fungus.dead);
        assert_eq!(fungus.biomass, biomass);
    }

    #[test]
    fn test_decay_can_kill() {
        let mut fungus = test_fungus();
        fungus.biomass = 5.02;
        fungus.step();
        assert!(fungus.dead);
    }
}

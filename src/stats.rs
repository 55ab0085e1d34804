//! Reporter snapshots and their per-run history.

use crate::model::{DeathReason, Model};
use serde::{Deserialize, Serialize};

/// Reporter values captured at one tick
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Simulation time of the snapshot
    pub time: u64,
    /// Live ant count
    pub ants: usize,
    /// Ants currently carrying a leaf
    pub ants_with_leaves: usize,
    /// Fraction of ants in the foraging cycle
    pub fraction_foragers: f32,
    /// Fraction of ants that are dormant caretakers
    pub fraction_dormant: f32,
    /// Fungus garden biomass
    pub fungus_biomass: f32,
    /// Larvae nutrition pending conversion into offspring
    pub nest_energy_buffer: f32,
    /// Mean recent forager trip fitness
    pub forager_fitness: f32,
    /// Mean recent caretaker roundtrip fitness
    pub caretaker_fitness: f32,
    /// Live pheromone markers
    pub pheromones: usize,
    /// Harvestable leaves across all plants
    pub total_leaves: f32,
    /// Whether the colony was still viable
    pub running: bool,
    /// Terminal collapse cause, if the colony has failed
    pub death_reason: Option<DeathReason>,
}

impl Stats {
    /// Capture all reporters from the current model state
    pub fn capture(model: &Model) -> Self {
        Self {
            time: model.time,
            ants: model.population(),
            ants_with_leaves: model.ants_with_leaves(),
            fraction_foragers: model.fraction_foragers(),
            fraction_dormant: model.fraction_dormant(),
            fungus_biomass: model.fungus.biomass,
            nest_energy_buffer: model.nest.energy_buffer,
            forager_fitness: model.mean_forager_fitness(),
            caretaker_fitness: model.mean_caretaker_fitness(),
            pheromones: model.pheromone_count(),
            total_leaves: model.total_leaves(),
            running: model.running,
            death_reason: model.death_reason,
        }
    }

    /// Format the snapshot as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Ants:{:5} | Leaves carried:{:4} | Foragers:{:.2} | Fungus:{:8.2} | Buffer:{:.2}",
            self.time,
            self.ants,
            self.ants_with_leaves,
            self.fraction_foragers,
            self.fungus_biomass,
            self.nest_energy_buffer,
        )
    }
}

/// Per-tick snapshot series for one run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    pub snapshots: Vec<Stats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Ant population over time
    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots.iter().map(|s| (s.time, s.ants)).collect()
    }

    /// Fungus biomass over time
    pub fn biomass_series(&self) -> Vec<(u64, f32)> {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.fungus_biomass))
            .collect()
    }

    /// Save history to a JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_capture_initial_state() {
        let config = Config::default();
        let model = Model::with_seed(config.clone(), 42);
        let stats = Stats::capture(&model);

        assert_eq!(stats.time, 0);
        assert_eq!(stats.ants, config.colony.num_ants);
        assert_eq!(stats.ants_with_leaves, 0);
        assert!((stats.fraction_foragers - 0.5).abs() < 1e-6);
        assert_eq!(stats.fungus_biomass, 100.0);
        assert!(stats.running);
        assert!(stats.death_reason.is_none());
        assert_eq!(
            stats.total_leaves,
            config.plants.num_plants as f32 * config.plants.num_plant_leaves
        );
    }

    #[test]
    fn test_history_series() {
        let mut history = StatsHistory::new();
        for i in 0..5 {
            let mut stats = Stats::default();
            stats.time = i;
            stats.ants = 10 * (i as usize + 1);
            history.record(stats);
        }

        let series = history.population_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (0, 10));
        assert_eq!(series[4], (4, 50));
    }

    #[test]
    fn test_history_json_roundtrip() {
        let mut history = StatsHistory::new();
        let mut stats = Stats::default();
        stats.time = 3;
        stats.fungus_biomass = 42.5;
        history.record(stats);

        let temp_path = "/tmp/attine_test_history.json";
        history.save(temp_path).unwrap();
        let loaded = StatsHistory::load(temp_path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.snapshots[0].time, 3);
        assert_eq!(loaded.snapshots[0].fungus_biomass, 42.5);

        std::fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_summary_line() {
        let config = Config::default();
        let model = Model::with_seed(config, 1);
        let summary = model.snapshot().summary();
        assert!(summary.contains("Ants:"));
        assert!(summary.contains("Fungus:"));
    }
}

//! Configuration for the mutualism model.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub colony: ColonyConfig,
    #[serde(default)]
    pub plants: PlantConfig,
    #[serde(default)]
    pub pheromone: PheromoneConfig,
    #[serde(default)]
    pub fungus: FungusConfig,
    #[serde(default)]
    pub nest: NestConfig,
    /// Record a reporter snapshot every tick
    #[serde(default = "default_collect_data")]
    pub collect_data: bool,
}

fn default_collect_data() -> bool {
    true
}

/// Grid dimensions (non-toroidal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: u16,
    pub height: u16,
}

/// Ant colony configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Number of ants at start
    pub num_ants: usize,
    /// Fraction of the initial population spawned as foragers
    pub initial_foragers_ratio: f32,
    /// Per-tick probability that an ant dies
    pub ant_death_probability: f32,
}

/// Plant resource configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Number of plants placed at start
    pub num_plants: usize,
    /// Leaves per plant, also the regrowth cap
    pub num_plant_leaves: f32,
    /// Leaves regrown per tick
    pub leaf_regrowth_rate: f32,
}

/// Pheromone marker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PheromoneConfig {
    /// Ticks until an un-remarked marker evaporates
    pub lifespan: u32,
}

/// Fungus garden configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FungusConfig {
    /// Initial energy endowment, converted to biomass at construction
    pub initial_energy: f32,
    /// Fractional biomass decay per tick
    pub decay_rate: f32,
    /// Biomass gained per unit of delivered leaf energy
    pub energy_biomass_cvn: f32,
    /// Biomass at or below which the fungus dies
    pub biomass_death_threshold: f32,
    /// Biomass above which caretakers harvest in the active regime
    pub feed_threshold: f32,
}

/// Nest / reproduction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestConfig {
    /// Larvae nutrition gained per unit of harvested biomass
    pub fungus_larvae_cvn: f32,
    /// Nutrition consumed per newborn ant
    pub energy_per_offspring: f32,
    /// Capacity of each fitness queue
    pub max_fitness_queue_size: usize,
    /// Biomass removed per caretaker roundtrip
    pub caretaker_carrying_amount: f32,
    /// Roundtrip length distribution, active regime
    pub caretaker_roundtrip_mean: f32,
    pub caretaker_roundtrip_std: f32,
    /// Roundtrip length distribution, dormant regime
    pub dormant_roundtrip_mean: f32,
    pub dormant_roundtrip_std: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            colony: ColonyConfig::default(),
            plants: PlantConfig::default(),
            pheromone: PheromoneConfig::default(),
            fungus: FungusConfig::default(),
            nest: NestConfig::default(),
            collect_data: true,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
        }
    }
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            num_ants: 50,
            initial_foragers_ratio: 0.5,
            ant_death_probability: 0.01,
        }
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            num_plants: 64,
            num_plant_leaves: 100.0,
            leaf_regrowth_rate: 0.5,
        }
    }
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        Self { lifespan: 30 }
    }
}

impl Default for FungusConfig {
    fn default() -> Self {
        Self {
            initial_energy: 50.0,
            decay_rate: 0.005,
            energy_biomass_cvn: 2.0,
            biomass_death_threshold: 5.0,
            feed_threshold: 5.0,
        }
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            fungus_larvae_cvn: 0.9,
            energy_per_offspring: 1.0,
            max_fitness_queue_size: 10,
            caretaker_carrying_amount: 1.0,
            caretaker_roundtrip_mean: 5.0,
            caretaker_roundtrip_std: 5.0,
            dormant_roundtrip_mean: 60.0,
            dormant_roundtrip_std: 5.0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err("grid dimensions must be > 0".to_string());
        }
        if self.grid.width > 1024 || self.grid.height > 1024 {
            return Err("grid dimensions must be at most 1024".to_string());
        }
        if !(0.0..=1.0).contains(&self.colony.initial_foragers_ratio) {
            return Err("initial_foragers_ratio must be in [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.colony.ant_death_probability) {
            return Err("ant_death_probability must be in [0, 1]".to_string());
        }
        if self.plants.num_plant_leaves < 0.0 || self.plants.leaf_regrowth_rate < 0.0 {
            return Err("plant leaf counts and regrowth rate must be non-negative".to_string());
        }
        if self.pheromone.lifespan == 0 {
            return Err("pheromone lifespan must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.fungus.decay_rate) {
            return Err("fungus decay_rate must be in [0, 1]".to_string());
        }
        if self.fungus.initial_energy <= 0.0 || self.fungus.energy_biomass_cvn <= 0.0 {
            return Err("fungus energy parameters must be > 0".to_string());
        }
        if self.nest.energy_per_offspring <= 0.0 {
            return Err("energy_per_offspring must be > 0".to_string());
        }
        if self.nest.caretaker_carrying_amount <= 0.0 {
            return Err("caretaker_carrying_amount must be > 0".to_string());
        }
        if self.nest.max_fitness_queue_size == 0 {
            return Err("max_fitness_queue_size must be > 0".to_string());
        }
        if self.nest.caretaker_roundtrip_mean < 1.0 || self.nest.dormant_roundtrip_mean < 1.0 {
            return Err("roundtrip means must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.grid.width, loaded.grid.width);
        assert_eq!(
            config.nest.max_fitness_queue_size,
            loaded.nest.max_fitness_queue_size
        );
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "colony:\n  num_ants: 10\n  initial_foragers_ratio: 1.0\n  ant_death_probability: 0.0\n";
        let loaded: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(loaded.colony.num_ants, 10);
        assert_eq!(loaded.grid.width, 50);
        assert!(loaded.collect_data);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.colony.ant_death_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grid.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.nest.max_fitness_queue_size = 0;
        assert!(config.validate().is_err());
    }
}

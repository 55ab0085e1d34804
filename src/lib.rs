//! # attine
//!
//! Agent-based model of the mutualism between leafcutter ants and their
//! fungus garden.
//!
//! A fixed-size 2D grid hosts a stationary nest, stationary plants, mobile
//! worker ants running a four-state foraging/caretaking protocol, a single
//! fungus colony with a biomass/energy economy, and ephemeral pheromone
//! markers that coordinate the ants stigmergically. Every tick activates
//! each live agent exactly once in a freshly randomized order; runs are
//! exactly reproducible per seed.
//!
//! ## Quick Start
//!
//! ```rust
//! use attine::{Config, Model};
//!
//! let config = Config::default();
//! let mut model = Model::with_seed(config, 42);
//!
//! // advance until collapse or the horizon
//! model.run(1000);
//!
//! println!("Ants: {}", model.population());
//! println!("Fungus biomass: {}", model.fungus.biomass);
//! println!("Still viable: {}", model.running);
//! ```
//!
//! ## Repeated runs
//!
//! ```rust
//! use attine::batch::run_batch;
//! use attine::Config;
//!
//! let mut config = Config::default();
//! config.collect_data = false;
//! let outcomes = run_batch(&config, 8, 200, 1);
//! assert_eq!(outcomes.len(), 8);
//! ```

pub mod agents;
pub mod batch;
pub mod config;
pub mod grid;
pub mod model;
pub mod stats;
pub mod util;

// Re-export main types
pub use config::Config;
pub use model::{DeathReason, Model};
pub use stats::{Stats, StatsHistory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

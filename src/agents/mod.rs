//! Agent types: the mobile workers and the stationary parts of the colony.

pub mod ant;
pub mod fungus;
pub mod nest;
pub mod pheromone;
pub mod plant;

pub use ant::{Ant, AntState};
pub use fungus::Fungus;
pub use nest::Nest;
pub use pheromone::Pheromone;
pub use plant::Plant;

use serde::{Deserialize, Serialize};

/// Stable agent identity. Assigned once at creation and never reused, so
/// grid membership and schedule entries can refer to agents by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tagged kind of a scheduled or grid-resident agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Ant,
    Plant,
    Pheromone,
    Nest,
    Fungus,
}

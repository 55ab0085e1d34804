//! The model: agent arena, scheduler and the per-tick behavioral protocol.
//!
//! One `Model` owns the grid, every agent, and a seeded RNG stream. A tick
//! activates every live agent exactly once in a freshly randomized order;
//! all mutation happens inside the activated agent's turn, so no locking is
//! needed and runs are exactly reproducible per seed.

use crate::agents::{AgentId, AgentKind, Ant, AntState, Fungus, Nest, Pheromone, Plant};
use crate::config::Config;
use crate::grid::{MultiGrid, Pos};
use crate::stats::{Stats, StatsHistory};
use crate::util;
use log::debug;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Steepness of the crowding-to-fitness activation for forager trips
const FORAGER_FITNESS_STEEPNESS: f32 = 4.0;
/// Steepness of the biomass-delta activation for caretaker roundtrips
const CARETAKER_FITNESS_STEEPNESS: f32 = 1.0;

/// Terminal cause of a colony collapse
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathReason {
    /// The fungus garden starved or decayed to death
    FungusCollapse,
    /// No live ants remain
    AntExtinction,
}

/// The leafcutter ant / fungus mutualism model
pub struct Model {
    pub config: Config,
    pub grid: MultiGrid,
    pub nest: Nest,
    pub fungus: Fungus,

    ants: HashMap<AgentId, Ant>,
    plants: HashMap<AgentId, Plant>,
    pheromones: HashMap<AgentId, Pheromone>,

    nest_pos: Pos,
    /// Live agents in creation order; shuffled afresh every tick
    schedule: Vec<(AgentId, AgentKind)>,

    /// Completed ticks
    pub time: u64,
    /// True while the colony is viable
    pub running: bool,
    pub death_reason: Option<DeathReason>,
    /// Durations of all completed forager trips
    pub trip_durations: Vec<u32>,
    /// Per-tick reporter snapshots, recorded when `collect_data` is on
    pub history: StatsHistory,

    next_agent_id: u64,
    rng: ChaCha8Rng,
    seed: u64,
}

impl Model {
    /// Create a model with a random seed
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a model with a specific seed for reproducibility
    pub fn with_seed(config: Config, seed: u64) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = MultiGrid::new(config.grid.width, config.grid.height);
        let nest_pos = Pos::new(config.grid.width / 2, config.grid.height / 2);
        let nest = Nest::new(&config.nest, &config.fungus);
        let fungus = Fungus::new(&config.fungus);

        let mut model = Self {
            config,
            grid,
            nest,
            fungus,
            ants: HashMap::new(),
            plants: HashMap::new(),
            pheromones: HashMap::new(),
            nest_pos,
            schedule: Vec::new(),
            time: 0,
            running: true,
            death_reason: None,
            trip_durations: Vec::new(),
            history: StatsHistory::new(),
            next_agent_id: 0,
            rng,
            seed,
        };

        model.init_agents();
        model
    }

    fn init_agents(&mut self) {
        // nest and fungus share the center cell
        let nest_id = self.next_id();
        self.grid
            .place(nest_id, AgentKind::Nest, self.nest_pos)
            .expect("nest cell in bounds");
        self.schedule.push((nest_id, AgentKind::Nest));

        self.init_plants();
        self.init_ants();

        let fungus_id = self.next_id();
        self.grid
            .place(fungus_id, AgentKind::Fungus, self.nest_pos)
            .expect("nest cell in bounds");
        self.schedule.push((fungus_id, AgentKind::Fungus));
    }

    fn init_plants(&mut self) {
        let single_cell = self.config.grid.width == 1 && self.config.grid.height == 1;
        for _ in 0..self.config.plants.num_plants {
            if single_cell {
                break;
            }
            let mut pos = self.random_cell();
            while pos == self.nest_pos {
                pos = self.random_cell();
            }
            let id = self.next_id();
            self.grid
                .place(id, AgentKind::Plant, pos)
                .expect("sampled cell in bounds");
            self.plants.insert(
                id,
                Plant::new(
                    self.config.plants.num_plant_leaves,
                    self.config.plants.leaf_regrowth_rate,
                ),
            );
            self.schedule.push((id, AgentKind::Plant));
        }
    }

    fn init_ants(&mut self) {
        let num_ants = self.config.colony.num_ants;
        let foragers = (self.config.colony.initial_foragers_ratio * num_ants as f32) as usize;
        for i in 0..num_ants {
            let state = if i < foragers {
                AntState::Explore
            } else {
                AntState::Caretaking
            };
            self.spawn_ant(state);
        }
    }

    fn spawn_ant(&mut self, state: AntState) {
        let mut ant = Ant::new(state);
        if state == AntState::Caretaking {
            let countdown = self.draw_roundtrip(false);
            ant.start_roundtrip(countdown, self.fungus.biomass);
        }
        let id = self.next_id();
        self.grid
            .place(id, AgentKind::Ant, self.nest_pos)
            .expect("nest cell in bounds");
        self.ants.insert(id, ant);
        self.schedule.push((id, AgentKind::Ant));
    }

    fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }

    fn random_cell(&mut self) -> Pos {
        Pos::new(
            self.rng.gen_range(0..self.grid.width()),
            self.rng.gen_range(0..self.grid.height()),
        )
    }

    /// Advance the model one tick: record a reporter snapshot of the
    /// pre-tick state, then activate every live agent exactly once in random
    /// order. Agents spawned during the tick first act on the next one;
    /// agents removed during the tick are skipped.
    pub fn step(&mut self) {
        if self.config.collect_data {
            let snapshot = self.snapshot();
            self.history.record(snapshot);
        }

        let mut order = self.schedule.clone();
        order.shuffle(&mut self.rng);

        for (id, kind) in order {
            match kind {
                AgentKind::Ant => self.step_ant(id),
                AgentKind::Plant => {
                    if let Some(plant) = self.plants.get_mut(&id) {
                        plant.regrow();
                    }
                }
                AgentKind::Pheromone => self.step_pheromone(id),
                AgentKind::Nest => self.step_nest(),
                AgentKind::Fungus => self.fungus.step(),
            }
        }

        self.time += 1;
        self.prune_schedule();
        self.update_running();
    }

    /// Advance up to `max_steps` ticks, stopping early on colony collapse
    pub fn run(&mut self, max_steps: u64) {
        while self.running && self.time < max_steps {
            self.step();
        }
    }

    // ------------------------------------------------------------------
    // Ant protocol
    // ------------------------------------------------------------------

    fn step_ant(&mut self, id: AgentId) {
        // removed earlier this tick (or a stale schedule entry): skip
        let Some(mut ant) = self.ants.remove(&id) else {
            return;
        };

        // mortality comes first; a dying ant takes no further action
        if self.rng.gen::<f32>() <= self.config.colony.ant_death_probability {
            self.grid.remove(id).expect("dying ant was placed");
            return;
        }

        match ant.state {
            AntState::Explore => self.explore_step(id, &mut ant),
            AntState::Recruit => self.recruit_step(id, &mut ant),
            AntState::Harvest => self.harvest_step(id, &mut ant),
            AntState::Caretaking => self.caretaking_step(&mut ant),
        }

        // trip bookkeeping for the foraging cycle only
        if ant.is_forager() {
            let sample = self.crowding_sample(id);
            ant.record_crowding(sample);
        }

        self.ants.insert(id, ant);
    }

    /// Biased random walk onto the grid; movement drifts away from the cell
    /// the ant came from.
    fn random_move(&mut self, id: AgentId, ant: &mut Ant) {
        let pos = self.grid.position_of(id).expect("ant on grid");
        let candidates = self.grid.neighborhood(pos);
        if candidates.is_empty() {
            return;
        }

        let next = match ant.prev_pos {
            None => *candidates
                .choose(&mut self.rng)
                .expect("neighborhood is non-empty"),
            Some(prev) => {
                let weights: Vec<u32> = candidates.iter().map(|c| c.manhattan(prev)).collect();
                match WeightedIndex::new(&weights) {
                    Ok(dist) => candidates[dist.sample(&mut self.rng)],
                    // all candidates coincide with prev (degenerate grids)
                    Err(_) => *candidates.choose(&mut self.rng).expect("non-empty"),
                }
            }
        };

        ant.prev_pos = Some(pos);
        self.grid.move_to(id, next).expect("neighborhood cell in bounds");
    }

    fn explore_step(&mut self, id: AgentId, ant: &mut Ant) {
        self.random_move(id, ant);

        let (plants, pheromones) = self.nearby_plants_and_pheromones(id);
        if let Some(&plant_id) = plants.choose(&mut self.rng) {
            let plant = self.plants.get_mut(&plant_id).expect("scanned plant in store");
            if plant.take_leaf() {
                ant.has_leaf = true;
                ant.state = AntState::Recruit;
            }
        } else if !pheromones.is_empty() {
            ant.state = AntState::Harvest;
        }
    }

    fn recruit_step(&mut self, id: AgentId, ant: &mut Ant) {
        let pos = self.grid.position_of(id).expect("ant on grid");
        if pos == self.nest_pos {
            self.returned_to_nest(ant);
            return;
        }

        // trails are re-marked on every pass, keeping used routes alive
        self.put_pheromone(pos);

        let next = self.toward_nest(pos);
        self.grid.move_to(id, next).expect("homeward step in bounds");
    }

    fn harvest_step(&mut self, id: AgentId, ant: &mut Ant) {
        let (plants, pheromones) = self.nearby_plants_and_pheromones(id);

        if let Some(&plant_id) = plants.choose(&mut self.rng) {
            let plant = self.plants.get_mut(&plant_id).expect("scanned plant in store");
            if plant.take_leaf() {
                ant.has_leaf = true;
                ant.state = AntState::Recruit;
            } else {
                // leaves exhausted, back to searching
                ant.state = AntState::Explore;
            }
            return;
        }

        if pheromones.is_empty() {
            // trail evaporated under us
            ant.state = AntState::Explore;
            return;
        }

        let pos = self.grid.position_of(id).expect("ant on grid");
        let own_dist = pos.manhattan(self.nest_pos);
        let outward: Vec<Pos> = pheromones
            .iter()
            .filter_map(|&marker| {
                let marker_pos = self.grid.position_of(marker).ok()?;
                (marker_pos.manhattan(self.nest_pos) > own_dist).then_some(marker_pos)
            })
            .collect();

        match outward.choose(&mut self.rng) {
            Some(&target) => {
                self.grid.move_to(id, target).expect("pheromone cell in bounds");
            }
            None => {
                // every marker leads back toward the nest
                self.random_move(id, ant);
                ant.state = AntState::Explore;
            }
        }
    }

    fn caretaking_step(&mut self, ant: &mut Ant) {
        ant.roundtrip_countdown = ant.roundtrip_countdown.saturating_sub(1);
        if ant.roundtrip_countdown > 0 {
            return;
        }

        // roundtrip complete: score the garden's growth since the baseline
        let delta = self.fungus.biomass - ant.biomass_baseline;
        self.nest
            .caretaker_fitness
            .push(util::arctan_real(delta, CARETAKER_FITNESS_STEEPNESS));

        // the active regime requires a harvestable garden; a failed harvest
        // sends the caretaker into the slower dormant roundtrip cycle
        let fed = !self.fungus.dead
            && self.fungus.biomass > self.config.fungus.feed_threshold
            && self.nest.feed_larvae(&mut self.fungus);
        ant.dormant = !fed;

        let countdown = self.draw_roundtrip(ant.dormant);
        ant.start_roundtrip(countdown, self.fungus.biomass);
    }

    /// Trip completion at the nest cell: deliver the leaf, score the trip,
    /// and rebalance the division of labor.
    fn returned_to_nest(&mut self, ant: &mut Ant) {
        if ant.has_leaf {
            self.fungus.feed();
            ant.has_leaf = false;
        }

        let intensity = ant.interaction_intensity();
        let fitness = 1.0 - util::arctan_pstv(intensity, FORAGER_FITNESS_STEEPNESS);
        self.nest.forager_fitness.push(fitness);
        self.trip_durations.push(ant.trip_ticks);

        // an uncrowded colony pulls caretakers back into foraging
        if self.rng.gen::<f32>() < fitness {
            self.draft_caretaker();
        }

        // a crowded trip pushes this ant into caretaking
        if self.rng.gen::<f32>() < intensity {
            ant.state = AntState::Caretaking;
            ant.dormant = false;
            let countdown = self.draw_roundtrip(false);
            ant.start_roundtrip(countdown, self.fungus.biomass);
        } else {
            ant.state = AntState::Explore;
        }

        ant.reset_trip();
    }

    /// Send one randomly chosen caretaker on the nest cell back to Explore
    fn draft_caretaker(&mut self) {
        let candidates: Vec<AgentId> = self
            .grid
            .cell_contents(self.nest_pos)
            .iter()
            .filter(|o| o.kind == AgentKind::Ant)
            .filter(|o| {
                self.ants
                    .get(&o.id)
                    .map_or(false, |a| a.state == AntState::Caretaking)
            })
            .map(|o| o.id)
            .collect();

        if let Some(&chosen) = candidates.choose(&mut self.rng) {
            let drafted = self.ants.get_mut(&chosen).expect("candidate in store");
            drafted.state = AntState::Explore;
            drafted.dormant = false;
            drafted.roundtrip_countdown = 0;
            drafted.prev_pos = None;
            drafted.reset_trip();
        }
    }

    /// Deposit a pheromone at `pos`, re-marking an existing one instead of
    /// stacking a duplicate.
    fn put_pheromone(&mut self, pos: Pos) {
        let existing = self
            .grid
            .cell_contents(pos)
            .iter()
            .find(|o| o.kind == AgentKind::Pheromone)
            .copied();
        if let Some(occupant) = existing {
            self.pheromones
                .get_mut(&occupant.id)
                .expect("marker in store")
                .remark();
            return;
        }

        let id = self.next_id();
        self.grid
            .place(id, AgentKind::Pheromone, pos)
            .expect("ant cell in bounds");
        self.pheromones
            .insert(id, Pheromone::new(self.config.pheromone.lifespan));
        self.schedule.push((id, AgentKind::Pheromone));
    }

    /// One 8-directional step toward the nest, by rounding the heading angle
    fn toward_nest(&self, pos: Pos) -> Pos {
        let dx = self.nest_pos.x as f32 - pos.x as f32;
        let dy = self.nest_pos.y as f32 - pos.y as f32;
        let angle = dx.atan2(dy);
        let x_step = angle.sin().round() as i32;
        let y_step = angle.cos().round() as i32;
        Pos::new((pos.x as i32 + x_step) as u16, (pos.y as i32 + y_step) as u16)
    }

    /// Plant and pheromone ids in the Moore neighborhood, own cell included
    fn nearby_plants_and_pheromones(&self, id: AgentId) -> (Vec<AgentId>, Vec<AgentId>) {
        let pos = self.grid.position_of(id).expect("ant on grid");
        let mut plants = Vec::new();
        let mut pheromones = Vec::new();
        for occupant in self.grid.neighbors(pos, true) {
            match occupant.kind {
                AgentKind::Plant => plants.push(occupant.id),
                AgentKind::Pheromone => pheromones.push(occupant.id),
                _ => {}
            }
        }
        (plants, pheromones)
    }

    /// Other foraging ants in the Moore neighborhood, normalized by its size
    fn crowding_sample(&self, id: AgentId) -> f32 {
        let pos = self.grid.position_of(id).expect("ant on grid");
        let mut count = 0u32;
        for occupant in self.grid.neighbors(pos, true) {
            if occupant.kind != AgentKind::Ant || occupant.id == id {
                continue;
            }
            if let Some(other) = self.ants.get(&occupant.id) {
                if other.is_forager() {
                    count += 1;
                }
            }
        }
        count as f32 / 8.0
    }

    fn draw_roundtrip(&mut self, dormant: bool) -> u32 {
        let (mean, std) = if dormant {
            (
                self.config.nest.dormant_roundtrip_mean,
                self.config.nest.dormant_roundtrip_std,
            )
        } else {
            (
                self.config.nest.caretaker_roundtrip_mean,
                self.config.nest.caretaker_roundtrip_std,
            )
        };
        util::gaussian(&mut self.rng, mean, std).round().max(1.0) as u32
    }

    // ------------------------------------------------------------------
    // Other scheduled agents
    // ------------------------------------------------------------------

    fn step_pheromone(&mut self, id: AgentId) {
        let Some(marker) = self.pheromones.get_mut(&id) else {
            return;
        };
        if marker.tick() {
            self.pheromones.remove(&id);
            self.grid.remove(id).expect("expired marker was placed");
        }
    }

    fn step_nest(&mut self) {
        let offspring = self.nest.take_offspring();
        self.ant_birth(offspring);
    }

    /// Spawn newborn ants on the nest cell. Each starts as a caretaker with
    /// probability one minus the average recent forager fitness.
    fn ant_birth(&mut self, count: usize) {
        let average_fitness = self.nest.average_forager_fitness();
        for _ in 0..count {
            let state = if self.rng.gen::<f32>() > average_fitness {
                AntState::Caretaking
            } else {
                AntState::Explore
            };
            self.spawn_ant(state);
        }
    }

    // ------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------

    fn prune_schedule(&mut self) {
        let ants = &self.ants;
        let pheromones = &self.pheromones;
        self.schedule.retain(|(id, kind)| match kind {
            AgentKind::Ant => ants.contains_key(id),
            AgentKind::Pheromone => pheromones.contains_key(id),
            AgentKind::Plant | AgentKind::Nest | AgentKind::Fungus => true,
        });
    }

    fn update_running(&mut self) {
        if !self.running {
            return;
        }
        if self.fungus.dead {
            self.running = false;
            self.death_reason = Some(DeathReason::FungusCollapse);
        } else if self.ants.is_empty() {
            self.running = false;
            self.death_reason = Some(DeathReason::AntExtinction);
        }
        if !self.running {
            debug!(
                "colony collapsed at tick {}: {:?}",
                self.time, self.death_reason
            );
        }
    }

    // ------------------------------------------------------------------
    // Reporters
    // ------------------------------------------------------------------

    /// Number of live ants
    pub fn population(&self) -> usize {
        self.ants.len()
    }

    /// Ants currently carrying a leaf
    pub fn ants_with_leaves(&self) -> usize {
        self.ants.values().filter(|a| a.has_leaf).count()
    }

    /// Fraction of ants in the foraging cycle (not Caretaking)
    pub fn fraction_foragers(&self) -> f32 {
        if self.ants.is_empty() {
            return 0.0;
        }
        self.ants.values().filter(|a| a.is_forager()).count() as f32 / self.ants.len() as f32
    }

    /// Fraction of ants that are caretakers in the dormant regime
    pub fn fraction_dormant(&self) -> f32 {
        if self.ants.is_empty() {
            return 0.0;
        }
        self.ants
            .values()
            .filter(|a| a.state == AntState::Caretaking && a.dormant)
            .count() as f32
            / self.ants.len() as f32
    }

    /// Mean recent forager trip fitness (0.5 prior when no trips yet)
    pub fn mean_forager_fitness(&self) -> f32 {
        self.nest.forager_fitness.mean().unwrap_or(0.5)
    }

    /// Mean recent caretaker roundtrip fitness (0.5 prior when none yet)
    pub fn mean_caretaker_fitness(&self) -> f32 {
        self.nest.caretaker_fitness.mean().unwrap_or(0.5)
    }

    /// Live pheromone markers on the grid
    pub fn pheromone_count(&self) -> usize {
        self.pheromones.len()
    }

    /// Total harvestable leaves across all plants
    pub fn total_leaves(&self) -> f32 {
        self.plants.values().map(|p| p.num_leaves).sum()
    }

    /// The nest's (and fungus's) cell
    pub fn nest_pos(&self) -> Pos {
        self.nest_pos
    }

    /// Seed of this run's RNG stream
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Capture a reporter snapshot of the current state
    pub fn snapshot(&self) -> Stats {
        Stats::capture(self)
    }
}

//! Repeated-run harness interface.
//!
//! Sensitivity analyses drive many independent model instances with varied
//! parameter assignments and read the reporters after termination or at a
//! fixed horizon. This module provides that driving loop: the sampling and
//! statistics layers stay external. Each repetition gets its own model and
//! RNG stream, so the fan-out parallelism cannot perturb run outcomes.

use crate::config::Config;
use crate::model::{DeathReason, Model};
use crate::stats::{Stats, StatsHistory};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Result of one completed repetition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Seed of the run's RNG stream
    pub seed: u64,
    /// Ticks completed before termination or the horizon
    pub steps: u64,
    /// Reporter values at the final state
    pub final_stats: Stats,
    /// Collapse cause, if the colony failed before the horizon
    pub death_reason: Option<DeathReason>,
    /// Durations of all completed forager trips
    pub trip_durations: Vec<u32>,
    /// Per-tick snapshots, present when `collect_data` was on
    pub history: Option<StatsHistory>,
}

/// Run one repetition to the horizon or until the colony collapses
pub fn run_once(config: Config, max_steps: u64, seed: u64) -> RunOutcome {
    let collect = config.collect_data;
    let mut model = Model::with_seed(config, seed);
    model.run(max_steps);

    RunOutcome {
        seed,
        steps: model.time,
        final_stats: model.snapshot(),
        death_reason: model.death_reason,
        trip_durations: std::mem::take(&mut model.trip_durations),
        history: collect.then(|| std::mem::take(&mut model.history)),
    }
}

/// Run `repetitions` independent models in parallel. Repetition `i` is
/// seeded with `base_seed + i`, so a batch is reproducible as a whole.
pub fn run_batch(config: &Config, repetitions: u64, max_steps: u64, base_seed: u64) -> Vec<RunOutcome> {
    info!("batch of {repetitions} runs, horizon {max_steps}, base seed {base_seed}");
    (0..repetitions)
        .into_par_iter()
        .map(|i| run_once(config.clone(), max_steps, base_seed + i))
        .collect()
}

/// Write one CSV row per run outcome
pub fn export_csv<P: AsRef<Path>>(outcomes: &[RunOutcome], path: P) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    writeln!(
        file,
        "seed,steps,ants,ants_with_leaves,fraction_foragers,fraction_dormant,\
         fungus_biomass,forager_fitness,caretaker_fitness,trips_completed,death_reason"
    )?;

    for outcome in outcomes {
        let death = match outcome.death_reason {
            Some(DeathReason::FungusCollapse) => "fungus_collapse",
            Some(DeathReason::AntExtinction) => "ant_extinction",
            None => "",
        };
        writeln!(
            file,
            "{},{},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{},{}",
            outcome.seed,
            outcome.steps,
            outcome.final_stats.ants,
            outcome.final_stats.ants_with_leaves,
            outcome.final_stats.fraction_foragers,
            outcome.final_stats.fraction_dormant,
            outcome.final_stats.fungus_biomass,
            outcome.final_stats.forager_fitness,
            outcome.final_stats.caretaker_fitness,
            outcome.trip_durations.len(),
            death,
        )?;
    }

    Ok(())
}

//! CLI entry point for the mutualism model.

use attine::batch::{export_csv, run_batch};
use attine::{Config, Model};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "attine")]
#[command(version)]
#[command(about = "Agent-based model of the leafcutter ant / fungus garden mutualism")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Tick horizon
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the stats history
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run repeated independent simulations
    Batch {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of repetitions
        #[arg(short, long, default_value = "16")]
        repetitions: u64,

        /// Tick horizon per repetition
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Base seed; repetition i uses base + i
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Output directory for the outcome table
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Generate a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            steps,
            seed,
            output,
            quiet,
        } => run_simulation(config, steps, seed, output, quiet),

        Commands::Batch {
            config,
            repetitions,
            steps,
            seed,
            output,
        } => run_batch_command(config, repetitions, steps, seed, output),

        Commands::Init { output } => generate_config(output),
    }
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        println!("Loading config from: {:?}", path);
        Config::from_file(path)
    } else {
        println!("Using default configuration");
        Ok(Config::default())
    }
}

fn run_simulation(
    config_path: PathBuf,
    steps: u64,
    seed: Option<u64>,
    output: PathBuf,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    std::fs::create_dir_all(&output)?;

    let mut model = match seed {
        Some(s) => {
            println!("Using seed: {}", s);
            Model::with_seed(config.clone(), s)
        }
        None => Model::new(config.clone()),
    };

    println!("Starting simulation");
    println!("  Grid: {}x{}", config.grid.width, config.grid.height);
    println!("  Ants: {}", model.population());
    println!("  Plants: {}", config.plants.num_plants);
    println!("  Steps: {}", steps);
    println!();

    let start = Instant::now();
    while model.running && model.time < steps {
        model.step();
        if !quiet && model.time % 100 == 0 {
            println!("{}", model.snapshot().summary());
        }
    }
    let elapsed = start.elapsed();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Steps: {}", model.time);
    println!("Final ants: {}", model.population());
    println!("Final fungus biomass: {:.2}", model.fungus.biomass);
    println!("Completed trips: {}", model.trip_durations.len());
    if let Some(reason) = model.death_reason {
        println!("Colony collapsed: {:?}", reason);
    }

    if config.collect_data {
        let history_path = output.join("stats_history.json");
        model.history.save(history_path.to_str().unwrap())?;
        println!("Stats history: {:?}", history_path);
    }

    Ok(())
}

fn run_batch_command(
    config_path: PathBuf,
    repetitions: u64,
    steps: u64,
    seed: u64,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    std::fs::create_dir_all(&output)?;

    println!("Running {} repetitions, horizon {}", repetitions, steps);

    let start = Instant::now();
    let outcomes = run_batch(&config, repetitions, steps, seed);
    let elapsed = start.elapsed();

    let collapsed = outcomes.iter().filter(|o| o.death_reason.is_some()).count();
    let mean_ants =
        outcomes.iter().map(|o| o.final_stats.ants).sum::<usize>() as f64 / outcomes.len() as f64;

    println!();
    println!("=== Batch Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Collapsed runs: {}/{}", collapsed, repetitions);
    println!("Mean final ants: {:.1}", mean_ants);

    let csv_path = output.join("batch_outcomes.csv");
    export_csv(&outcomes, &csv_path)?;
    println!("Outcome table: {:?}", csv_path);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

//! irn_sim: survival rates of an adaptive-network SIR epidemic over a class of
//! networks.
//!
//! # Example
//!
//! ```bash
//! # 500 runs on every instance of the class, written to lattice.csv
//! irn_sim classes/lattice.zip
//!
//! # Static topology, 50 runs per network, different seed per network
//! irn_sim classes/lattice --behavior static -r 50 --seed-policy per-network
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use irn_core::{run_scenario, BehaviorKind, Disease};
use irn_experiments::{
    read_class, run_scenario_across_networks, summarize_by_network, write_summary_csv,
    write_survival_csv, write_trajectory_csv, ExperimentConfig, SeedPolicy,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BehaviorChoice {
    Static,
    Pressure,
}

/// Adaptive-network SIR batch simulator
///
/// Command line flags override values from the configuration file, which in
/// turn override the built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "irn_sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory, .tar.gz or .zip archive holding instance-<id>.txt network files
    class_path: PathBuf,

    /// JSON configuration file
    #[arg(short, long, env = "IRN_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Simulations per network
    #[arg(short, long)]
    repetitions: Option<usize>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    seed_policy: Option<SeedPolicy>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    #[arg(long, value_enum)]
    behavior: Option<BehaviorChoice>,

    /// Pressure radius in hops
    #[arg(long)]
    radius: Option<u32>,

    /// Probability that a pressured agent drops its contacts for a step
    #[arg(long)]
    flicker_probability: Option<f64>,

    #[arg(long)]
    days_infectious: Option<u32>,

    #[arg(long)]
    transmission_probability: Option<f64>,

    /// Maximum trajectory length in steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Survival CSV path (defaults to <class name>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write per-network summary statistics to this CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Also write the compartment counts of one run on the first network
    #[arg(long)]
    trajectory: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("warn,irn_core=info,irn_experiments=info,irn_sim=info")
            }),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let class = read_class(&args.class_path)?;
    if class.networks.is_empty() {
        warn!(path = %args.class_path.display(), "class contains no instance files");
    }

    info!(
        class = %class.name,
        networks = class.networks.len(),
        behavior = ?config.scenario.behavior,
        disease = ?config.scenario.disease,
        max_steps = config.scenario.max_steps,
        "running class"
    );
    let rates = run_scenario_across_networks(&class.networks, &config.scenario, &config.batch)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", class.name)));
    write_survival_csv(&output, &class.name, &rates)?;
    info!(path = %output.display(), rates = rates.len(), "wrote survival rates");

    if let Some(path) = &args.summary {
        let summaries = summarize_by_network(&rates, config.batch.repetitions);
        write_summary_csv(path, &summaries)?;
        info!(path = %path.display(), "wrote summary");
    }

    if let Some(path) = &args.trajectory {
        match class.networks.first() {
            Some(network) => {
                let mut rng = StdRng::seed_from_u64(config.batch.seed);
                let trajectory = run_scenario(network, &config.scenario, &mut rng)?;
                write_trajectory_csv(path, &trajectory)?;
                info!(
                    path = %path.display(),
                    steps = trajectory.len(),
                    termination = ?trajectory.termination(),
                    "wrote trajectory"
                );
            }
            None => warn!("no network to record a trajectory on"),
        }
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<ExperimentConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::from_json_file(path)?,
        None => ExperimentConfig::default(),
    };

    let batch = &mut config.batch;
    if let Some(repetitions) = args.repetitions {
        batch.repetitions = repetitions;
    }
    if let Some(seed) = args.seed {
        batch.seed = seed;
    }
    if let Some(policy) = args.seed_policy {
        batch.seed_policy = policy;
    }
    if args.threads.is_some() {
        batch.num_threads = args.threads;
    }
    if args.no_progress {
        batch.show_progress = false;
    }

    let scenario = &mut config.scenario;
    if let Some(max_steps) = args.max_steps {
        scenario.max_steps = max_steps;
    }
    scenario.disease = Disease {
        days_infectious: args
            .days_infectious
            .unwrap_or(scenario.disease.days_infectious),
        transmission_probability: args
            .transmission_probability
            .unwrap_or(scenario.disease.transmission_probability),
    };

    scenario.behavior = match (args.behavior, scenario.behavior) {
        (Some(BehaviorChoice::Static), _) => BehaviorKind::Static,
        (Some(BehaviorChoice::Pressure), BehaviorKind::Static) => BehaviorKind::default(),
        (_, current) => current,
    };
    match &mut scenario.behavior {
        BehaviorKind::Pressure {
            radius,
            flicker_probability,
        } => {
            if let Some(value) = args.radius {
                *radius = value;
            }
            if let Some(value) = args.flicker_probability {
                *flicker_probability = value;
            }
        }
        BehaviorKind::Static => {
            if args.radius.is_some() || args.flicker_probability.is_some() {
                warn!("--radius and --flicker-probability are ignored for the static behavior");
            }
        }
    }

    config.validate()?;
    Ok(config)
}

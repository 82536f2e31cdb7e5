//! Parallel batch execution using rayon.
//!
//! One job per network. Each job owns its random stream, initial state and
//! behavior instances, and writes its survival rates into the slice of the
//! output buffer reserved for that network, so results come back grouped by
//! network in input order regardless of which job finishes first.

use std::sync::Arc;
use std::time::Instant;

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use irn_core::{
    simulate, survival_rate, Behavior, Disease, Network, ScenarioParams, SimError, SimResult,
    SirState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExperimentError, ExperimentResult};

const DEFAULT_REPETITIONS: usize = 500;
const DEFAULT_SEED: u64 = 69;

/// How each network's random stream is seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Every network starts from the same seed.
    #[default]
    Shared,
    /// Network `i` is seeded with `seed + i`.
    PerNetwork,
}

impl SeedPolicy {
    pub fn seed_for(self, base: u64, network_index: usize) -> u64 {
        match self {
            SeedPolicy::Shared => base,
            SeedPolicy::PerNetwork => base.wrapping_add(network_index as u64),
        }
    }
}

/// Batch-level settings, independent of the epidemic itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Simulations per network.
    pub repetitions: usize,
    pub seed: u64,
    pub seed_policy: SeedPolicy,
    /// Worker threads. `None` uses rayon's default.
    pub num_threads: Option<usize>,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            seed: DEFAULT_SEED,
            seed_policy: SeedPolicy::default(),
            num_threads: None,
            show_progress: true,
        }
    }
}

impl BatchConfig {
    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    pub fn with_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.repetitions == 0 {
            return Err(SimError::InvalidConfig(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(SimError::InvalidConfig(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runs `repetitions` simulations of one network from the same initial state
/// and returns their survival rates in run order.
///
/// The runs share `rng` sequentially; each gets a fresh behavior from
/// `make_behavior`.
pub fn run_simulation_batch<B>(
    network: &Arc<Network>,
    sir0: &SirState,
    disease: &Disease,
    make_behavior: B,
    max_steps: usize,
    repetitions: usize,
    rng: &mut StdRng,
) -> SimResult<Vec<f64>>
where
    B: Fn(&Arc<Network>) -> SimResult<Box<dyn Behavior>>,
{
    let topology = network.adjacency_matrix();
    (0..repetitions)
        .map(|_| {
            let mut behavior = make_behavior(network)?;
            let trajectory = simulate(topology, sir0, disease, behavior.as_mut(), max_steps, rng)?;
            Ok(survival_rate(&trajectory))
        })
        .collect()
}

/// Runs `config.repetitions` simulations on every network in parallel.
///
/// Each network's initial state is drawn once from that network's stream with
/// `make_sir0(agent_count, rng)`; the repetitions then continue on the same
/// stream. Returns `repetitions * networks.len()` survival rates, the rates of
/// network `i` occupying `[i * repetitions, (i + 1) * repetitions)`.
///
/// # Errors
///
/// Invalid configuration, a thread pool that cannot be built, or the first
/// simulation error raised by any job.
pub fn run_across_networks<S, B>(
    networks: &[Arc<Network>],
    make_sir0: S,
    disease: &Disease,
    make_behavior: B,
    max_steps: usize,
    config: &BatchConfig,
) -> ExperimentResult<Vec<f64>>
where
    S: Fn(usize, &mut StdRng) -> SimResult<SirState> + Sync,
    B: Fn(&Arc<Network>) -> SimResult<Box<dyn Behavior>> + Sync,
{
    config.validate()?;
    disease.validate()?;
    let repetitions = config.repetitions;

    let pool = build_pool(config.num_threads)?;
    let started = Instant::now();
    info!(
        networks = networks.len(),
        repetitions,
        seed = config.seed,
        seed_policy = ?config.seed_policy,
        threads = pool.current_num_threads(),
        "starting batch"
    );

    // Distance matrices are filled before any job reads them.
    pool.install(|| networks.par_iter().for_each(|network| network.warm_caches()));

    let progress = progress_bar(networks.len(), config.show_progress);
    let mut rates = vec![0.0; repetitions * networks.len()];

    pool.install(|| {
        rates
            .par_chunks_mut(repetitions)
            .zip(networks.par_iter())
            .enumerate()
            .try_for_each(|(index, (chunk, network))| -> SimResult<()> {
                let mut rng = StdRng::seed_from_u64(config.seed_policy.seed_for(config.seed, index));
                let sir0 = make_sir0(network.agent_count(), &mut rng)?;
                let batch = run_simulation_batch(
                    network,
                    &sir0,
                    disease,
                    &make_behavior,
                    max_steps,
                    repetitions,
                    &mut rng,
                )?;
                chunk.copy_from_slice(&batch);
                debug!(network = index, agents = network.agent_count(), "network finished");
                if let Some(bar) = &progress {
                    bar.inc(1);
                }
                Ok(())
            })
    })?;

    if let Some(bar) = &progress {
        bar.finish_with_message("Completed");
    }
    info!(
        simulations = rates.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch finished"
    );
    Ok(rates)
}

/// [run_across_networks] driven by a [ScenarioParams]: random initial
/// infections and a behavior built from `params.behavior`.
pub fn run_scenario_across_networks(
    networks: &[Arc<Network>],
    params: &ScenarioParams,
    config: &BatchConfig,
) -> ExperimentResult<Vec<f64>> {
    params.validate()?;
    run_across_networks(
        networks,
        |agent_count, rng| params.initial_state(agent_count, rng),
        &params.disease,
        |network| params.behavior.build(network),
        params.max_steps,
        config,
    )
}

fn build_pool(num_threads: Option<usize>) -> ExperimentResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    builder
        .build()
        .map_err(|error| ExperimentError::Config(format!("cannot build thread pool: {error}")))
}

fn progress_bar(total: usize, show: bool) -> Option<ProgressBar> {
    if !show || total == 0 {
        return None;
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    Some(bar)
}

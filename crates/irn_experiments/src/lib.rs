//! Batch experiments over classes of contact networks.
//!
//! - [loader]: network files and `instance-<id>.txt` class collections
//! - [runner]: parallel repetitions across networks using rayon
//! - [metrics]: survival-rate summaries
//! - [export]: CSV output
//! - [config]: JSON configuration for the `irn_sim` binary

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod metrics;
pub mod runner;

pub use config::ExperimentConfig;
pub use error::{ExperimentError, ExperimentResult};
pub use export::{write_summary_csv, write_survival_csv, write_trajectory_csv};
pub use loader::{class_name, parse_network, read_class, read_network_file, NetworkClass};
pub use metrics::{summarize_by_network, SurvivalSummary};
pub use runner::{
    run_across_networks, run_scenario_across_networks, run_simulation_batch, BatchConfig,
    SeedPolicy,
};

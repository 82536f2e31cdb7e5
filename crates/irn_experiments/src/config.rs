//! File-based experiment configuration.

use std::fs;
use std::path::Path;

use irn_core::ScenarioParams;
use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, ExperimentResult};
use crate::runner::BatchConfig;

/// Everything an `irn_sim` invocation needs besides the network class.
///
/// ```json
/// {
///   "scenario": { "disease": { "days_infectious": 4, "transmission_probability": 0.2 } },
///   "batch": { "repetitions": 100, "seed_policy": "per-network" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub scenario: ScenarioParams,
    pub batch: BatchConfig,
}

impl ExperimentConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> ExperimentResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ExperimentError::io(path, source))?;
        serde_json::from_str(&text).map_err(|error| {
            ExperimentError::Config(format!("{}: {error}", path.display()))
        })
    }

    pub fn validate(&self) -> ExperimentResult<()> {
        self.scenario.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}

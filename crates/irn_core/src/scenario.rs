//! Scenario setup: the parameters of one family of simulation runs.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorKind;
use crate::disease::Disease;
use crate::error::{SimError, SimResult};
use crate::network::Network;
use crate::simulation::{simulate, Trajectory};
use crate::sir::SirState;

/// Default cap on trajectory length (simulated days).
const DEFAULT_MAX_STEPS: usize = 300;

/// Parameters shared by every run of an experiment.
///
/// Any subset of fields may be given when deserializing; the rest fall back to
/// [ScenarioParams::default].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub disease: Disease,
    pub behavior: BehaviorKind,
    pub max_steps: usize,
    /// Number of agents infectious at step 0, chosen uniformly at random.
    pub initial_infections: usize,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            disease: Disease::default(),
            behavior: BehaviorKind::default(),
            max_steps: DEFAULT_MAX_STEPS,
            initial_infections: 1,
        }
    }
}

impl ScenarioParams {
    pub fn with_disease(mut self, disease: Disease) -> Self {
        self.disease = disease;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorKind) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_initial_infections(mut self, count: usize) -> Self {
        self.initial_infections = count;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        self.disease.validate()?;
        if self.max_steps == 0 {
            return Err(SimError::InvalidConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        if let BehaviorKind::Pressure {
            flicker_probability,
            ..
        } = self.behavior
        {
            if !(0.0..=1.0).contains(&flicker_probability) {
                return Err(SimError::InvalidConfig(format!(
                    "flicker_probability must be in [0, 1], got {flicker_probability}"
                )));
            }
        }
        Ok(())
    }

    /// Random initial state for `agent_count` agents.
    pub fn initial_state(&self, agent_count: usize, rng: &mut StdRng) -> SimResult<SirState> {
        SirState::random_initial(agent_count, self.initial_infections, rng)
    }
}

/// Runs one simulation of `params` on `network` with a fresh behavior and a
/// random initial state drawn from `rng`.
pub fn run_scenario(
    network: &Arc<Network>,
    params: &ScenarioParams,
    rng: &mut StdRng,
) -> SimResult<Trajectory> {
    params.validate()?;
    let sir0 = params.initial_state(network.agent_count(), rng)?;
    let mut behavior = params.behavior.build(network)?;
    simulate(
        network.adjacency_matrix(),
        &sir0,
        &params.disease,
        behavior.as_mut(),
        params.max_steps,
        rng,
    )
}

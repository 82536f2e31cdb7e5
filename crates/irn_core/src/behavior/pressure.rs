//! Adaptive behavior driven by accumulated "pressure".
//!
//! Each step an agent gains one unit of pressure if it is within `radius` hops
//! of any infectious agent and loses one unit if it is within `radius` hops of
//! any removed agent. Agents under positive pressure flicker (drop every
//! contact for the step) with `flicker_probability`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use super::strategy::Behavior;
use crate::agent_set::AgentSet;
use crate::error::{SimError, SimResult};
use crate::matrix::SquareMatrix;
use crate::network::Network;
use crate::sir::SirState;

#[derive(Debug, Clone)]
pub struct PressureBehavior {
    network: Arc<Network>,
    radius: u32,
    flicker_probability: f64,
    pressure: Vec<f64>,
}

impl PressureBehavior {
    pub fn new(network: Arc<Network>, radius: u32, flicker_probability: f64) -> SimResult<Self> {
        if !(0.0..=1.0).contains(&flicker_probability) {
            return Err(SimError::InvalidConfig(format!(
                "flicker_probability must be in [0, 1], got {flicker_probability}"
            )));
        }
        let pressure = vec![0.0; network.agent_count()];
        Ok(Self {
            network,
            radius,
            flicker_probability,
            pressure,
        })
    }

    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    /// Union of the `radius` neighborhoods of `sources`.
    fn neighborhood(&self, sources: &AgentSet) -> SimResult<AgentSet> {
        let mut reached = AgentSet::new();
        for agent in sources {
            reached.extend_from(&self.network.nodes_within(agent, self.radius)?);
        }
        Ok(reached)
    }
}

impl Behavior for PressureBehavior {
    fn name(&self) -> String {
        format!(
            "SimplePressure(radius={}, flicker_probability={})",
            self.radius, self.flicker_probability
        )
    }

    fn update_connections(
        &mut self,
        _previous: &SquareMatrix,
        topology: &SquareMatrix,
        _step: usize,
        sir: &SirState,
        rng: &mut StdRng,
    ) -> SimResult<SquareMatrix> {
        let n = self.pressure.len();
        if sir.agent_count() != n {
            return Err(SimError::SizeMismatch {
                what: "epidemic state",
                expected: n,
                actual: sir.agent_count(),
            });
        }
        if topology.size() != n {
            return Err(SimError::SizeMismatch {
                what: "topology matrix",
                expected: n,
                actual: topology.size(),
            });
        }

        for agent in &self.neighborhood(&sir.infectious_agents())? {
            self.pressure[agent] += 1.0;
        }
        for agent in &self.neighborhood(&sir.removed_agents())? {
            self.pressure[agent] -= 1.0;
        }

        let mut connections = topology.clone();
        for agent in 0..n {
            if self.pressure[agent] > 0.0 && rng.gen::<f64>() < self.flicker_probability {
                connections.isolate(agent);
            }
        }
        Ok(connections)
    }
}

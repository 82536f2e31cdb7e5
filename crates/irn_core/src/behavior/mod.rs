pub mod pressure;
pub mod static_topology;
pub mod strategy;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use pressure::PressureBehavior;
pub use static_topology::StaticBehavior;
pub use strategy::Behavior;

use crate::error::SimResult;
use crate::network::Network;

/// Which behavior to build for each simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorKind {
    Static,
    Pressure {
        radius: u32,
        flicker_probability: f64,
    },
}

impl Default for BehaviorKind {
    fn default() -> Self {
        BehaviorKind::Pressure {
            radius: 2,
            flicker_probability: 0.25,
        }
    }
}

impl BehaviorKind {
    /// Builds a fresh behavior instance for one run on `network`.
    pub fn build(&self, network: &Arc<Network>) -> SimResult<Box<dyn Behavior>> {
        match *self {
            BehaviorKind::Static => Ok(Box::new(StaticBehavior)),
            BehaviorKind::Pressure {
                radius,
                flicker_probability,
            } => Ok(Box::new(PressureBehavior::new(
                Arc::clone(network),
                radius,
                flicker_probability,
            )?)),
        }
    }
}

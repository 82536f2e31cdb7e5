//! Stochastic SIR epidemics on adaptive contact networks.
//!
//! - [network]: topology with cached adjacency and hop-distance matrices
//! - [sir]: per-agent compartment state
//! - [behavior]: strategies that decide which contacts are active each step
//! - [simulation]: the time-stepped driver and transition rule
//! - [scenario]: run parameters

pub mod agent_set;
pub mod behavior;
pub mod disease;
pub mod error;
pub mod matrix;
pub mod network;
pub mod scenario;
pub mod simulation;
pub mod sir;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use agent_set::AgentSet;
pub use behavior::{Behavior, BehaviorKind, PressureBehavior, StaticBehavior};
pub use disease::Disease;
pub use error::{SimError, SimResult};
pub use matrix::SquareMatrix;
pub use network::Network;
pub use scenario::{run_scenario, ScenarioParams};
pub use simulation::{advance, infection_probabilities, simulate, survival_rate, Termination, Trajectory};
pub use sir::{Compartment, SirCounts, SirState};

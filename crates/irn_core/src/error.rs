//! Error type shared by every engine operation.

use thiserror::Error;

/// Failures raised by the simulation engine.
///
/// The engine has no I/O, so every variant describes an input the caller
/// should have rejected earlier. Nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A simulation or scenario parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two inputs disagree about the number of agents.
    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An agent id does not exist in the network.
    #[error("agent {agent} is out of range for a network of {agent_count} agents")]
    UnknownAgent { agent: usize, agent_count: usize },

    /// The node list or adjacency mapping does not describe agents `0..N-1`.
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
}

pub type SimResult<T> = Result<T, SimError>;

use rand::rngs::StdRng;

use crate::error::SimResult;
use crate::matrix::SquareMatrix;
use crate::sir::SirState;

/// Strategy that decides which contacts are active during a step.
///
/// A behavior is created once per simulation run and may keep state across
/// the run's steps. It never sees the next state, only the one the step starts
/// from.
pub trait Behavior: Send {
    /// Human readable name including parameters, used in logs and exports.
    fn name(&self) -> String;

    /// Returns the adjacency matrix used for transmission in `step`.
    ///
    /// # Arguments
    ///
    /// * `previous` - Matrix returned for the previous step (the static topology on step 1)
    /// * `topology` - Static adjacency matrix of the network
    /// * `step` - Step number, starting at 1
    /// * `sir` - Epidemic state at the start of the step
    /// * `rng` - The run's random stream
    ///
    /// The returned matrix must have the same size as `topology`.
    fn update_connections(
        &mut self,
        previous: &SquareMatrix,
        topology: &SquareMatrix,
        step: usize,
        sir: &SirState,
        rng: &mut StdRng,
    ) -> SimResult<SquareMatrix>;
}

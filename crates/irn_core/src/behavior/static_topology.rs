use rand::rngs::StdRng;

use super::strategy::Behavior;
use crate::error::SimResult;
use crate::matrix::SquareMatrix;
use crate::sir::SirState;

/// Agents never change their contacts: every step uses the static topology.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBehavior;

impl Behavior for StaticBehavior {
    fn name(&self) -> String {
        "Static".to_string()
    }

    fn update_connections(
        &mut self,
        _previous: &SquareMatrix,
        topology: &SquareMatrix,
        _step: usize,
        _sir: &SirState,
        _rng: &mut StdRng,
    ) -> SimResult<SquareMatrix> {
        Ok(topology.clone())
    }
}

//! Time-stepped epidemic driver.
//!
//! [simulate] composes a [Behavior] with the per-step transition rule
//! [advance] into a bounded trajectory. A run ends early once its dynamics are
//! frozen (a step changed nobody's compartment and no infectious agent is
//! left) or when every agent has been removed.

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use crate::agent_set::AgentSet;
use crate::behavior::Behavior;
use crate::disease::Disease;
use crate::error::{SimError, SimResult};
use crate::matrix::SquareMatrix;
use crate::sir::{SirCounts, SirState};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A step changed no agent's compartment and the disease is gone.
    Frozen,
    /// Every agent has passed through the epidemic.
    AllRemoved,
    /// `max_steps` states were produced.
    StepBudget,
}

/// Ordered epidemic states of one run. Never empty.
#[derive(Debug, Clone)]
pub struct Trajectory {
    states: Vec<SirState>,
    termination: Termination,
}

impl Trajectory {
    pub fn states(&self) -> &[SirState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> &SirState {
        &self.states[0]
    }

    pub fn last(&self) -> &SirState {
        &self.states[self.states.len() - 1]
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Compartment counts for every step.
    pub fn counts(&self) -> Vec<SirCounts> {
        self.states.iter().map(SirState::counts).collect()
    }

    /// Fraction of agents still susceptible at the end of the run.
    pub fn survival_rate(&self) -> f64 {
        let last = self.last();
        last.num_susceptible() as f64 / last.agent_count() as f64
    }
}

/// Fraction of agents never infected during `trajectory`.
pub fn survival_rate(trajectory: &Trajectory) -> f64 {
    trajectory.survival_rate()
}

/// Runs one simulation.
///
/// # Arguments
///
/// * `topology` - Static adjacency matrix of the network
/// * `sir0` - Initial epidemic state, copied into the trajectory
/// * `disease` - Disease parameters
/// * `behavior` - Fresh behavior instance for this run
/// * `max_steps` - Upper bound on the trajectory length (at least 1)
/// * `rng` - Random stream shared by the behavior and the transition rule
///
/// # Errors
///
/// Returns [SimError::InvalidConfig] for `max_steps == 0`, an empty network or
/// an invalid disease, and [SimError::SizeMismatch] when `sir0` or a matrix
/// returned by the behavior disagrees with the topology size.
pub fn simulate(
    topology: &SquareMatrix,
    sir0: &SirState,
    disease: &Disease,
    behavior: &mut dyn Behavior,
    max_steps: usize,
    rng: &mut StdRng,
) -> SimResult<Trajectory> {
    let n = topology.size();
    if max_steps == 0 {
        return Err(SimError::InvalidConfig(
            "max_steps must be at least 1".to_string(),
        ));
    }
    if n == 0 {
        return Err(SimError::InvalidConfig("network has no agents".to_string()));
    }
    if sir0.agent_count() != n {
        return Err(SimError::SizeMismatch {
            what: "initial epidemic state",
            expected: n,
            actual: sir0.agent_count(),
        });
    }
    disease.validate()?;

    let mut states = Vec::with_capacity(max_steps.min(1024));
    states.push(sir0.clone());
    let mut contacts = topology.clone();
    let mut termination = Termination::StepBudget;

    for step in 1..max_steps {
        let previous = &states[step - 1];
        contacts = behavior.update_connections(&contacts, topology, step, previous, rng)?;
        if contacts.size() != n {
            return Err(SimError::SizeMismatch {
                what: "behavior adjacency matrix",
                expected: n,
                actual: contacts.size(),
            });
        }

        let (next, changed) = advance(previous, &contacts, disease, rng)?;
        let all_removed = next.num_removed() == n;
        // Infectious agents still age towards removal even on a quiet step.
        let frozen = !changed && next.disease_gone();
        trace!(step, counts = ?next.counts(), changed, "advanced");
        states.push(next);

        if frozen {
            termination = Termination::Frozen;
            break;
        }
        if all_removed {
            termination = Termination::AllRemoved;
            break;
        }
    }

    debug!(
        behavior = %behavior.name(),
        steps = states.len(),
        ?termination,
        "simulation finished"
    );
    Ok(Trajectory {
        states,
        termination,
    })
}

/// One step of the epidemic.
///
/// Infectious agents past `days_infectious` are removed first; the remaining
/// infectious agents then transmit along `contacts`. Returns the next state and
/// whether any agent changed compartment.
///
/// # Errors
///
/// [SimError::SizeMismatch] when `contacts` and `state` disagree on the number
/// of agents.
pub fn advance(
    state: &SirState,
    contacts: &SquareMatrix,
    disease: &Disease,
    rng: &mut StdRng,
) -> SimResult<(SirState, bool)> {
    if contacts.size() != state.agent_count() {
        return Err(SimError::SizeMismatch {
            what: "contact matrix",
            expected: state.agent_count(),
            actual: contacts.size(),
        });
    }
    let mut next = state.clone();

    let to_removed = next.infectious_longer_than(disease.days_infectious);
    next.remove(&to_removed);

    let infectious = next.infectious_agents();
    let probabilities =
        infection_probabilities(contacts, &infectious, disease.transmission_probability);

    // One draw per susceptible agent, in ascending order.
    let to_infectious: AgentSet = next
        .susceptible_agents()
        .iter()
        .filter(|&agent| rng.gen::<f64>() < probabilities[agent])
        .collect();
    next.infect(&to_infectious);

    next.age();
    let changed = !to_removed.is_empty() || !to_infectious.is_empty();
    Ok((next, changed))
}

/// Per-agent probability of being infected this step:
/// `1 - prod_{i in infectious} (1 - contacts[i][j] * transmission_probability)`.
///
/// Agents with no infectious contact get exactly `0.0`.
pub fn infection_probabilities(
    contacts: &SquareMatrix,
    infectious: &AgentSet,
    transmission_probability: f64,
) -> Vec<f64> {
    let n = contacts.size();
    let mut escape = vec![1.0; n];
    for i in infectious {
        for (j, &contact) in contacts.row(i).iter().enumerate() {
            if contact != 0.0 {
                escape[j] *= 1.0 - contact * transmission_probability;
            }
        }
    }
    escape.into_iter().map(|p| 1.0 - p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::StaticBehavior;
    use crate::network::Network;
    use crate::sir::Compartment;
    use rand::SeedableRng;

    fn path_topology(n: usize) -> SquareMatrix {
        let edges: Vec<_> = (1..n).map(|v| (v - 1, v)).collect();
        Network::from_edges(n, &edges)
            .unwrap()
            .adjacency_matrix()
            .clone()
    }

    #[test]
    fn no_infectious_means_zero_probability() {
        let topology = SquareMatrix::filled(4, 1.0);
        let probs = infection_probabilities(&topology, &AgentSet::new(), 0.9);
        assert!(probs.iter().all(|p| *p == 0.0));
    }

    #[test]
    fn probability_combines_independent_contacts() {
        let topology = path_topology(3);
        let infectious = AgentSet::from_slice(&[0, 2]);
        let probs = infection_probabilities(&topology, &infectious, 0.5);
        assert_eq!(probs[1], 0.75);
        assert_eq!(probs[0], 0.0);
    }

    #[test]
    fn advance_recovers_before_transmitting() {
        let topology = path_topology(2);
        let state = SirState::from_compartments(vec![
            Compartment::Infectious(2),
            Compartment::Susceptible(2),
        ]);
        let disease = Disease::new(1, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let (next, changed) = advance(&state, &topology, &disease, &mut rng).unwrap();
        assert!(changed);
        assert_eq!(
            next.compartments(),
            &[Compartment::Removed(1), Compartment::Susceptible(3)]
        );
    }

    #[test]
    fn advance_rejects_state_larger_than_contacts() {
        let topology = path_topology(2);
        let state = SirState::with_infectious(3, &AgentSet::from_slice(&[0])).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let result = advance(&state, &topology, &Disease::default(), &mut rng);
        assert_eq!(
            result.unwrap_err(),
            SimError::SizeMismatch {
                what: "contact matrix",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_zero_steps() {
        let topology = path_topology(2);
        let sir0 = SirState::all_susceptible(2);
        let mut rng = StdRng::seed_from_u64(0);
        let result = simulate(
            &topology,
            &sir0,
            &Disease::default(),
            &mut StaticBehavior,
            0,
            &mut rng,
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_empty_network() {
        let topology = SquareMatrix::zeros(0);
        let sir0 = SirState::all_susceptible(0);
        let mut rng = StdRng::seed_from_u64(0);
        let result = simulate(
            &topology,
            &sir0,
            &Disease::default(),
            &mut StaticBehavior,
            10,
            &mut rng,
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_mismatched_initial_state() {
        let topology = path_topology(3);
        let sir0 = SirState::all_susceptible(2);
        let mut rng = StdRng::seed_from_u64(0);
        let result = simulate(
            &topology,
            &sir0,
            &Disease::default(),
            &mut StaticBehavior,
            10,
            &mut rng,
        );
        assert_eq!(
            result.unwrap_err(),
            SimError::SizeMismatch {
                what: "initial epidemic state",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn single_step_budget_returns_initial_state() {
        let topology = path_topology(3);
        let sir0 = SirState::with_infectious(3, &AgentSet::from_slice(&[1])).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let trajectory = simulate(
            &topology,
            &sir0,
            &Disease::default(),
            &mut StaticBehavior,
            1,
            &mut rng,
        )
        .unwrap();
        assert_eq!(trajectory.len(), 1);
        assert_eq!(trajectory.last(), &sir0);
        assert_eq!(trajectory.termination(), Termination::StepBudget);
    }
}

mod support;

use irn_core::test_helpers::{path_network, two_component_network};
use irn_core::{
    infection_probabilities, AgentSet, Compartment, Network, SirState, StaticBehavior,
    Termination,
};
use support::{certain_disease, run};

#[test]
fn path_of_three_burns_out_completely() {
    let network = path_network(3);
    let sir0 = SirState::with_infectious(3, &AgentSet::from_slice(&[1])).unwrap();

    let trajectory = run(&network, &sir0, &certain_disease(), &mut StaticBehavior, 50, 1).unwrap();

    let states = trajectory.states();
    assert_eq!(states[1].infectious_agents().to_vec(), vec![0, 1, 2]);
    assert_eq!(states[2].removed_agents().to_vec(), vec![1]);
    assert_eq!(states[2].infectious_agents().to_vec(), vec![0, 2]);
    assert_eq!(trajectory.last().num_removed(), 3);
    assert_eq!(trajectory.len(), 4);
    assert_eq!(trajectory.termination(), Termination::AllRemoved);
    assert_eq!(trajectory.survival_rate(), 0.0);
}

#[test]
fn isolated_agent_recovers_without_contacts() {
    let network = Network::from_edges(1, &[]).unwrap();
    let sir0 = SirState::with_infectious(1, &AgentSet::from_slice(&[0])).unwrap();

    let trajectory = run(&network, &sir0, &certain_disease(), &mut StaticBehavior, 50, 2).unwrap();

    assert_eq!(trajectory.states()[1].compartment(0), Some(Compartment::Infectious(2)));
    assert_eq!(trajectory.last().compartment(0), Some(Compartment::Removed(1)));
    assert_eq!(trajectory.termination(), Termination::AllRemoved);
    assert_eq!(trajectory.survival_rate(), 0.0);
}

#[test]
fn longer_illness_keeps_isolated_agent_infectious() {
    let network = Network::from_edges(1, &[]).unwrap();
    let sir0 = SirState::with_infectious(1, &AgentSet::from_slice(&[0])).unwrap();
    let disease = irn_core::Disease::new(3, 0.5).unwrap();

    let trajectory = run(&network, &sir0, &disease, &mut StaticBehavior, 50, 2).unwrap();

    // Infectious on days 1..=3, removed on the following step.
    assert_eq!(trajectory.len(), 5);
    assert!(trajectory.states()[3].compartment(0).unwrap().is_infectious());
    assert!(trajectory.last().compartment(0).unwrap().is_removed());
}

#[test]
fn disconnected_component_never_catches_the_disease() {
    let network = two_component_network(3, 4);
    let sir0 = SirState::with_infectious(7, &AgentSet::from_slice(&[0])).unwrap();
    let disease = certain_disease();

    let trajectory = run(&network, &sir0, &disease, &mut StaticBehavior, 50, 3).unwrap();

    for state in trajectory.states() {
        let probabilities = infection_probabilities(
            network.adjacency_matrix(),
            &state.infectious_agents(),
            disease.transmission_probability,
        );
        assert!(probabilities[3..].iter().all(|p| *p == 0.0));
    }
    assert_eq!(trajectory.last().susceptible_agents().to_vec(), vec![3, 4, 5, 6]);
    assert!(trajectory.last().disease_gone());
    assert_eq!(trajectory.termination(), Termination::Frozen);
    assert_eq!(trajectory.survival_rate(), 4.0 / 7.0);
}

#[test]
fn step_budget_caps_trajectory_length() {
    let network = path_network(10);
    let sir0 = SirState::with_infectious(10, &AgentSet::from_slice(&[0])).unwrap();

    let trajectory = run(&network, &sir0, &certain_disease(), &mut StaticBehavior, 3, 4).unwrap();

    assert_eq!(trajectory.len(), 3);
    assert_eq!(trajectory.termination(), Termination::StepBudget);
    assert_eq!(trajectory.first(), &sir0);
}

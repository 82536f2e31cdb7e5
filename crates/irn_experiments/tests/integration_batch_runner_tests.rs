use std::sync::Arc;

use irn_core::test_helpers::{cycle_network, path_network, star_network, two_component_network};
use irn_core::{AgentSet, BehaviorKind, Disease, Network, ScenarioParams, SirState};
use irn_experiments::{
    run_across_networks, run_scenario_across_networks, run_simulation_batch, summarize_by_network,
    BatchConfig, SeedPolicy,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn config(repetitions: usize) -> BatchConfig {
    BatchConfig::default()
        .with_repetitions(repetitions)
        .with_progress(false)
}

fn mixed_networks() -> Vec<Arc<Network>> {
    vec![
        cycle_network(12),
        star_network(9),
        path_network(15),
        two_component_network(5, 5),
    ]
}

#[test]
fn rates_are_grouped_by_network_in_input_order() {
    // Seeding agent 0 with a certain disease: everyone reachable falls ill, so
    // each network's survival rate is fixed by its topology.
    let networks = vec![path_network(4), two_component_network(2, 3), star_network(5)];
    let disease = Disease::new(1, 1.0).unwrap();
    let rates = run_across_networks(
        &networks,
        |n, _| SirState::with_infectious(n, &AgentSet::from_slice(&[0])),
        &disease,
        |network| BehaviorKind::Static.build(network),
        100,
        &config(3),
    )
    .unwrap();

    assert_eq!(rates.len(), 9);
    assert_eq!(&rates[0..3], &[0.0, 0.0, 0.0]);
    assert_eq!(&rates[3..6], &[0.6, 0.6, 0.6]);
    assert_eq!(&rates[6..9], &[0.0, 0.0, 0.0]);
}

#[test]
fn results_do_not_depend_on_thread_count() {
    let networks = mixed_networks();
    let params = ScenarioParams::default()
        .with_disease(Disease::new(3, 0.4).unwrap())
        .with_max_steps(100);

    let single = run_scenario_across_networks(&networks, &params, &config(20).with_num_threads(Some(1)))
        .unwrap();
    let many = run_scenario_across_networks(&networks, &params, &config(20).with_num_threads(Some(4)))
        .unwrap();

    assert_eq!(single.len(), 80);
    assert_eq!(single, many);
}

#[test]
fn seed_policy_controls_each_network_stream() {
    let networks = vec![cycle_network(20), cycle_network(20)];
    let params = ScenarioParams::default().with_disease(Disease::new(2, 0.5).unwrap());

    let shared = run_scenario_across_networks(&networks, &params, &config(10)).unwrap();
    assert_eq!(shared[..10], shared[10..]);

    let per_network = run_scenario_across_networks(
        &networks,
        &params,
        &config(10).with_seed_policy(SeedPolicy::PerNetwork),
    )
    .unwrap();
    assert_eq!(per_network[..10], shared[..10]);
    assert_ne!(per_network[10..], per_network[..10]);

    // Network 1 runs on its own stream seeded with `seed + 1`.
    let mut rng = StdRng::seed_from_u64(70);
    let sir0 = params.initial_state(20, &mut rng).unwrap();
    let expected = run_simulation_batch(
        &networks[1],
        &sir0,
        &params.disease,
        |network| params.behavior.build(network),
        params.max_steps,
        10,
        &mut rng,
    )
    .unwrap();
    assert_eq!(per_network[10..], expected[..]);
}

#[test]
fn rates_are_fractions_and_summaries_line_up() {
    let networks = mixed_networks();
    let rates =
        run_scenario_across_networks(&networks, &ScenarioParams::default(), &config(25)).unwrap();

    assert!(rates.iter().all(|rate| (0.0..=1.0).contains(rate)));
    let summaries = summarize_by_network(&rates, 25);
    assert_eq!(summaries.len(), networks.len());
    for summary in summaries {
        assert_eq!(summary.runs, 25);
        assert!(summary.min <= summary.median && summary.median <= summary.max);
        assert!(summary.p10 <= summary.p90);
    }
}

#[test]
fn simulation_errors_surface_from_jobs() {
    let networks = vec![cycle_network(5)];
    let params = ScenarioParams::default().with_initial_infections(6);
    assert!(run_scenario_across_networks(&networks, &params, &config(2)).is_err());
}

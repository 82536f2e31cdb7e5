#![allow(dead_code)]

use irn_core::{Behavior, Disease, Network, SimResult, SirState, Trajectory};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Disease that always transmits along an active edge and lasts one day.
pub fn certain_disease() -> Disease {
    Disease::new(1, 1.0).expect("valid disease")
}

pub fn run(
    network: &Network,
    sir0: &SirState,
    disease: &Disease,
    behavior: &mut dyn Behavior,
    max_steps: usize,
    seed: u64,
) -> SimResult<Trajectory> {
    let mut rng = seeded_rng(seed);
    irn_core::simulate(
        network.adjacency_matrix(),
        sir0,
        disease,
        behavior,
        max_steps,
        &mut rng,
    )
}

/// Every consecutive pair of states obeys S -> I -> R monotonicity.
pub fn assert_monotone(trajectory: &Trajectory) {
    for pair in trajectory.states().windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        assert!(after.num_susceptible() <= before.num_susceptible());
        assert!(after.num_removed() >= before.num_removed());
        for (b, a) in before.compartments().iter().zip(after.compartments()) {
            if b.is_removed() {
                assert!(a.is_removed());
            }
            if b.is_infectious() {
                assert!(!a.is_susceptible());
            }
        }
    }
}

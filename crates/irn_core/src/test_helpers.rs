//! Small reference topologies shared by unit tests, integration tests and
//! benchmarks.

use std::sync::Arc;

use crate::network::Network;

/// `0 - 1 - ... - (n-1)`.
pub fn path_network(n: usize) -> Arc<Network> {
    let edges: Vec<_> = (1..n).map(|v| (v - 1, v)).collect();
    Arc::new(Network::from_edges(n, &edges).expect("path edges are in range"))
}

/// Agent `0` connected to every other agent.
pub fn star_network(n: usize) -> Arc<Network> {
    let edges: Vec<_> = (1..n).map(|v| (0, v)).collect();
    Arc::new(Network::from_edges(n, &edges).expect("star edges are in range"))
}

/// Every pair of agents connected.
pub fn complete_network(n: usize) -> Arc<Network> {
    let edges: Vec<_> = (0..n)
        .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
        .collect();
    Arc::new(Network::from_edges(n, &edges).expect("complete edges are in range"))
}

/// A ring of `n` agents.
pub fn cycle_network(n: usize) -> Arc<Network> {
    let mut edges: Vec<_> = (1..n).map(|v| (v - 1, v)).collect();
    if n > 2 {
        edges.push((n - 1, 0));
    }
    Arc::new(Network::from_edges(n, &edges).expect("cycle edges are in range"))
}

/// A complete component on agents `0..first` and a path on the remaining
/// `second` agents, with no edge between them.
pub fn two_component_network(first: usize, second: usize) -> Arc<Network> {
    let mut edges: Vec<_> = (0..first)
        .flat_map(|u| (u + 1..first).map(move |v| (u, v)))
        .collect();
    edges.extend((first + 1..first + second).map(|v| (v - 1, v)));
    Arc::new(Network::from_edges(first + second, &edges).expect("component edges are in range"))
}

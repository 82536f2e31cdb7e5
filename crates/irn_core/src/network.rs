//! Contact network: adjacency lists plus lazily derived dense matrices.
//!
//! The adjacency lists are the single source of truth. The dense adjacency
//! matrix `M` and the all-pairs hop-distance matrix `D` are computed on first
//! access and cached for the lifetime of the network behind [OnceLock], so a
//! network shared across worker threads computes each of them exactly once.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::agent_set::AgentSet;
use crate::error::{SimError, SimResult};
use crate::matrix::SquareMatrix;

#[derive(Debug)]
pub struct Network {
    nodes: Vec<usize>,
    adjacency: Vec<Vec<usize>>,
    adjacency_matrix: OnceLock<SquareMatrix>,
    distance_matrix: OnceLock<SquareMatrix>,
}

impl Network {
    /// Builds a network from an ordered node list and a neighbor mapping.
    ///
    /// `nodes` must be exactly `0..N-1` in order. Agents absent from
    /// `adjacency` have no neighbors. Neighbor lists are stored as given;
    /// callers loading an undirected edge list insert both directions.
    pub fn new(nodes: Vec<usize>, adjacency: BTreeMap<usize, Vec<usize>>) -> SimResult<Self> {
        if let Some((position, &id)) = nodes.iter().enumerate().find(|(i, id)| *i != **id) {
            return Err(SimError::InvalidNetwork(format!(
                "node ids must be 0..N-1 in order; found id {id} at position {position}"
            )));
        }

        let agent_count = nodes.len();
        let mut lists = vec![Vec::new(); agent_count];
        for (agent, neighbors) in adjacency {
            if agent >= agent_count {
                return Err(SimError::UnknownAgent { agent, agent_count });
            }
            if let Some(&bad) = neighbors.iter().find(|&&v| v >= agent_count) {
                return Err(SimError::UnknownAgent {
                    agent: bad,
                    agent_count,
                });
            }
            lists[agent] = neighbors;
        }

        Ok(Self {
            nodes,
            adjacency: lists,
            adjacency_matrix: OnceLock::new(),
            distance_matrix: OnceLock::new(),
        })
    }

    /// Builds a network of `agent_count` agents from an undirected edge list.
    ///
    /// Both directions of every edge are inserted; duplicate edges are kept.
    pub fn from_edges(agent_count: usize, edges: &[(usize, usize)]) -> SimResult<Self> {
        let mut adjacency: BTreeMap<usize, Vec<usize>> =
            (0..agent_count).map(|agent| (agent, Vec::new())).collect();
        for &(u, v) in edges {
            for agent in [u, v] {
                if agent >= agent_count {
                    return Err(SimError::UnknownAgent { agent, agent_count });
                }
            }
            adjacency.entry(u).or_default().push(v);
            adjacency.entry(v).or_default().push(u);
        }
        Self::new((0..agent_count).collect(), adjacency)
    }

    pub fn agent_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn neighbors(&self, agent: usize) -> SimResult<&[usize]> {
        self.check_agent(agent)?;
        Ok(&self.adjacency[agent])
    }

    /// Number of stored neighbor relations divided by two.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn has_edge_between(&self, u: usize, v: usize) -> bool {
        if let Some(m) = self.adjacency_matrix.get() {
            return u < m.size() && v < m.size() && m.get(u, v) != 0.0;
        }
        let listed = |a: usize, b: usize| {
            self.adjacency
                .get(a)
                .map_or(false, |neighbors| neighbors.contains(&b))
        };
        listed(u, v) || listed(v, u)
    }

    /// Dense symmetric adjacency matrix `M`, built once.
    pub fn adjacency_matrix(&self) -> &SquareMatrix {
        self.adjacency_matrix.get_or_init(|| {
            let n = self.agent_count();
            let mut m = SquareMatrix::zeros(n);
            for (u, neighbors) in self.adjacency.iter().enumerate() {
                for &v in neighbors {
                    m.set(u, v, 1.0);
                    m.set(v, u, 1.0);
                }
            }
            debug!(agents = n, edges = self.edge_count(), "built adjacency matrix");
            m
        })
    }

    /// All-pairs hop-distance matrix `D`, built once.
    ///
    /// `D[i][i] = 0`; unreachable pairs are `f64::INFINITY`.
    pub fn distance_matrix(&self) -> &SquareMatrix {
        self.distance_matrix
            .get_or_init(|| hop_distances(self.adjacency_matrix()))
    }

    /// Agents strictly closer than `radius` hops to `agent`, including `agent`
    /// itself whenever `radius > 0`.
    pub fn nodes_within(&self, agent: usize, radius: u32) -> SimResult<AgentSet> {
        self.check_agent(agent)?;
        let max_distance = f64::from(radius);
        let distances = self.distance_matrix();
        Ok(distances
            .row(agent)
            .iter()
            .enumerate()
            .filter(|(_, d)| **d < max_distance)
            .map(|(j, _)| j)
            .collect())
    }

    /// Forces both cached matrices so later readers never pay for them.
    pub fn warm_caches(&self) {
        self.distance_matrix();
    }

    fn check_agent(&self, agent: usize) -> SimResult<()> {
        if agent >= self.agent_count() {
            return Err(SimError::UnknownAgent {
                agent,
                agent_count: self.agent_count(),
            });
        }
        Ok(())
    }
}

/// Iterative boolean matrix powering.
///
/// Entering round `d`, `x` is reachability at `d + 1` hops; `x · M` adds the
/// pairs first reachable at `d + 2`.
///
/// Stops at the fixed point `x · M = x`, or as soon as a round discovers no new
/// pair: every pair at distance `k + 1` extends a pair at distance `k`, so an
/// empty round means every reachable pair is already known. The number of
/// products is therefore bounded by the diameter rather than `N`.
fn hop_distances(m: &SquareMatrix) -> SquareMatrix {
    let n = m.size();
    let mut dist = SquareMatrix::filled(n, f64::INFINITY);
    for i in 0..n {
        for j in 0..n {
            if m.get(i, j) == 1.0 {
                dist.set(i, j, 1.0);
            }
        }
    }

    let mut x = m.clone();
    let mut rounds = 0;
    for d in 0..n {
        let next = x.boolean_product(m);
        if next == x {
            break;
        }
        let hops = (d + 2) as f64;
        let mut discovered = 0usize;
        for i in 0..n {
            for j in 0..n {
                if i != j && dist.get(i, j) == f64::INFINITY && next.get(i, j) != 0.0 {
                    dist.set(i, j, hops);
                    discovered += 1;
                }
            }
        }
        rounds += 1;
        if discovered == 0 {
            break;
        }
        x = next;
    }

    for i in 0..n {
        dist.set(i, i, 0.0);
    }
    debug!(agents = n, rounds, "built distance matrix");
    dist
}

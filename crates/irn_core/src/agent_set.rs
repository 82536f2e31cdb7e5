//! Agent-id bookkeeping.
//!
//! [AgentSet] is the small set type passed between the network, the epidemic
//! state and the behaviors. It iterates in ascending agent order so that any
//! loop drawing random numbers over a set consumes the RNG stream in the same
//! order on every run.

use std::collections::BTreeSet;
use std::iter::FromIterator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSet {
    agents: BTreeSet<usize>,
}

impl AgentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(agents: &[usize]) -> Self {
        agents.iter().copied().collect()
    }

    pub fn insert(&mut self, agent: usize) -> bool {
        self.agents.insert(agent)
    }

    pub fn contains(&self, agent: usize) -> bool {
        self.agents.contains(&agent)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.agents.iter().copied()
    }

    /// Agents in ascending order.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    pub fn union(&self, other: &AgentSet) -> AgentSet {
        self.agents.union(&other.agents).copied().collect()
    }

    /// In-place union, used when folding many neighborhoods together.
    pub fn extend_from(&mut self, other: &AgentSet) {
        self.agents.extend(other.agents.iter().copied());
    }

    pub fn intersection(&self, other: &AgentSet) -> AgentSet {
        self.agents.intersection(&other.agents).copied().collect()
    }

    pub fn filter<F>(&self, mut keep: F) -> AgentSet
    where
        F: FnMut(usize) -> bool,
    {
        self.iter().filter(|&agent| keep(agent)).collect()
    }

    pub fn is_subset(&self, other: &AgentSet) -> bool {
        self.agents.is_subset(&other.agents)
    }
}

impl FromIterator<usize> for AgentSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            agents: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for AgentSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.agents.extend(iter);
    }
}

impl IntoIterator for AgentSet {
    type Item = usize;
    type IntoIter = std::collections::btree_set::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.into_iter()
    }
}

impl<'a> IntoIterator for &'a AgentSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_intersection() {
        let a = AgentSet::from_slice(&[1, 2, 3]);
        let b = AgentSet::from_slice(&[3, 4]);

        assert_eq!(a.union(&b).to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(a.intersection(&b).to_vec(), vec![3]);
    }

    #[test]
    fn duplicates_collapse() {
        let set = AgentSet::from_slice(&[5, 5, 2, 5]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(5));
        assert!(!set.contains(3));
    }

    #[test]
    fn iterates_in_ascending_order() {
        let set: AgentSet = vec![9, 1, 4].into_iter().collect();
        assert_eq!(set.to_vec(), vec![1, 4, 9]);
    }

    #[test]
    fn filter_keeps_matching_agents() {
        let set = AgentSet::from_slice(&[0, 1, 2, 3, 4]);
        let even = set.filter(|agent| agent % 2 == 0);
        assert_eq!(even.to_vec(), vec![0, 2, 4]);
        assert!(even.is_subset(&set));
    }

    #[test]
    fn extend_from_accumulates() {
        let mut acc = AgentSet::new();
        acc.extend_from(&AgentSet::from_slice(&[1, 2]));
        acc.extend_from(&AgentSet::from_slice(&[2, 3]));
        assert_eq!(acc.to_vec(), vec![1, 2, 3]);
    }
}

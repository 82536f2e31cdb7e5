//! Epidemic state: one tagged compartment per agent.
//!
//! Every agent is in exactly one of [Compartment::Susceptible],
//! [Compartment::Infectious] or [Compartment::Removed], carrying the number of
//! steps it has spent there. An agent that transitions during a step enters
//! the new compartment with `0` days; [SirState::age] then advances everyone
//! by one day, so after a completed step every agent has `days >= 1`.

use rand::seq::index;
use rand::Rng;
use serde::Serialize;

use crate::agent_set::AgentSet;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "compartment", content = "days", rename_all = "lowercase")]
pub enum Compartment {
    Susceptible(u32),
    Infectious(u32),
    Removed(u32),
}

impl Compartment {
    pub fn days(self) -> u32 {
        match self {
            Compartment::Susceptible(days)
            | Compartment::Infectious(days)
            | Compartment::Removed(days) => days,
        }
    }

    pub fn is_susceptible(self) -> bool {
        matches!(self, Compartment::Susceptible(_))
    }

    pub fn is_infectious(self) -> bool {
        matches!(self, Compartment::Infectious(_))
    }

    pub fn is_removed(self) -> bool {
        matches!(self, Compartment::Removed(_))
    }

    fn aged(self) -> Self {
        match self {
            Compartment::Susceptible(days) => Compartment::Susceptible(days + 1),
            Compartment::Infectious(days) => Compartment::Infectious(days + 1),
            Compartment::Removed(days) => Compartment::Removed(days + 1),
        }
    }
}

/// Compartment counts for one state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SirCounts {
    pub susceptible: usize,
    pub infectious: usize,
    pub removed: usize,
}

/// Per-agent epidemic state. `Clone` is a deep, independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SirState {
    agents: Vec<Compartment>,
}

impl SirState {
    /// Every agent susceptible for one day.
    pub fn all_susceptible(agent_count: usize) -> Self {
        Self {
            agents: vec![Compartment::Susceptible(1); agent_count],
        }
    }

    /// Everyone susceptible except `infectious`, who start their first
    /// infectious day.
    pub fn with_infectious(agent_count: usize, infectious: &AgentSet) -> SimResult<Self> {
        let mut state = Self::all_susceptible(agent_count);
        for agent in infectious {
            if agent >= agent_count {
                return Err(SimError::UnknownAgent { agent, agent_count });
            }
            state.agents[agent] = Compartment::Infectious(1);
        }
        Ok(state)
    }

    /// Picks `num_to_infect` distinct agents uniformly at random as the
    /// initially infectious ones.
    pub fn random_initial<R: Rng + ?Sized>(
        agent_count: usize,
        num_to_infect: usize,
        rng: &mut R,
    ) -> SimResult<Self> {
        if num_to_infect > agent_count {
            return Err(SimError::InvalidConfig(format!(
                "cannot infect {num_to_infect} agents in a network of {agent_count}"
            )));
        }
        let chosen: AgentSet = index::sample(rng, agent_count, num_to_infect)
            .into_iter()
            .collect();
        Self::with_infectious(agent_count, &chosen)
    }

    pub fn from_compartments(agents: Vec<Compartment>) -> Self {
        Self { agents }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn compartment(&self, agent: usize) -> Option<Compartment> {
        self.agents.get(agent).copied()
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.agents
    }

    pub fn susceptible_agents(&self) -> AgentSet {
        self.agents_where(Compartment::is_susceptible)
    }

    pub fn infectious_agents(&self) -> AgentSet {
        self.agents_where(Compartment::is_infectious)
    }

    pub fn removed_agents(&self) -> AgentSet {
        self.agents_where(Compartment::is_removed)
    }

    /// Infectious agents with strictly more than `days` days in the compartment.
    pub fn infectious_longer_than(&self, days: u32) -> AgentSet {
        self.agents_where(|c| matches!(c, Compartment::Infectious(d) if d > days))
    }

    /// Moves `agents` into the infectious compartment with zero elapsed days.
    pub fn infect(&mut self, agents: &AgentSet) {
        for agent in agents {
            self.agents[agent] = Compartment::Infectious(0);
        }
    }

    /// Moves `agents` into the removed compartment with zero elapsed days.
    pub fn remove(&mut self, agents: &AgentSet) {
        for agent in agents {
            self.agents[agent] = Compartment::Removed(0);
        }
    }

    /// One day elapses for every agent.
    pub fn age(&mut self) {
        for c in &mut self.agents {
            *c = c.aged();
        }
    }

    pub fn disease_gone(&self) -> bool {
        !self.agents.iter().any(|c| c.is_infectious())
    }

    pub fn num_susceptible(&self) -> usize {
        self.agents.iter().filter(|c| c.is_susceptible()).count()
    }

    pub fn num_infectious(&self) -> usize {
        self.agents.iter().filter(|c| c.is_infectious()).count()
    }

    pub fn num_removed(&self) -> usize {
        self.agents.iter().filter(|c| c.is_removed()).count()
    }

    pub fn counts(&self) -> SirCounts {
        self.agents
            .iter()
            .fold(SirCounts::default(), |mut counts, c| {
                match c {
                    Compartment::Susceptible(_) => counts.susceptible += 1,
                    Compartment::Infectious(_) => counts.infectious += 1,
                    Compartment::Removed(_) => counts.removed += 1,
                }
                counts
            })
    }

    /// The three "days in compartment" vectors `(S, I, R)`, `0` meaning the
    /// agent is elsewhere.
    pub fn compartment_vectors(&self) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        let n = self.agents.len();
        let (mut s, mut i, mut r) = (vec![0; n], vec![0; n], vec![0; n]);
        for (agent, c) in self.agents.iter().enumerate() {
            let slot = match c {
                Compartment::Susceptible(_) => &mut s,
                Compartment::Infectious(_) => &mut i,
                Compartment::Removed(_) => &mut r,
            };
            slot[agent] = c.days();
        }
        (s, i, r)
    }

    fn agents_where<F>(&self, predicate: F) -> AgentSet
    where
        F: Fn(Compartment) -> bool,
    {
        self.agents
            .iter()
            .enumerate()
            .filter(|(_, c)| predicate(**c))
            .map(|(agent, _)| agent)
            .collect()
    }
}

//! Agent State
//!
//! Per-agent data and the three local phases: spread, receive, update.

use rand::seq::SliceRandom;
use rand::Rng;

use opinion_events::{AgentSnapshot, Opinion};

use crate::components::network::Network;
use crate::error::PolicyError;
use crate::policy::{OpinionPolicy, Payload};

/// A payload on its way to a neighbor, produced by the spread phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub from: usize,
    pub to: usize,
    pub payload: Payload,
}

/// One member of the population.
///
/// `knowledge`, `reputation` and `involvement_threshold` stay in [0, 1].
/// `involvement` is exactly 1.0 until the agent first hears the news and
/// never increases afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Node index in the contact network
    pub id: usize,
    /// Prior leaning toward the fact
    pub knowledge: f64,
    pub opinion: Opinion,
    /// Reputation-weighted influence received so far (numeric policy)
    pub opinion_raw: f64,
    /// Weight of this agent's influence on others
    pub reputation: f64,
    /// Current willingness to spread
    pub involvement: f64,
    /// Involvement required to spread
    pub involvement_threshold: f64,
    pub has_heard: bool,
    pub time_since_heard: u32,
    /// First text received (oracle policy)
    pub pending_message: Option<String>,
}

impl Agent {
    /// A fresh, undecided agent that has not heard anything yet.
    pub fn new(id: usize, knowledge: f64, reputation: f64, involvement_threshold: f64) -> Self {
        Self {
            id,
            knowledge: knowledge.clamp(0.0, 1.0),
            opinion: Opinion::Neutral,
            opinion_raw: 0.0,
            reputation: reputation.clamp(0.0, 1.0),
            involvement: 1.0,
            involvement_threshold: involvement_threshold.clamp(0.0, 1.0),
            has_heard: false,
            time_since_heard: 0,
            pending_message: None,
        }
    }

    /// Involved enough and holding an opinion worth passing on.
    pub fn should_spread(&self) -> bool {
        self.involvement >= self.involvement_threshold && self.opinion.is_opinionated()
    }

    /// Picks a neighbor and composes a payload for it.
    ///
    /// Returns `Ok(None)` when the agent is not spreading or has no neighbors.
    /// The payload is only composed once a recipient exists.
    pub fn spread_step<R: Rng + ?Sized>(
        &self,
        network: &Network,
        policy: &mut dyn OpinionPolicy,
        rng: &mut R,
    ) -> Result<Option<Delivery>, PolicyError> {
        if !self.should_spread() {
            return Ok(None);
        }
        let Some(&to) = network.neighbors(self.id).choose(rng) else {
            return Ok(None);
        };
        let payload = policy.compose_payload(self)?;
        Ok(Some(Delivery {
            from: self.id,
            to,
            payload,
        }))
    }

    /// Absorbs a payload. The first delivery marks the agent as having heard.
    pub fn receive_payload(&mut self, payload: Payload, policy: &dyn OpinionPolicy) {
        policy.absorb_payload(self, payload);
        if !self.has_heard {
            self.has_heard = true;
            self.time_since_heard = 0;
        }
    }

    /// Decays involvement if the agent has heard, then re-decides the opinion.
    ///
    /// On a policy failure involvement has still decayed but the opinion is
    /// left as it was.
    pub fn update_step(
        &mut self,
        decay_rate: f64,
        policy: &mut dyn OpinionPolicy,
    ) -> Result<(), PolicyError> {
        if self.has_heard {
            self.time_since_heard = self.time_since_heard.saturating_add(1);
            self.involvement = decayed_involvement(decay_rate, self.time_since_heard);
        }
        self.opinion = policy.decide_opinion(self)?;
        Ok(())
    }

    pub fn snapshot(&self, community: usize) -> AgentSnapshot {
        AgentSnapshot {
            agent_id: self.id,
            community,
            knowledge: self.knowledge,
            reputation: self.reputation,
            involvement_threshold: self.involvement_threshold,
            involvement: self.involvement,
            opinion: self.opinion,
            has_heard: self.has_heard,
            time_since_heard: self.time_since_heard,
        }
    }
}

/// `max(0, 1 - decay_rate * t)`, clamped to [0, 1].
pub fn decayed_involvement(decay_rate: f64, time_since_heard: u32) -> f64 {
    (1.0 - decay_rate * f64::from(time_since_heard)).clamp(0.0, 1.0)
}

//! Numeric Accumulation Policy
//!
//! Agents pass `opinion * reputation` and sum everything they receive. The sum
//! is squashed to (-1, 1) and must clear the agent's knowledge by a fixed band
//! to flip its belief.

use opinion_events::Opinion;

use super::{OpinionPolicy, Payload};
use crate::components::agent::Agent;
use crate::config::{DynamicsConfig, NewsConfig, PolicyKind};
use crate::error::PolicyError;

/// Initial accumulated influence of patient zero
pub const PATIENT_ZERO_RAW: f64 = 1.0;

/// Logistic function, stable for large-magnitude inputs.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Reputation-weighted accumulation with a sigmoid decision band.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericAccumulation {
    /// Steepness of the sigmoid
    pub scale: f64,
    /// Half-width of the knowledge band
    pub band: f64,
}

impl Default for NumericAccumulation {
    fn default() -> Self {
        Self {
            scale: 5.0,
            band: 0.1,
        }
    }
}

impl NumericAccumulation {
    pub fn from_config(dynamics: &DynamicsConfig) -> Self {
        Self {
            scale: dynamics.sigmoid_scale,
            band: dynamics.knowledge_band,
        }
    }

    /// Accumulated influence mapped to (-1, 1).
    pub fn squash(&self, opinion_raw: f64) -> f64 {
        2.0 * sigmoid(self.scale * opinion_raw) - 1.0
    }
}

impl OpinionPolicy for NumericAccumulation {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Numeric
    }

    fn compose_payload(&mut self, agent: &Agent) -> Result<Payload, PolicyError> {
        Ok(Payload::Influence(agent.opinion.as_f64() * agent.reputation))
    }

    fn absorb_payload(&self, agent: &mut Agent, payload: Payload) {
        match payload {
            Payload::Influence(value) => agent.opinion_raw += value,
            Payload::Message(_) => {
                tracing::debug!(agent = agent.id, "numeric policy ignores text payload");
            }
        }
    }

    fn decide_opinion(&mut self, agent: &Agent) -> Result<Opinion, PolicyError> {
        if !agent.has_heard {
            return Ok(agent.opinion);
        }
        if agent.involvement == 0.0 {
            return Ok(Opinion::Neutral);
        }

        let o_hat = self.squash(agent.opinion_raw);
        let opinion = if o_hat > agent.knowledge + self.band {
            Opinion::Positive
        } else if o_hat < agent.knowledge - self.band {
            Opinion::Negative
        } else {
            Opinion::Neutral
        };
        Ok(opinion)
    }

    fn seed_patient_zero(&self, agent: &mut Agent, _news: &NewsConfig) {
        agent.opinion_raw = PATIENT_ZERO_RAW;
    }
}

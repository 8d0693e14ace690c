//! Opinion Update Policies
//!
//! The pluggable rule an agent uses to compose what it spreads, absorb what it
//! receives, and decide what it believes. One policy drives a whole run.
//!
//! - [`NumericAccumulation`]: reputation-weighted scalar influence folded
//!   through a sigmoid and compared against the agent's knowledge band
//! - [`OracleCredibility`]: text payloads rephrased and judged by an external
//!   [`CredibilityOracle`]

pub mod numeric;
pub mod oracle;

pub use numeric::{sigmoid, NumericAccumulation};
pub use oracle::{parse_verdict, CredibilityOracle, OracleCredibility, ReferenceOracle};

use opinion_events::Opinion;

use crate::components::agent::Agent;
use crate::config::{NewsConfig, PolicyKind};
use crate::error::PolicyError;

/// What one agent hands to a neighbor.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Signed, reputation-weighted influence
    Influence(f64),
    /// Natural-language statement
    Message(String),
}

/// Capability set shared by all update rules.
pub trait OpinionPolicy {
    fn kind(&self) -> PolicyKind;

    /// Payload a spreading agent sends.
    fn compose_payload(&mut self, agent: &Agent) -> Result<Payload, PolicyError>;

    /// Folds a received payload into the recipient. Called before the
    /// recipient's `has_heard` flag is set for a first delivery.
    fn absorb_payload(&self, agent: &mut Agent, payload: Payload);

    /// The opinion the agent should hold now. Runs after involvement decay.
    fn decide_opinion(&mut self, agent: &Agent) -> Result<Opinion, PolicyError>;

    /// Policy-specific part of seeding patient zero.
    fn seed_patient_zero(&self, agent: &mut Agent, news: &NewsConfig);
}

impl std::fmt::Debug for dyn OpinionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpinionPolicy({})", self.kind())
    }
}

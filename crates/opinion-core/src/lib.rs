//! Opinion Diffusion Simulation Library
//!
//! Agent-based model of a false claim spreading through a community-structured
//! contact network, with pluggable opinion update policies.

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod policy;
pub mod rng;
pub mod setup;
pub mod simulation;

pub use components::{Agent, Network};
pub use config::{PolicyKind, SimConfig};
pub use error::{ConfigError, OracleError, PolicyError, SimError};
pub use opinion_events::{Opinion, StepRecord};
pub use policy::{CredibilityOracle, OpinionPolicy, Payload};
pub use simulation::Simulation;

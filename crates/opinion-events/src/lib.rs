//! Shared record types and serialization for the opinion diffusion simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod opinion;
pub mod record;
pub mod snapshot;

pub use opinion::{InvalidOpinion, Opinion};
pub use record::StepRecord;
pub use snapshot::{
    AgentSnapshot, DistributionSnapshot, Histogram, NetworkSummary, DEFAULT_HISTOGRAM_BINS,
};

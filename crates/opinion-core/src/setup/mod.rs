//! Run Setup
//!
//! Contact network generation and population spawning.

pub mod population;
pub mod topology;

pub use population::{seed_patient_zero, spawn_population, AttributeSamplers};
pub use topology::TopologyGenerator;

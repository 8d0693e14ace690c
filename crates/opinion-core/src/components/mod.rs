//! Model Components
//!
//! The contact network and the agents that live on it.

pub mod agent;
pub mod network;

pub use agent::{decayed_involvement, Agent, Delivery};
pub use network::Network;

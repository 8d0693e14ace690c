//! Error Types
//!
//! Configuration, oracle, policy and top-level simulation errors.

use thiserror::Error;

/// Errors detected while loading or validating configuration.
///
/// All of these are reported before the first step runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Error serializing config back to TOML
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("num_agents must be positive")]
    NoAgents,

    #[error("n_communities must be in 1..={num_agents}, got {n_communities}")]
    InvalidCommunityCount {
        n_communities: usize,
        num_agents: usize,
    },

    #[error("block size {block_size} is too small, each community needs at least 2 agents")]
    DegenerateBlock { block_size: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("patient zero index {index} is outside the network of {nodes} nodes")]
    PatientZeroOutOfRange { index: usize, nodes: usize },

    #[error("the oracle policy requires a credibility oracle")]
    OracleRequired,
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Failure reported by a credibility oracle backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle backend unavailable: {0}")]
    Unavailable(String),

    #[error("unparseable oracle verdict: {0:?}")]
    Unparseable(String),
}

/// Failure while composing a payload or deciding an opinion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("agent {agent} has heard the news but holds no message")]
    MissingMessage { agent: usize },
}

/// Top-level error for running a simulation and writing its reports.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Configuration System
//!
//! All run parameters are loaded from a TOML file. Every section is optional
//! and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::setup::TopologyGenerator;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "opinion_sim.toml";

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    /// Run length and patient zero
    #[serde(default)]
    pub simulation: RunConfig,
    /// Contact network shape
    #[serde(default)]
    pub network: NetworkConfig,
    /// Per-agent attribute distributions
    #[serde(default)]
    pub population: PopulationConfig,
    /// Opinion update rule and its constants
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    /// Canonical texts for the oracle policy
    #[serde(default)]
    pub news: NewsConfig,
    /// Random stream seeds
    #[serde(default)]
    pub seeds: SeedConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Topology generator described by the `[network]` section.
    pub fn topology(&self) -> TopologyGenerator {
        TopologyGenerator {
            n_agents: self.network.num_agents,
            n_communities: self.network.n_communities,
            target_intra_degree: self.network.target_intra_degree,
            inter_intra_ratio: self.network.inter_intra_ratio,
        }
    }

    /// Checks every parameter, naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let topology = self.topology();
        topology.validate()?;
        self.validate_agents(topology.node_count())
    }

    /// Checks everything except the network shape against a network of
    /// `nodes` nodes.
    pub fn validate_agents(&self, nodes: usize) -> Result<(), ConfigError> {
        let pop = &self.population;
        unit_interval("knowledge_mode", pop.knowledge_mode)?;
        positive("reputation_alpha", pop.reputation_alpha)?;
        positive("reputation_beta", pop.reputation_beta)?;
        unit_interval("threshold_low", pop.threshold_low)?;
        unit_interval("threshold_high", pop.threshold_high)?;
        if pop.threshold_low > pop.threshold_high {
            return Err(ConfigError::invalid(
                "threshold range",
                format!("low {} exceeds high {}", pop.threshold_low, pop.threshold_high),
            ));
        }

        let dyn_ = &self.dynamics;
        non_negative("decay_rate", dyn_.decay_rate)?;
        if !dyn_.sigmoid_scale.is_finite() {
            return Err(ConfigError::invalid("sigmoid_scale", "must be finite"));
        }
        non_negative("knowledge_band", dyn_.knowledge_band)?;
        unit_interval("fact_check_knowledge", dyn_.fact_check_knowledge)?;

        let index = self.simulation.patient_zero;
        if index >= nodes {
            return Err(ConfigError::PatientZeroOutOfRange { index, nodes });
        }

        Ok(())
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, format!("must be positive, got {}", value)))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, format!("must be non-negative, got {}", value)))
    }
}

/// Run length and seeding of the initial spreader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Steps executed by the CLI run
    pub steps: u64,
    /// Node index seeded with the false claim
    pub patient_zero: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 50,
            patient_zero: 30,
        }
    }
}

/// Stochastic block model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub num_agents: usize,
    pub n_communities: usize,
    /// Expected number of same-community neighbors
    pub target_intra_degree: f64,
    /// Cross-community edge probability as a fraction of the intra probability
    pub inter_intra_ratio: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_agents: 100,
            n_communities: 3,
            target_intra_degree: 10.0,
            inter_intra_ratio: 0.05,
        }
    }
}

/// Distributions of the per-agent attributes drawn at spawn time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Mode of the triangular knowledge distribution on [0, 1]
    pub knowledge_mode: f64,
    pub reputation_alpha: f64,
    pub reputation_beta: f64,
    /// Uniform range of the involvement threshold
    pub threshold_low: f64,
    pub threshold_high: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            knowledge_mode: 0.05,
            reputation_alpha: 4.0,
            reputation_beta: 10.0,
            threshold_low: 0.0,
            threshold_high: 1.0,
        }
    }
}

/// Which opinion update rule drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Reputation-weighted accumulation with a sigmoid decision band
    #[default]
    Numeric,
    /// Text payloads judged by a credibility oracle
    Oracle,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Numeric => write!(f, "numeric"),
            PolicyKind::Oracle => write!(f, "oracle"),
        }
    }
}

/// Opinion update rule and the constants it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    pub policy: PolicyKind,
    /// Involvement lost per step since first hearing
    pub decay_rate: f64,
    /// Steepness of the numeric sigmoid
    pub sigmoid_scale: f64,
    /// Half-width of the knowledge band evidence must clear
    pub knowledge_band: f64,
    /// Knowledge above which the oracle is given the fact as a hint
    pub fact_check_knowledge: f64,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Numeric,
            decay_rate: 0.1,
            sigmoid_scale: 5.0,
            knowledge_band: 0.1,
            fact_check_knowledge: 0.5,
        }
    }
}

/// The circulating false claim and the fact that contradicts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub claim: String,
    pub fact: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            claim: "There was an earthquake in Asia this month.".to_string(),
            fact: "There was no earthquake in Asia this month.".to_string(),
        }
    }
}

/// Seeds for the independent random streams.
///
/// Streams without an explicit seed derive one from `master`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub master: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbor: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            master: 42,
            topology: None,
            population: None,
            schedule: None,
            neighbor: None,
        }
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Opinion Diffusion Simulation Configuration

[simulation]
steps = 50
# Node seeded with the false claim
patient_zero = 30

[network]
num_agents = 100
n_communities = 3
target_intra_degree = 10.0
inter_intra_ratio = 0.05

[population]
knowledge_mode = 0.05
reputation_alpha = 4.0
reputation_beta = 10.0
threshold_low = 0.0
threshold_high = 1.0

[dynamics]
# "numeric" or "oracle"
policy = "numeric"
decay_rate = 0.1
sigmoid_scale = 5.0
knowledge_band = 0.1
fact_check_knowledge = 0.5

[news]
claim = "There was an earthquake in Asia this month."
fact = "There was no earthquake in Asia this month."

[seeds]
master = 42
# Optional per-stream overrides:
# topology = 1
# population = 2
# schedule = 3
# neighbor = 4
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();

        assert_eq!(config.network.num_agents, 100);
        assert_eq!(config.network.n_communities, 3);
        assert_eq!(config.simulation.patient_zero, 30);
        assert_eq!(config.dynamics.policy, PolicyKind::Numeric);
        assert_eq!(config.dynamics.decay_rate, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_toml_parses() {
        let config = SimConfig::from_str(&default_config_toml()).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [network]
            num_agents = 300

            [dynamics]
            policy = "oracle"
        "#;

        let config = SimConfig::from_str(toml).unwrap();

        assert_eq!(config.network.num_agents, 300);
        assert_eq!(config.network.n_communities, 3);
        assert_eq!(config.dynamics.policy, PolicyKind::Oracle);
        assert_eq!(config.dynamics.sigmoid_scale, 5.0);
        assert_eq!(config.seeds.master, 42);
    }

    #[test]
    fn test_config_to_toml() {
        let config = SimConfig::default();
        let toml = config.to_toml().unwrap();

        assert!(toml.contains("[network]"));
        assert!(toml.contains("[dynamics]"));
        assert!(!toml.contains("topology ="));
        assert_eq!(SimConfig::from_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_communities() {
        let mut config = SimConfig::default();
        config.network.n_communities = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCommunityCount { .. })
        ));

        config.network.n_communities = 101;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCommunityCount { .. })
        ));

        config.network.n_communities = 60;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DegenerateBlock { block_size: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_distributions() {
        let mut config = SimConfig::default();
        config.population.reputation_alpha = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "reputation_alpha", .. })
        ));

        let mut config = SimConfig::default();
        config.population.threshold_low = 0.8;
        config.population.threshold_high = 0.2;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.population.knowledge_mode = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "knowledge_mode", .. })
        ));
    }

    #[test]
    fn test_validate_patient_zero_range() {
        let mut config = SimConfig::default();
        // 100 agents in 3 communities keeps 99 nodes
        config.simulation.patient_zero = 99;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PatientZeroOutOfRange { index: 99, nodes: 99 })
        ));

        config.simulation.patient_zero = 98;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimConfig::from_file("/nonexistent/opinion_sim.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
